//! # Distance & Orientation
//!
//! Both calculators share one strategy: try every pairing of the start's and
//! end's edge references, and for each pairing search first along the
//! start's facing, then against it. The first pairing and direction that
//! connects decides the answer.
//!
//! A pairing on the same edge is settled arithmetically and never searched
//! further.

use crate::topology::{minus, plus};
use crate::{
    Edge, EdgeRef, Millimeters, Orientation, Position, RecordId, RecordStore, Topology,
    TrackError,
};
use std::collections::{BTreeMap, BTreeSet};

/// Traversal state: an edge entered in a given direction.
type Entry = (RecordId, bool);

/// Shortest-distance bookkeeping. `BTreeMap` keeps tie-breaking stable.
#[derive(Default)]
struct Frontier {
    /// Entry distance and hop count of every discovered entry.
    dist: BTreeMap<Entry, (Millimeters, usize)>,
    settled: BTreeSet<Entry>,
    /// Shortest complete distance to the target found so far.
    best: Option<Millimeters>,
}

impl Frontier {
    /// The unsettled entry with the smallest entry distance.
    fn closest(&self) -> Option<(Entry, Millimeters, usize)> {
        self.dist
            .iter()
            .filter(|(entry, _)| !self.settled.contains(*entry))
            .min_by_key(|(_, (cost, _))| *cost)
            .map(|(entry, &(cost, hops))| (entry.clone(), cost, hops))
    }
}

impl<S: RecordStore + ?Sized> Topology<'_, S> {
    // =========================================================================
    // DISTANCE
    // =========================================================================

    /// Track distance between two positions, `None` when they are not
    /// connected.
    pub fn distance(
        &self,
        start: &Position,
        end: &Position,
    ) -> Result<Option<Millimeters>, TrackError> {
        for from in start.refs() {
            for to in end.refs() {
                for forward in [true, false] {
                    if let Some(distance) = self.directed_distance(from, to, forward)? {
                        return Ok(Some(distance));
                    }
                }
            }
        }
        Ok(None)
    }

    /// Shortest distance from `from` to `to` in one travel direction.
    ///
    /// Dijkstra over (edge, direction) entries, keyed by the distance at
    /// which the edge is entered. Edge lengths are non-negative, so the
    /// search settles on cyclic networks and keeps the minimum over every
    /// branch.
    fn directed_distance(
        &self,
        from: &EdgeRef,
        to: &EdgeRef,
        forward: bool,
    ) -> Result<Option<Millimeters>, TrackError> {
        let ascending = from.direction.is_reverse() != forward;
        if from.edge == to.edge {
            let distance = if ascending {
                minus(to.offset, from.offset)?
            } else {
                minus(from.offset, to.offset)?
            };
            return Ok((distance >= 0).then_some(distance));
        }

        let limits = self.limits();
        let start = self.edge(&from.edge)?;
        let mut frontier = Frontier::default();
        self.expand(
            &start,
            ascending,
            start.remaining(from.offset, ascending)?,
            1,
            to,
            &mut frontier,
        )?;

        while let Some(((edge_id, ascending), cost, hops)) = frontier.closest() {
            if frontier.best.is_some_and(|best| cost >= best) {
                break;
            }
            limits.check_hops(hops)?;
            frontier.settled.insert((edge_id.clone(), ascending));

            let edge = self.edge(&edge_id)?;
            self.expand(
                &edge,
                ascending,
                plus(cost, edge.length)?,
                hops + 1,
                to,
                &mut frontier,
            )?;
        }

        Ok(frontier.best)
    }

    /// Offer every neighbor beyond `edge` to the frontier, entered at `cost`.
    /// Reaching the target edge records a candidate total instead.
    fn expand(
        &self,
        edge: &Edge,
        ascending: bool,
        cost: Millimeters,
        hops: usize,
        to: &EdgeRef,
        frontier: &mut Frontier,
    ) -> Result<(), TrackError> {
        for next in self.neighbors(edge, ascending)? {
            if next.edge.id == to.edge {
                let tail = if next.ascending {
                    to.offset
                } else {
                    minus(next.edge.length, to.offset)?
                };
                let total = plus(cost, tail)?;
                if tail >= 0 && frontier.best.is_none_or(|best| total < best) {
                    frontier.best = Some(total);
                }
                continue;
            }

            let key = (next.edge.id, next.ascending);
            if frontier.settled.contains(&key) {
                continue;
            }
            match frontier.dist.get(&key) {
                Some(&(known, _)) if known <= cost => {}
                _ => {
                    frontier.dist.insert(key, (cost, hops));
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // ORIENTATION
    // =========================================================================

    /// Relative facing of two positions.
    pub fn orientation(
        &self,
        start: &Position,
        end: &Position,
    ) -> Result<Orientation, TrackError> {
        for from in start.refs() {
            for to in end.refs() {
                for forward in [true, false] {
                    let orientation = self.directed_orientation(from, to, forward)?;
                    if orientation != Orientation::NotConnected {
                        return Ok(orientation);
                    }
                }
            }
        }
        Ok(Orientation::NotConnected)
    }

    /// Depth-first walk carrying the start's facing across every crossing.
    ///
    /// The facing flips whenever the travel direction relative to endpoint
    /// order changes between two edges. Travel direction is tracked apart
    /// from facing, so a `Both` facing still moves the right way after a
    /// reversal. The first branch, in neighbor order, that reaches the end
    /// edge decides.
    fn directed_orientation(
        &self,
        from: &EdgeRef,
        to: &EdgeRef,
        forward: bool,
    ) -> Result<Orientation, TrackError> {
        if from.edge == to.edge {
            return Ok(Orientation::between(from.direction, to.direction));
        }

        let limits = self.limits();
        let mut visited = BTreeSet::new();
        let mut stack = vec![(
            from.edge.clone(),
            from.direction.is_reverse() != forward,
            from.direction,
            0usize,
        )];

        while let Some((edge_id, ascending, facing, hops)) = stack.pop() {
            if edge_id == to.edge {
                return Ok(Orientation::between(facing, to.direction));
            }
            if !visited.insert((edge_id.clone(), ascending, facing)) {
                continue;
            }
            limits.check_hops(hops)?;

            let edge = self.edge(&edge_id)?;
            let neighbors = self.neighbors(&edge, ascending)?;
            for next in neighbors.into_iter().rev() {
                let facing = if next.ascending == ascending {
                    facing
                } else {
                    facing.flipped()
                };
                stack.push((next.edge.id, next.ascending, facing, hops + 1));
            }
        }

        Ok(Orientation::NotConnected)
    }
}

// =============================================================================
// TESTS
// =============================================================================
