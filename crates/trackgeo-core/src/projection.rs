//! # Position Projection
//!
//! Move a position by a distance along the track.
//!
//! - `project`: unconstrained; fans out at every branch and returns one
//!   position per reachable branch end.
//! - `project_on_path`: follows a caller-chosen edge sequence and returns at
//!   most one position.
//!
//! Both run on an explicit work list. A path that crosses more edges than
//! `SearchLimits::max_hops` fails with `HopLimitExceeded`.

use crate::topology::{minus, plus};
use crate::{
    EdgeRef, EffectiveDirection, Millimeters, Position, RecordId, RecordStore, Topology,
    TrackError,
};

/// One pending edge on the projection work list.
struct Leg {
    start: EdgeRef,
    distance: Millimeters,
    hops: usize,
}

impl<S: RecordStore + ?Sized> Topology<'_, S> {
    // =========================================================================
    // UNCONSTRAINED
    // =========================================================================

    /// Project every reference of `position` by a signed `distance`.
    ///
    /// Positive distance moves along the reference's facing (`Both` counts as
    /// forward). When the target leaves the edge, the rest of the distance is
    /// carried onto every neighbor beyond the crossed endpoint. Results are
    /// anonymous single-reference positions in depth-first order: all results
    /// of the first reference, first branch first, then the next. Nothing is
    /// deduplicated.
    pub fn project(
        &self,
        position: &Position,
        distance: Millimeters,
    ) -> Result<Vec<Position>, TrackError> {
        let limits = self.limits();
        let mut results = Vec::new();
        let mut work: Vec<Leg> = position
            .refs()
            .iter()
            .rev()
            .map(|start| Leg {
                start: start.clone(),
                distance,
                hops: 0,
            })
            .collect();

        while let Some(Leg {
            start,
            distance,
            hops,
        }) = work.pop()
        {
            let edge = self.edge(&start.edge)?;
            let reversed = start.direction.is_reverse();
            let target = if reversed {
                minus(start.offset, distance)?
            } else {
                plus(start.offset, distance)?
            };

            if (0..=edge.length).contains(&target) {
                results.push(Position::from(EdgeRef {
                    offset: target,
                    ..start
                }));
                limits.check_results(results.len())?;
                continue;
            }

            // Remaining distance keeps its sign relative to the new facing
            // chosen below.
            let ahead = minus(edge.length, start.offset)?;
            let (remaining, ascending) = match (target < 0, reversed) {
                (true, false) => (plus(distance, start.offset)?, false),
                (true, true) => (minus(distance, start.offset)?, false),
                (false, false) => (minus(distance, ahead)?, true),
                (false, true) => (plus(distance, ahead)?, true),
            };

            limits.check_hops(hops + 1)?;
            let neighbors = self.neighbors(&edge, ascending)?;
            for next in neighbors.into_iter().rev() {
                let direction = match (next.ascending, remaining < 0) {
                    (true, false) | (false, true) => EffectiveDirection::Forward,
                    (true, true) | (false, false) => EffectiveDirection::Reverse,
                };
                work.push(Leg {
                    start: EdgeRef::new(
                        next.edge.id.clone(),
                        next.edge.entry_offset(next.ascending),
                        direction,
                    ),
                    distance: remaining,
                    hops: hops + 1,
                });
            }
        }

        Ok(results)
    }

    // =========================================================================
    // PATH-CONSTRAINED
    // =========================================================================

    /// Project `position` by a non-negative `distance` along `path`.
    ///
    /// `path` lists the edges in travel order and must start with the edge of
    /// one of the position's references. `forward` follows the reference's
    /// facing, otherwise travel runs against it. Returns `None` when no
    /// reference lies on the head of the path, when the path runs out before
    /// the distance does, or when two consecutive path edges share no node.
    pub fn project_on_path(
        &self,
        position: &Position,
        path: &[RecordId],
        distance: Millimeters,
        forward: bool,
    ) -> Result<Option<Position>, TrackError> {
        if distance < 0 {
            return Err(TrackError::NegativeDistance(distance));
        }
        let Some(head) = path.first() else {
            return Ok(None);
        };

        for start in position.refs().iter().filter(|r| r.edge == *head) {
            if let Some(found) = self.follow_path(start.clone(), path, distance, forward)? {
                return Ok(Some(Position::from(found)));
            }
        }

        tracing::debug!(head = %head, "no reference reaches the end of the path");
        Ok(None)
    }

    fn follow_path(
        &self,
        mut current: EdgeRef,
        path: &[RecordId],
        mut remaining: Millimeters,
        forward: bool,
    ) -> Result<Option<EdgeRef>, TrackError> {
        let limits = self.limits();
        let mut edge = self.edge(&current.edge)?;

        for (hops, next_id) in path.iter().skip(1).map(Some).chain([None]).enumerate() {
            let ascending = current.direction.is_reverse() != forward;
            let target = if ascending {
                plus(current.offset, remaining)?
            } else {
                minus(current.offset, remaining)?
            };
            if (0..=edge.length).contains(&target) {
                return Ok(Some(EdgeRef {
                    offset: target,
                    ..current
                }));
            }

            let Some(next_id) = next_id else {
                return Ok(None);
            };
            limits.check_hops(hops + 1)?;

            let next = self.edge(next_id)?;
            remaining = minus(remaining, edge.remaining(current.offset, ascending)?)?;
            let (node, _) = edge.exit(ascending);
            let entered_ascending = match (ascending, next.node_a == *node, next.node_b == *node) {
                (true, true, _) | (false, true, false) => true,
                (true, false, true) | (false, _, true) => false,
                _ => {
                    tracing::debug!(from = %edge.id, to = %next.id, "path edges are not joined");
                    return Ok(None);
                }
            };

            // Keep `forward` fixed; the facing absorbs the new travel direction.
            let direction = if entered_ascending == forward {
                EffectiveDirection::Forward
            } else {
                EffectiveDirection::Reverse
            };
            current = EdgeRef::new(
                next.id.clone(),
                next.entry_offset(entered_ascending),
                direction,
            );
            edge = next;
        }

        Ok(None)
    }
}

// =============================================================================
// TESTS
// =============================================================================
