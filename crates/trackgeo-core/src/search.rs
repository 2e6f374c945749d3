//! # Nearest-Match Search
//!
//! Find every point object reachable from a start position that satisfies a
//! `Condition`, with the edges walked to reach it and the distance travelled.
//!
//! ## Semantics
//!
//! For each edge reference the search first scans the edge itself. If any
//! candidate on that edge qualifies, only the nearest one is reported and
//! nothing beyond the edge is explored. Otherwise the search continues on
//! every neighbor, and the results of all branches are concatenated in
//! depth-first order. Reduce with `PathMatch::nearest` or
//! `PathMatch::farthest`.
//!
//! A branch is pruned when it would re-enter an edge in a direction already
//! taken earlier on the same path; repeating that loop could only find the
//! same objects again, further away.

use crate::primitives::{PLACEMENT_EDGE_PATH, PLACEMENT_LABEL};
use crate::store::required;
use crate::topology::{minus, plus};
use crate::{
    Condition, EdgeRef, EffectiveDirection, Millimeters, Orientation, Position, Record, RecordId,
    RecordStore, Topology, TrackError,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// PATH MATCH
// =============================================================================

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMatch {
    /// Identity of the matched point object.
    pub entity: RecordId,
    /// Edges in travel order, from the start edge to the match's edge.
    pub edges: Vec<RecordId>,
    /// Track distance from the start position.
    pub distance: Millimeters,
}

impl PathMatch {
    /// The closest match; the earliest wins ties.
    #[must_use]
    pub fn nearest(matches: &[PathMatch]) -> Option<&PathMatch> {
        matches
            .iter()
            .reduce(|best, m| if m.distance < best.distance { m } else { best })
    }

    /// The most distant match; the earliest wins ties. Zero-distance
    /// matches count.
    #[must_use]
    pub fn farthest(matches: &[PathMatch]) -> Option<&PathMatch> {
        matches
            .iter()
            .reduce(|best, m| if m.distance > best.distance { m } else { best })
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// One pending edge on the search work list.
struct Probe {
    at: EdgeRef,
    forward: bool,
    /// Edges walked before `at.edge`.
    walked: Vec<RecordId>,
    /// (edge, ascending) entries crossed into on this path.
    entered: Vec<(RecordId, bool)>,
    travelled: Millimeters,
}

impl<S: RecordStore + ?Sized> Topology<'_, S> {
    /// Search for point objects matching `condition`.
    ///
    /// `orientation` filters candidates by facing relative to the probe:
    /// `Equal` drops opposite-facing objects, `Opposite` drops equal-facing
    /// ones, `Both` keeps all, and `NotConnected` returns nothing at all.
    /// `forward` searches along the start's facing (`Both` counts as
    /// forward), otherwise against it. The start object itself is never
    /// reported.
    pub fn search(
        &self,
        start: &Position,
        condition: &Condition,
        orientation: Orientation,
        forward: bool,
    ) -> Result<Vec<PathMatch>, TrackError> {
        if orientation == Orientation::NotConnected {
            return Ok(Vec::new());
        }

        let limits = self.limits();
        let exclude = start.identity();
        let mut results = Vec::new();
        let mut work: Vec<Probe> = start
            .refs()
            .iter()
            .rev()
            .map(|at| Probe {
                at: at.clone(),
                forward,
                walked: Vec::new(),
                entered: Vec::new(),
                travelled: 0,
            })
            .collect();

        while let Some(probe) = work.pop() {
            let exclude = if probe.entered.is_empty() { exclude } else { None };
            if let Some((entity, distance)) =
                self.nearest_on_edge(&probe.at, probe.forward, exclude, condition, orientation)?
            {
                let mut edges = probe.walked;
                edges.push(probe.at.edge);
                results.push(PathMatch {
                    entity,
                    edges,
                    distance: plus(probe.travelled, distance)?,
                });
                limits.check_results(results.len())?;
                continue;
            }

            let edge = self.edge(&probe.at.edge)?;
            let ascending = probe.at.direction.is_reverse() != probe.forward;
            let travelled = plus(probe.travelled, edge.remaining(probe.at.offset, ascending)?)?;
            let hops = probe.entered.len() + 1;

            let neighbors = self.neighbors(&edge, ascending)?;
            for next in neighbors.into_iter().rev() {
                let entry = (next.edge.id.clone(), next.ascending);
                if probe.entered.contains(&entry) {
                    tracing::debug!(edge = %next.edge.id, "pruned repeated entry");
                    continue;
                }
                limits.check_hops(hops)?;

                let facing = if next.ascending == ascending {
                    probe.at.direction
                } else {
                    probe.at.direction.flipped()
                };
                // Keep travel in the entered direction whatever the facing.
                let forward = (facing == EffectiveDirection::Reverse) != next.ascending;

                let mut walked = probe.walked.clone();
                walked.push(edge.id.clone());
                let mut entered = probe.entered.clone();
                entered.push(entry);

                work.push(Probe {
                    at: EdgeRef::new(
                        next.edge.id.clone(),
                        next.edge.entry_offset(next.ascending),
                        facing,
                    ),
                    forward,
                    walked,
                    entered,
                    travelled,
                });
            }
        }

        tracing::debug!(matches = results.len(), "search finished");
        Ok(results)
    }

    /// Nearest qualifying candidate on the probe's own edge, ahead of the
    /// probe in its travel direction. Ties keep the first in document order.
    fn nearest_on_edge(
        &self,
        probe: &EdgeRef,
        forward: bool,
        exclude: Option<&RecordId>,
        condition: &Condition,
        orientation: Orientation,
    ) -> Result<Option<(RecordId, Millimeters)>, TrackError> {
        let ascending = probe.direction.is_reverse() != forward;
        let mut best: Option<(RecordId, Millimeters)> = None;

        for record in self.store().records() {
            if !record.is_point_object() {
                continue;
            }
            let identity = record.identity();
            if exclude.is_some_and(|id| identity == Some(id.as_str())) {
                continue;
            }

            let mut qualifies = None;
            for group in record.children(PLACEMENT_LABEL) {
                let owner = identity.unwrap_or(record.label());
                if required(group, PLACEMENT_EDGE_PATH, owner)? != probe.edge.as_str() {
                    continue;
                }
                if !*qualifies.get_or_insert_with(|| condition.evaluate(record)) {
                    break;
                }

                let candidate = EdgeRef::from_record(group, owner)?;
                if !orientation.admits(probe.direction, candidate.direction) {
                    continue;
                }
                let distance = if ascending {
                    minus(candidate.offset, probe.offset)?
                } else {
                    minus(probe.offset, candidate.offset)?
                };
                if distance >= 0 && best.as_ref().is_none_or(|(_, d)| distance < *d) {
                    best = Some((entity_id(record)?, distance));
                }
            }
        }

        Ok(best)
    }

    // =========================================================================
    // CONVENIENCE
    // =========================================================================

    /// All reachable point objects of type `label` (any type when `None`),
    /// regardless of facing.
    pub fn paths_of_type(
        &self,
        start: &Position,
        label: Option<&str>,
        forward: bool,
    ) -> Result<Vec<PathMatch>, TrackError> {
        let condition = label.map_or(Condition::Constant(true), Condition::type_is);
        self.search(start, &condition, Orientation::Both, forward)
    }

    /// Identity of the nearest reachable point object of type `label`.
    pub fn next_of_type(
        &self,
        start: &Position,
        label: Option<&str>,
        forward: bool,
    ) -> Result<Option<RecordId>, TrackError> {
        let matches = self.paths_of_type(start, label, forward)?;
        Ok(PathMatch::nearest(&matches).map(|m| m.entity.clone()))
    }
}

/// A matched point object must carry an identity.
fn entity_id(record: &Record) -> Result<RecordId, TrackError> {
    record
        .identity()
        .map(RecordId::new)
        .ok_or_else(|| TrackError::MalformedRecord {
            id: record.label().to_string(),
            field: crate::primitives::IDENTITY_PATH.to_string(),
        })
}

// =============================================================================
// TESTS
// =============================================================================
