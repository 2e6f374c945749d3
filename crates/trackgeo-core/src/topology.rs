//! # Topology
//!
//! The track graph as the engine sees it: `Edge`s with two endpoints, a
//! connection role at each end, and a length.
//!
//! `Topology` borrows a `RecordStore` immutably for its whole lifetime, so
//! the store cannot change while a query runs. Every query operation
//! (projection, distance, orientation, search) is a method on it.

use crate::primitives::{
    DEFAULT_MAX_HOPS, DEFAULT_MAX_RESULTS, EDGE_LABEL, IDENTITY_PATH, LENGTH_PATH, NODE_A_PATH,
    NODE_B_PATH, ROLE_A_PATH, ROLE_B_PATH,
};
use crate::store::{required, required_millimeters};
use crate::{ConnectionRole, Millimeters, NodeId, Record, RecordId, RecordStore, TrackError};
use serde::{Deserialize, Serialize};

// =============================================================================
// EDGE
// =============================================================================

/// A `TOP_Kante`: a directed track segment between nodes A and B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: RecordId,
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub role_a: ConnectionRole,
    pub role_b: ConnectionRole,
    pub length: Millimeters,
}

impl Edge {
    /// Convert an edge record. Every endpoint field is required.
    pub fn from_record(record: &Record) -> Result<Self, TrackError> {
        let owner = record.identity().unwrap_or(EDGE_LABEL);
        if !record.is_edge() {
            return Err(TrackError::UnexpectedRecord {
                id: owner.to_string(),
                expected: EDGE_LABEL,
                found: record.label().to_string(),
            });
        }

        let id = RecordId::new(required(record, IDENTITY_PATH, owner)?);
        let length = required_millimeters(record, LENGTH_PATH, owner)?;
        if length < 0 {
            return Err(TrackError::MalformedRecord {
                id: owner.to_string(),
                field: LENGTH_PATH.to_string(),
            });
        }

        Ok(Self {
            id,
            node_a: NodeId::new(required(record, NODE_A_PATH, owner)?),
            node_b: NodeId::new(required(record, NODE_B_PATH, owner)?),
            role_a: ConnectionRole::from_token(required(record, ROLE_A_PATH, owner)?),
            role_b: ConnectionRole::from_token(required(record, ROLE_B_PATH, owner)?),
            length,
        })
    }

    /// Node and role at the endpoint travel leaves through.
    #[must_use]
    pub fn exit(&self, ascending: bool) -> (&NodeId, &ConnectionRole) {
        if ascending {
            (&self.node_b, &self.role_b)
        } else {
            (&self.node_a, &self.role_a)
        }
    }

    /// Offset at which travel enters this edge.
    #[must_use]
    pub const fn entry_offset(&self, ascending: bool) -> Millimeters {
        if ascending { 0 } else { self.length }
    }

    /// Distance from `offset` to the exit in the given travel direction.
    pub fn remaining(
        &self,
        offset: Millimeters,
        ascending: bool,
    ) -> Result<Millimeters, TrackError> {
        if ascending { minus(self.length, offset) } else { Ok(offset) }
    }

    /// Fail unless `offset` lies on this edge.
    pub fn check_offset(&self, offset: Millimeters) -> Result<(), TrackError> {
        if (0..=self.length).contains(&offset) {
            return Ok(());
        }
        Err(TrackError::OffsetOutOfRange {
            edge: self.id.to_string(),
            offset,
            length: self.length,
        })
    }
}

// =============================================================================
// CHECKED ARITHMETIC
// =============================================================================

/// `a + b` in millimeters; overflow is an error, never a wrap.
pub(crate) fn plus(a: Millimeters, b: Millimeters) -> Result<Millimeters, TrackError> {
    a.checked_add(b).ok_or(TrackError::DistanceOverflow)
}

/// `a - b` in millimeters; overflow is an error, never a wrap.
pub(crate) fn minus(a: Millimeters, b: Millimeters) -> Result<Millimeters, TrackError> {
    a.checked_sub(b).ok_or(TrackError::DistanceOverflow)
}

/// A neighbor returned by the adjacency resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacent {
    pub edge: Edge,
    /// Continue in ascending endpoint order (entered at A) or descending
    /// (entered at B).
    pub ascending: bool,
}

// =============================================================================
// LIMITS
// =============================================================================

/// Caps that turn runaway traversals into reportable errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Maximum number of edges crossed on one path.
    pub max_hops: usize,
    /// Maximum number of results per call.
    pub max_results: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchLimits {
    /// Fail once a path has crossed more than `max_hops` edges.
    pub(crate) fn check_hops(&self, hops: usize) -> Result<(), TrackError> {
        if hops > self.max_hops {
            tracing::warn!(max_hops = self.max_hops, "hop limit exceeded");
            return Err(TrackError::HopLimitExceeded(self.max_hops));
        }
        Ok(())
    }

    /// Fail once a result list has grown past `max_results`.
    pub(crate) fn check_results(&self, count: usize) -> Result<(), TrackError> {
        if count > self.max_results {
            tracing::warn!(max_results = self.max_results, "result limit exceeded");
            return Err(TrackError::ResultLimitExceeded(self.max_results));
        }
        Ok(())
    }
}

// =============================================================================
// TOPOLOGY
// =============================================================================

/// Query engine over a borrowed record store.
#[derive(Debug)]
pub struct Topology<'s, S: RecordStore + ?Sized> {
    store: &'s S,
    limits: SearchLimits,
}

impl<'s, S: RecordStore + ?Sized> Topology<'s, S> {
    /// Create an engine with default limits.
    #[must_use]
    pub fn new(store: &'s S) -> Self {
        Self::with_limits(store, SearchLimits::default())
    }

    #[must_use]
    pub fn with_limits(store: &'s S, limits: SearchLimits) -> Self {
        Self { store, limits }
    }

    #[must_use]
    pub fn store(&self) -> &'s S {
        self.store
    }

    #[must_use]
    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Resolve an edge by id.
    pub fn edge(&self, id: &RecordId) -> Result<Edge, TrackError> {
        self.store.edge(id)
    }

    /// Edges reachable from `edge` when leaving it in the given direction.
    ///
    /// Leaving ascending means through endpoint B, descending through A. A
    /// candidate matches when it shares the exit node at one of its own
    /// endpoints and the two roles connect. Each candidate appears at most
    /// once, in document order; the match against the candidate's first
    /// endpoint is tried before its second when leaving ascending, and the
    /// other way round when leaving descending.
    pub fn neighbors(&self, edge: &Edge, ascending: bool) -> Result<Vec<Adjacent>, TrackError> {
        let (node, role) = edge.exit(ascending);
        let mut result = Vec::new();

        for record in self.store.records().iter().filter(|r| r.is_edge()) {
            let candidate = Edge::from_record(record)?;
            if candidate.id == edge.id {
                continue;
            }

            let at_a = candidate.node_a == *node && role.connects_to(&candidate.role_a);
            let at_b = candidate.node_b == *node && role.connects_to(&candidate.role_b);
            let entry = match (ascending, at_a, at_b) {
                (true, true, _) | (false, true, false) => Some(true),
                (true, false, true) | (false, _, true) => Some(false),
                _ => None,
            };

            if let Some(continue_ascending) = entry {
                result.push(Adjacent {
                    edge: candidate,
                    ascending: continue_ascending,
                });
            }
        }

        tracing::debug!(
            edge = %edge.id,
            ascending,
            fan_out = result.len(),
            "resolved neighbors"
        );
        Ok(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
