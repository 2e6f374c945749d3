//! # Query Module
//!
//! Structured query types for engine interaction.
//!
//! - One variant per engine operation, serializable so callers can record
//!   or replay queries
//! - Optional per-query limits override the topology's own
//! - `Topology::execute` is the single dispatch point the CLI goes through

use crate::{
    Adjacent, Condition, Millimeters, Orientation, PathMatch, Position, RecordId, RecordStore,
    SearchLimits, Topology, TrackError,
};
use serde::{Deserialize, Serialize};

/// Query operation types supported by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Edges reachable across the exit endpoint of one edge.
    Neighbors { edge: RecordId, ascending: bool },

    /// Every position at a signed track distance.
    Project {
        start: Position,
        distance: Millimeters,
    },

    /// The position at a distance along an explicit edge sequence.
    ProjectOnPath {
        start: Position,
        path: Vec<RecordId>,
        distance: Millimeters,
        forward: bool,
    },

    /// Shortest track distance between two positions.
    Distance { start: Position, end: Position },

    /// Relative facing of two positions.
    Orientation { start: Position, end: Position },

    /// Nearest matching entities on every branch.
    Search {
        start: Position,
        condition: Condition,
        orientation: Orientation,
        forward: bool,
    },
}

/// A structured query with optional limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// The operation to run.
    pub kind: QueryKind,
    /// Limits for this query only; `None` uses the topology's.
    #[serde(default)]
    pub limits: Option<SearchLimits>,
}

impl Query {
    /// Create a new query with the topology's limits.
    #[must_use]
    pub fn new(kind: QueryKind) -> Self {
        Self { kind, limits: None }
    }

    /// Create a new query with its own limits.
    #[must_use]
    pub fn with_limits(kind: QueryKind, limits: SearchLimits) -> Self {
        Self {
            kind,
            limits: Some(limits),
        }
    }

    /// Neighbors helper.
    #[must_use]
    pub fn neighbors(edge: RecordId, ascending: bool) -> Self {
        Self::new(QueryKind::Neighbors { edge, ascending })
    }

    /// Distance helper.
    #[must_use]
    pub fn distance(start: Position, end: Position) -> Self {
        Self::new(QueryKind::Distance { start, end })
    }

    /// Orientation helper.
    #[must_use]
    pub fn orientation(start: Position, end: Position) -> Self {
        Self::new(QueryKind::Orientation { start, end })
    }
}

/// Result of one executed query, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QueryOutcome {
    Neighbors(Vec<Adjacent>),
    Positions(Vec<Position>),
    Position(Option<Position>),
    Distance(Option<Millimeters>),
    Orientation(Orientation),
    Matches(Vec<PathMatch>),
}

impl<S: RecordStore + ?Sized> Topology<'_, S> {
    /// Run one query against this topology.
    pub fn execute(&self, query: &Query) -> Result<QueryOutcome, TrackError> {
        let limits = query.limits.unwrap_or_else(|| self.limits());
        let topology = Topology::with_limits(self.store(), limits);
        tracing::debug!(?query.kind, "executing query");

        match &query.kind {
            QueryKind::Neighbors { edge, ascending } => {
                let edge = topology.edge(edge)?;
                topology
                    .neighbors(&edge, *ascending)
                    .map(QueryOutcome::Neighbors)
            }
            QueryKind::Project { start, distance } => {
                topology.project(start, *distance).map(QueryOutcome::Positions)
            }
            QueryKind::ProjectOnPath {
                start,
                path,
                distance,
                forward,
            } => topology
                .project_on_path(start, path, *distance, *forward)
                .map(QueryOutcome::Position),
            QueryKind::Distance { start, end } => {
                topology.distance(start, end).map(QueryOutcome::Distance)
            }
            QueryKind::Orientation { start, end } => {
                topology.orientation(start, end).map(QueryOutcome::Orientation)
            }
            QueryKind::Search {
                start,
                condition,
                orientation,
                forward,
            } => topology
                .search(start, condition, *orientation, *forward)
                .map(QueryOutcome::Matches),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
