//! # trackgeo-core
//!
//! The deterministic placement-geometry engine for trackgeo.
//!
//! Answers "where" and "how far" questions about trackside equipment placed
//! on a PlanPro track topology: edges joined at nodes through connection
//! roles, with point objects at offsets along them.
//!
//! ## Operations
//!
//! - adjacency across an edge endpoint (`Topology::neighbors`)
//! - projection by signed distance, free or along a path
//! - track distance and relative orientation of two positions
//! - nearest-match search on every branch, filtered by a `Condition`
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: NO async, NO network dependencies
//! - Read-only: a `Topology` borrows its store for its whole lifetime
//! - Deterministic: ordered collections and integer millimeters only
//! - Bounded: every traversal runs on an explicit work list with hop and
//!   result caps (`SearchLimits`)

// =============================================================================
// MODULES
// =============================================================================

pub mod formats;
pub mod measure;
pub mod position;
pub mod predicate;
pub mod primitives;
pub mod projection;
pub mod query;
pub mod record;
pub mod search;
pub mod store;
pub mod topology;
pub mod types;

#[cfg(test)]
mod testing;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ConnectionRole, EffectiveDirection, LateralSide, Millimeters, NodeId, Orientation, RecordId,
    TrackError,
};

// =============================================================================
// RE-EXPORTS: Records & Topology
// =============================================================================

pub use position::{EdgeRef, Lateral, Position};
pub use predicate::{Condition, Literal, Operator};
pub use query::{Query, QueryKind, QueryOutcome};
pub use record::Record;
pub use search::PathMatch;
pub use store::{Container, RecordStore, parse_millimeters};
pub use topology::{Adjacent, Edge, SearchLimits, Topology};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{
    PersistenceHeader, container_from_bytes, container_to_bytes, load_document, parse_document,
};
