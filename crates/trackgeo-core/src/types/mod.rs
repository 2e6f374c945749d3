//! # Core Type Definitions
//!
//! This module contains the vocabulary shared by every part of the engine:
//! - Record and node identifiers (`RecordId`, `NodeId`)
//! - Direction and connection tokens (`EffectiveDirection`, `ConnectionRole`)
//! - Relative facing (`Orientation`) and lateral placement (`LateralSide`)
//! - Error types (`TrackError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer millimeters for every distance (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Distances and offsets, always in integer millimeters.
pub type Millimeters = i64;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identity key of a record (`Identitaet/Wert`).
///
/// Used for edges and point objects alike; the store resolves both.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a topological junction (`TOP_Knoten`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

// =============================================================================
// EFFECTIVE DIRECTION
// =============================================================================

/// Facing of an entity relative to the ascending endpoint order of its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveDirection {
    /// `in`: faces from endpoint A towards endpoint B.
    Forward,
    /// `gegen`: faces from endpoint B towards endpoint A.
    Reverse,
    /// `beide`: effective in both directions.
    Both,
}

impl EffectiveDirection {
    /// Parse a PlanPro `Wirkrichtung` token.
    pub fn from_token(token: &str) -> Result<Self, TrackError> {
        match token {
            "in" => Ok(Self::Forward),
            "gegen" => Ok(Self::Reverse),
            "beide" => Ok(Self::Both),
            other => Err(TrackError::InvalidToken {
                kind: "Wirkrichtung",
                token: other.to_string(),
            }),
        }
    }

    /// The PlanPro token for this direction.
    #[must_use]
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Forward => "in",
            Self::Reverse => "gegen",
            Self::Both => "beide",
        }
    }

    /// Only `Reverse` inverts movement; `Both` travels like `Forward`.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::Reverse)
    }

    /// The same facing seen from an edge with opposite endpoint order.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
            Self::Both => Self::Both,
        }
    }
}

impl fmt::Display for EffectiveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

// =============================================================================
// CONNECTION ROLE
// =============================================================================

/// How an edge attaches to the node at one of its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConnectionRole {
    /// `Verbindung`: plain continuation.
    Through,
    /// `Links`: left leg of a switch.
    LeftBranch,
    /// `Rechts`: right leg of a switch.
    RightBranch,
    /// `Spitze`: the point (tip) side of a switch.
    PointTip,
    /// Track end, buffer stop, section cut. Never adjacent to anything.
    Other(String),
}

impl ConnectionRole {
    /// Parse a PlanPro `TOP_Anschluss` token.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "Verbindung" => Self::Through,
            "Links" => Self::LeftBranch,
            "Rechts" => Self::RightBranch,
            "Spitze" => Self::PointTip,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether travel may pass from an endpoint with this role into an
    /// endpoint with `other` at the same node.
    ///
    /// The two legs of a switch are never connected to each other.
    #[must_use]
    pub fn connects_to(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Through, Self::Through)
                | (Self::LeftBranch, Self::PointTip)
                | (Self::RightBranch, Self::PointTip)
                | (Self::PointTip, Self::LeftBranch)
                | (Self::PointTip, Self::RightBranch)
        )
    }
}

// =============================================================================
// ORIENTATION
// =============================================================================

/// Relative facing of two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    NotConnected,
    Equal,
    Opposite,
    /// At least one side is effective in both directions.
    Both,
}

impl Orientation {
    /// Classify two facings expressed on the same edge.
    #[must_use]
    pub const fn between(start: EffectiveDirection, end: EffectiveDirection) -> Self {
        use EffectiveDirection::{Forward, Reverse};
        match (start, end) {
            (Forward, Forward) | (Reverse, Reverse) => Self::Equal,
            (Forward, Reverse) | (Reverse, Forward) => Self::Opposite,
            _ => Self::Both,
        }
    }

    /// Whether a search filtered by `self` accepts a candidate facing
    /// `candidate` when the probe faces `probe`.
    ///
    /// Only definite mismatches are rejected; `Both` facings always pass.
    #[must_use]
    pub const fn admits(self, probe: EffectiveDirection, candidate: EffectiveDirection) -> bool {
        match Self::between(probe, candidate) {
            Self::Equal => !matches!(self, Self::Opposite),
            Self::Opposite => !matches!(self, Self::Equal),
            _ => true,
        }
    }

    /// Parse a user-facing name (`both`, `equal`, `opposite`, `not-connected`).
    pub fn from_name(name: &str) -> Result<Self, TrackError> {
        match name {
            "not-connected" => Ok(Self::NotConnected),
            "equal" => Ok(Self::Equal),
            "opposite" => Ok(Self::Opposite),
            "both" => Ok(Self::Both),
            other => Err(TrackError::InvalidToken {
                kind: "orientation",
                token: other.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotConnected => "not-connected",
            Self::Equal => "equal",
            Self::Opposite => "opposite",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// LATERAL PLACEMENT
// =============================================================================

/// `Seitliche_Lage`: which side of the track an entity sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LateralSide {
    Left,
    Right,
}

impl LateralSide {
    pub fn from_token(token: &str) -> Result<Self, TrackError> {
        match token {
            "links" => Ok(Self::Left),
            "rechts" => Ok(Self::Right),
            other => Err(TrackError::InvalidToken {
                kind: "Seitliche_Lage",
                token: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the trackgeo engine.
///
/// - No silent failures: data errors surface, logical non-results do not
/// - Use `Result<T, TrackError>` for fallible operations
/// - The engine never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum TrackError {
    /// A referenced record id does not resolve in the store.
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// A record is missing a field the engine requires.
    #[error("Malformed record {id}: missing or invalid {field}")]
    MalformedRecord { id: String, field: String },

    /// A record resolved but has the wrong kind.
    #[error("Record {id} is a {found}, expected {expected}")]
    UnexpectedRecord {
        id: String,
        expected: &'static str,
        found: String,
    },

    /// A token is not part of its vocabulary.
    #[error("Invalid {kind} token: {token:?}")]
    InvalidToken { kind: &'static str, token: String },

    /// A position must carry at least one edge reference.
    #[error("Position has no edge reference")]
    EmptyPosition,

    /// Path-constrained projection only accepts non-negative distances.
    #[error("Negative distance not allowed here: {0}")]
    NegativeDistance(i64),

    /// Offset or distance arithmetic left the `i64` millimeter range.
    #[error("Distance overflow: result exceeds the millimeter range")]
    DistanceOverflow,

    /// An edge point lies outside its edge.
    #[error("Offset {offset} mm is outside edge {edge} (length {length} mm)")]
    OffsetOutOfRange {
        edge: String,
        offset: Millimeters,
        length: Millimeters,
    },

    /// A traversal crossed more edges than the configured cap.
    #[error("Hop limit exceeded: more than {0} edges on one path")]
    HopLimitExceeded(usize),

    /// A query produced more results than the configured cap.
    #[error("Result limit exceeded: more than {0} results")]
    ResultLimitExceeded(usize),

    /// A predicate expression could not be parsed.
    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
