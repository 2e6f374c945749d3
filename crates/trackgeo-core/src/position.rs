//! # Position Model
//!
//! A `Position` is a location on the track graph: an optional identity plus a
//! non-empty list of `EdgeRef`s. More than one reference means the location
//! sits exactly on an edge boundary and is expressible relative to each of
//! the touching edges. Every algorithm enumerates all references; none is
//! treated as the canonical one.

use crate::primitives::{
    PLACEMENT_DIRECTION_PATH, PLACEMENT_EDGE_PATH, PLACEMENT_LABEL, PLACEMENT_LATERAL_PATH,
    PLACEMENT_OFFSET_PATH, PLACEMENT_SIDE_PATH,
};
use crate::store::{parse_millimeters, required, required_millimeters};
use crate::{EffectiveDirection, LateralSide, Millimeters, Record, RecordId, TrackError};
use serde::{Deserialize, Serialize};

// =============================================================================
// EDGE REFERENCE
// =============================================================================

/// Side and distance from the track axis. Carried, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lateral {
    pub side: Option<LateralSide>,
    pub offset: Millimeters,
}

/// A location relative to one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRef {
    /// The edge this reference is expressed on.
    pub edge: RecordId,
    /// Distance from the edge's endpoint A, in `[0, length]` for results.
    pub offset: Millimeters,
    /// Facing relative to the edge's endpoint order.
    pub direction: EffectiveDirection,
    #[serde(default)]
    pub lateral: Option<Lateral>,
}

impl EdgeRef {
    #[must_use]
    pub fn new(edge: RecordId, offset: Millimeters, direction: EffectiveDirection) -> Self {
        Self {
            edge,
            offset,
            direction,
            lateral: None,
        }
    }

    #[must_use]
    pub fn with_lateral(mut self, lateral: Lateral) -> Self {
        self.lateral = Some(lateral);
        self
    }

    /// Read a `Punkt_Objekt_TOP_Kante` group. `owner` names the enclosing
    /// record in errors.
    ///
    /// A missing `Wirkrichtung` means the object acts in both directions.
    pub fn from_record(group: &Record, owner: &str) -> Result<Self, TrackError> {
        let edge = RecordId::new(required(group, PLACEMENT_EDGE_PATH, owner)?);
        let offset = required_millimeters(group, PLACEMENT_OFFSET_PATH, owner)?;
        let direction = match group.value(PLACEMENT_DIRECTION_PATH) {
            Some(token) => EffectiveDirection::from_token(token.trim())?,
            None => EffectiveDirection::Both,
        };

        let side = group
            .value(PLACEMENT_SIDE_PATH)
            .map(|token| LateralSide::from_token(token.trim()))
            .transpose()?;
        let lateral_offset = group
            .value(PLACEMENT_LATERAL_PATH)
            .map(|text| {
                parse_millimeters(text).ok_or_else(|| TrackError::MalformedRecord {
                    id: owner.to_string(),
                    field: PLACEMENT_LATERAL_PATH.to_string(),
                })
            })
            .transpose()?;

        let reference = Self::new(edge, offset, direction);
        Ok(match (side, lateral_offset) {
            (None, None) => reference,
            (side, offset) => reference.with_lateral(Lateral {
                side,
                offset: offset.unwrap_or(0),
            }),
        })
    }
}

// =============================================================================
// POSITION
// =============================================================================

/// A located entity or hypothetical point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PositionFields")]
pub struct Position {
    identity: Option<RecordId>,
    refs: Vec<EdgeRef>,
}

/// Wire form of a `Position`, checked by `Position::new` on the way in.
#[derive(Deserialize)]
struct PositionFields {
    #[serde(default)]
    identity: Option<RecordId>,
    refs: Vec<EdgeRef>,
}

impl TryFrom<PositionFields> for Position {
    type Error = TrackError;

    fn try_from(fields: PositionFields) -> Result<Self, Self::Error> {
        Self::new(fields.identity, fields.refs)
    }
}

impl Position {
    /// Build a position; at least one reference is required.
    pub fn new(identity: Option<RecordId>, refs: Vec<EdgeRef>) -> Result<Self, TrackError> {
        if refs.is_empty() {
            return Err(TrackError::EmptyPosition);
        }
        Ok(Self { identity, refs })
    }

    /// An anonymous position on a single edge.
    #[must_use]
    pub fn at(edge: RecordId, offset: Millimeters, direction: EffectiveDirection) -> Self {
        Self::from(EdgeRef::new(edge, offset, direction))
    }

    /// Read a point object record: its identity and every placement group.
    pub fn from_record(record: &Record) -> Result<Self, TrackError> {
        let identity = record.identity().map(RecordId::new);
        let owner = identity
            .as_ref()
            .map_or_else(|| record.label().to_string(), |id| id.to_string());

        let refs = record
            .children(PLACEMENT_LABEL)
            .map(|group| EdgeRef::from_record(group, &owner))
            .collect::<Result<Vec<_>, _>>()?;
        if refs.is_empty() {
            return Err(TrackError::UnexpectedRecord {
                id: owner,
                expected: "point object",
                found: record.label().to_string(),
            });
        }
        Self::new(identity, refs)
    }

    #[must_use]
    pub fn identity(&self) -> Option<&RecordId> {
        self.identity.as_ref()
    }

    /// Edge references, never empty.
    #[must_use]
    pub fn refs(&self) -> &[EdgeRef] {
        &self.refs
    }
}

impl From<EdgeRef> for Position {
    fn from(reference: EdgeRef) -> Self {
        Self {
            identity: None,
            refs: vec![reference],
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
