//! # Record Store
//!
//! The flat collection of infrastructure records the engine reads from.
//!
//! This module defines the `RecordStore` trait (identity lookup plus document
//! order), the in-memory `Container` implementation, and the boundary
//! conversions that normalize source units and tokens before any record
//! reaches the engine.

use crate::primitives::{METER_FRACTION_DIGITS, MILLIMETERS_PER_METER};
use crate::{Edge, Millimeters, Position, Record, RecordId, TrackError};
use std::collections::BTreeMap;

// =============================================================================
// RECORDSTORE TRAIT
// =============================================================================

/// Read-only access to the loaded records.
///
/// The engine borrows a store for the lifetime of a `Topology`; it never
/// writes through this interface.
pub trait RecordStore {
    /// Resolve a record by its identity key.
    fn lookup_by_id(&self, id: &str) -> Option<&Record>;

    /// All records in document order.
    fn records(&self) -> &[Record];

    /// Resolve and convert an edge record.
    fn edge(&self, id: &RecordId) -> Result<Edge, TrackError> {
        let record = self
            .lookup_by_id(id.as_str())
            .ok_or_else(|| TrackError::RecordNotFound(id.to_string()))?;
        Edge::from_record(record)
    }

    /// Resolve a point object and read its placements.
    fn position_of(&self, id: &RecordId) -> Result<Position, TrackError> {
        let record = self
            .lookup_by_id(id.as_str())
            .ok_or_else(|| TrackError::RecordNotFound(id.to_string()))?;
        Position::from_record(record)
    }
}

// =============================================================================
// CONTAINER
// =============================================================================

/// In-memory store over the children of a PlanPro `Container`.
///
/// Uses `BTreeMap` for the identity index; on duplicate ids the first
/// record in document order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    records: Vec<Record>,
    index: BTreeMap<String, usize>,
}

impl Container {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a container from records in document order.
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut container = Self::new();
        for record in records {
            container.push(record);
        }
        container
    }

    /// Append a record, indexing it by identity when it has one.
    pub fn push(&mut self, record: Record) {
        if let Some(id) = record.identity() {
            if self.index.contains_key(id) {
                tracing::debug!(id, "duplicate identity, keeping the first record");
            } else {
                self.index.insert(id.to_string(), self.records.len());
            }
        }
        self.records.push(record);
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_edge()).count()
    }

    #[must_use]
    pub fn point_object_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_point_object()).count()
    }
}

impl RecordStore for Container {
    fn lookup_by_id(&self, id: &str) -> Option<&Record> {
        self.index.get(id).and_then(|&i| self.records.get(i))
    }

    fn records(&self) -> &[Record] {
        &self.records
    }
}

// =============================================================================
// BOUNDARY CONVERSIONS
// =============================================================================

/// Read a required text field, reporting the owning record on failure.
pub(crate) fn required<'r>(record: &'r Record, path: &str, owner: &str) -> Result<&'r str, TrackError> {
    record
        .value(path)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| TrackError::MalformedRecord {
            id: owner.to_string(),
            field: path.to_string(),
        })
}

/// Convert a decimal meter string to integer millimeters.
///
/// Digits past the third fractional place truncate toward zero; the sign is
/// kept. Integer arithmetic only, so `"0.1"` is exactly 100 mm.
pub fn parse_millimeters(text: &str) -> Option<Millimeters> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let meters: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut millis: i64 = 0;
    for position in 0..METER_FRACTION_DIGITS {
        let digit = fraction.as_bytes().get(position).map_or(0, |b| i64::from(b - b'0'));
        millis = millis * 10 + digit;
    }

    let magnitude = meters.checked_mul(MILLIMETERS_PER_METER)?.checked_add(millis)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Read a required meter field as millimeters.
pub(crate) fn required_millimeters(
    record: &Record,
    path: &str,
    owner: &str,
) -> Result<Millimeters, TrackError> {
    let text = required(record, path, owner)?;
    parse_millimeters(text).ok_or_else(|| TrackError::MalformedRecord {
        id: owner.to_string(),
        field: path.to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
