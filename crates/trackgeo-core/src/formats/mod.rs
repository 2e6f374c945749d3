//! # Formats
//!
//! Pure transformations between bytes and record stores. File I/O stays in
//! the app layer.
//!
//! - `planpro`: PlanPro XML documents
//! - `persistence`: binary snapshots of a loaded store

pub mod persistence;
pub mod planpro;

pub use persistence::{
    MAX_PERSISTENCE_PAYLOAD_SIZE, PersistenceHeader, container_from_bytes, container_to_bytes,
    is_snapshot,
};
pub use planpro::parse_document;

use crate::{Container, TrackError};

/// Load a store from raw file contents, snapshot or PlanPro XML.
///
/// Snapshots are recognized by their magic bytes; anything else must be
/// UTF-8 XML.
pub fn load_document(bytes: &[u8]) -> Result<Container, TrackError> {
    if is_snapshot(bytes) {
        return container_from_bytes(bytes);
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|e| TrackError::DeserializationError(format!("document is not UTF-8: {e}")))?;
    parse_document(text)
}
