//! # Persistence Format
//!
//! Binary snapshots of a loaded record store.
//!
//! Format: Header (5 bytes) + postcard-serialized record list.
//! - 4 bytes: Magic ("TGEO")
//! - 1 byte: Version
//!
//! ## Validation
//!
//! Size and header are checked before the payload is decoded:
//! - Maximum payload size limit (`MAX_PERSISTENCE_PAYLOAD_SIZE`)
//! - Header validation before payload parsing
//! - Corrupted payloads surface as errors

use crate::{Container, Record, RecordStore, TrackError, primitives};

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum allowed snapshot size.
///
/// Checked BEFORE deserialization so corrupt or hostile input cannot force
/// a large allocation.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 500 * 1024 * 1024; // 500 MB

/// Header length: magic plus version byte.
const HEADER_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The persistence header precedes all record data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), TrackError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(TrackError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(TrackError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrackError> {
        let Some(header) = bytes.get(..HEADER_SIZE) else {
            return Err(TrackError::DeserializationError(
                "Header too short".to_string(),
            ));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[0..4]);
        Ok(Self {
            magic,
            version: header[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `bytes` start with the snapshot magic, whatever the version.
#[must_use]
pub fn is_snapshot(bytes: &[u8]) -> bool {
    bytes.starts_with(primitives::MAGIC_BYTES)
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a store to bytes (header + payload).
///
/// This is a pure transformation - no file I/O.
pub fn container_to_bytes(container: &Container) -> Result<Vec<u8>, TrackError> {
    let header = PersistenceHeader::new();
    let payload = postcard::to_stdvec(container.records())
        .map_err(|e| TrackError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    tracing::debug!(
        records = container.record_count(),
        bytes = result.len(),
        "snapshot encoded"
    );
    Ok(result)
}

/// Deserialize a store from bytes.
///
/// This is a pure transformation - no file I/O. Size and header are
/// validated before the payload is touched.
pub fn container_from_bytes(bytes: &[u8]) -> Result<Container, TrackError> {
    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(TrackError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[HEADER_SIZE..];
    let records: Vec<Record> = postcard::from_bytes(payload).map_err(|e| {
        TrackError::DeserializationError(format!("Failed to decode snapshot records: {e}"))
    })?;

    Ok(Container::from_records(records))
}

// =============================================================================
// TESTS
// =============================================================================
