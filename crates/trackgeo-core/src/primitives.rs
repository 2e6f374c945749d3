//! # Innate Primitives
//!
//! Hardcoded constants for the trackgeo engine: PlanPro labels and field
//! paths the boundary conversions read, default traversal caps, and the
//! snapshot header.
//!
//! These are compiled into the binary and are immutable at runtime.

// =============================================================================
// PLANPRO LABELS
// =============================================================================

/// Label of the element holding all infrastructure records.
pub const CONTAINER_LABEL: &str = "Container";

/// Label of topological edge records.
pub const EDGE_LABEL: &str = "TOP_Kante";

/// Child label marking a point object's placement on one edge.
pub const PLACEMENT_LABEL: &str = "Punkt_Objekt_TOP_Kante";

/// Identity field of every record.
pub const IDENTITY_PATH: &str = "Identitaet/Wert";

// =============================================================================
// EDGE FIELD PATHS
// =============================================================================

pub const NODE_A_PATH: &str = "ID_TOP_Knoten_A/Wert";
pub const NODE_B_PATH: &str = "ID_TOP_Knoten_B/Wert";
pub const ROLE_A_PATH: &str = "TOP_Kante_Allg/TOP_Anschluss_A/Wert";
pub const ROLE_B_PATH: &str = "TOP_Kante_Allg/TOP_Anschluss_B/Wert";
pub const LENGTH_PATH: &str = "TOP_Kante_Allg/TOP_Laenge/Wert";

// =============================================================================
// PLACEMENT FIELD PATHS
// =============================================================================

pub const PLACEMENT_EDGE_PATH: &str = "ID_TOP_Kante/Wert";
pub const PLACEMENT_OFFSET_PATH: &str = "Abstand/Wert";
pub const PLACEMENT_DIRECTION_PATH: &str = "Wirkrichtung/Wert";
pub const PLACEMENT_SIDE_PATH: &str = "Seitliche_Lage/Wert";
pub const PLACEMENT_LATERAL_PATH: &str = "Seitlicher_Abstand/Wert";

// =============================================================================
// UNITS
// =============================================================================

/// Source documents give lengths in meters with millimeter precision.
pub const MILLIMETERS_PER_METER: i64 = 1000;

/// Fractional meter digits that survive conversion; further digits truncate.
pub const METER_FRACTION_DIGITS: usize = 3;

// =============================================================================
// TRAVERSAL LIMITS
// =============================================================================

/// Maximum number of edges crossed on a single path.
///
/// - Every traversal is computationally bounded.
/// - Zero-length connection cycles hit this cap instead of looping.
pub const DEFAULT_MAX_HOPS: usize = 1000;

/// Maximum number of results a single query may return.
pub const DEFAULT_MAX_RESULTS: usize = 10_000;

// =============================================================================
// SNAPSHOT FORMAT
// =============================================================================

/// Magic bytes for the trackgeo snapshot header.
///
/// - File Header = Magic Bytes ("TGEO") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"TGEO";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;
