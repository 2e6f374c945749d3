//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every command returns a `Report` carrying both a JSON value and a text
//! rendering; `main` prints the one `--json-mode` selects.

use super::{Cli, StartArgs};
use crate::config::Config;
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use trackgeo_core::{
    Condition, Container, EffectiveDirection, Orientation, PathMatch, Position, Query, QueryKind,
    QueryOutcome, RecordId, RecordStore, SearchLimits, Topology, TrackError, container_to_bytes,
    formats::MAX_PERSISTENCE_PAYLOAD_SIZE, load_document,
};

// =============================================================================
// FILE HANDLING
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: usize) -> Result<(), TrackError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| TrackError::IoError(format!("Cannot read file metadata: {e}")))?;

    if metadata.len() > max_size as u64 {
        return Err(TrackError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path to a canonical regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, TrackError> {
    let canonical = path.canonicalize().map_err(|e| {
        TrackError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(TrackError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path against its canonical parent directory.
fn validate_output_path(path: &Path) -> Result<PathBuf, TrackError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        TrackError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(TrackError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| TrackError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Read and parse an input document, XML or snapshot.
pub fn load_store(path: &Path) -> Result<Container, TrackError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_PERSISTENCE_PAYLOAD_SIZE)?;

    let data = std::fs::read(&validated)
        .map_err(|e| TrackError::IoError(format!("Read file: {e}")))?;
    let store = load_document(&data)?;
    tracing::info!(
        path = %validated.display(),
        records = store.record_count(),
        "input loaded"
    );
    Ok(store)
}

// =============================================================================
// CONTEXT & REPORT
// =============================================================================

/// Everything a command needs: the loaded store and effective limits.
#[derive(Debug)]
pub struct Context {
    pub input: PathBuf,
    pub store: Container,
    pub limits: SearchLimits,
}

impl Context {
    /// Resolve config and load the input named on the command line.
    pub fn open(cli: &Cli) -> Result<Self, TrackError> {
        let config = Config::resolve(cli.config.as_deref())?;
        let limits = config.limits_with(cli.max_hops, cli.max_results);
        let input = cli.input.clone().ok_or_else(|| {
            TrackError::IoError("No input document given; pass --input FILE".to_string())
        })?;
        let store = load_store(&input)?;
        Ok(Self {
            input,
            store,
            limits,
        })
    }

    fn topology(&self) -> Topology<'_, Container> {
        Topology::with_limits(&self.store, self.limits)
    }

    fn run(&self, kind: QueryKind) -> Result<QueryOutcome, TrackError> {
        self.topology().execute(&Query::new(kind))
    }

    /// Resolve `--from ID` or `--at EDGE:OFFSET_MM[:DIR]`. An edge point
    /// must name a known edge and lie within its length.
    fn start(&self, start: &StartArgs) -> Result<Position, TrackError> {
        match (&start.from, &start.at) {
            (Some(id), _) => self.store.position_of(&RecordId::from(id.as_str())),
            (None, Some(spec)) => {
                let position = parse_edge_point(spec)?;
                for reference in position.refs() {
                    self.store.edge(&reference.edge)?.check_offset(reference.offset)?;
                }
                Ok(position)
            }
            (None, None) => Err(TrackError::IoError(
                "A start is required: --from ID or --at EDGE:OFFSET_MM".to_string(),
            )),
        }
    }
}

/// Parse `EDGE:OFFSET_MM[:DIR]`; the facing defaults to `in`.
pub fn parse_edge_point(spec: &str) -> Result<Position, TrackError> {
    let invalid = || TrackError::InvalidToken {
        kind: "edge point",
        token: spec.to_string(),
    };

    let mut parts = spec.split(':');
    let edge = parts.next().filter(|e| !e.is_empty()).ok_or_else(invalid)?;
    let offset = parts
        .next()
        .and_then(|o| o.trim().parse::<i64>().ok())
        .ok_or_else(invalid)?;
    let direction = match parts.next() {
        Some(token) => EffectiveDirection::from_token(token)?,
        None => EffectiveDirection::Forward,
    };
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(Position::at(RecordId::from(edge), offset, direction))
}

/// Output of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub json: Value,
    pub text: String,
}

impl Report {
    /// The rendering selected by `--json-mode`.
    pub fn render(&self, json_mode: bool) -> Result<String, TrackError> {
        if json_mode {
            serde_json::to_string_pretty(&self.json)
                .map_err(|e| TrackError::SerializationError(e.to_string()))
        } else {
            Ok(self.text.clone())
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, TrackError> {
    serde_json::to_value(value).map_err(|e| TrackError::SerializationError(e.to_string()))
}

fn describe_position(position: &Position) -> String {
    position
        .refs()
        .iter()
        .map(|r| format!("{} @ {} mm ({})", r.edge, r.offset, r.direction))
        .collect::<Vec<_>>()
        .join(" = ")
}

fn describe_match(found: &PathMatch) -> String {
    let edges: Vec<_> = found.edges.iter().map(RecordId::as_str).collect();
    format!(
        "{} at {} mm via {}",
        found.entity,
        found.distance,
        edges.join(" > ")
    )
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show record counts.
pub fn cmd_status(context: &Context) -> Result<Report, TrackError> {
    let store = &context.store;
    let json = json!({
        "input": context.input.to_string_lossy(),
        "records": store.record_count(),
        "edges": store.edge_count(),
        "point_objects": store.point_object_count(),
        "max_hops": context.limits.max_hops,
        "max_results": context.limits.max_results,
    });

    let mut text = String::new();
    let _ = writeln!(text, "trackgeo Document Status");
    let _ = writeln!(text, "========================");
    let _ = writeln!(text, "Input:         {}", context.input.display());
    let _ = writeln!(text, "Records:       {}", store.record_count());
    let _ = writeln!(text, "Edges:         {}", store.edge_count());
    let _ = writeln!(text, "Point objects: {}", store.point_object_count());
    let _ = write!(
        text,
        "Limits:        {} hops, {} results",
        context.limits.max_hops, context.limits.max_results
    );

    Ok(Report { json, text })
}

// =============================================================================
// QUERY COMMANDS
// =============================================================================

/// List neighbors across one endpoint of an edge.
pub fn cmd_neighbors(context: &Context, edge: &str, ascending: bool) -> Result<Report, TrackError> {
    let outcome = context.run(QueryKind::Neighbors {
        edge: RecordId::from(edge),
        ascending,
    })?;
    let json = to_json(&outcome)?;

    let text = match &outcome {
        QueryOutcome::Neighbors(adjacent) if adjacent.is_empty() => {
            format!("No edges beyond {edge}")
        }
        QueryOutcome::Neighbors(adjacent) => adjacent
            .iter()
            .map(|a| {
                let travel = if a.ascending { "ascending" } else { "descending" };
                format!("{} ({travel})", a.edge.id)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => format!("{other:?}"),
    };
    Ok(Report { json, text })
}

/// Project a start by a signed distance.
pub fn cmd_project(
    context: &Context,
    start: &StartArgs,
    distance: i64,
) -> Result<Report, TrackError> {
    let start = context.start(start)?;
    let outcome = context.run(QueryKind::Project { start, distance })?;
    let json = to_json(&outcome)?;

    let text = match &outcome {
        QueryOutcome::Positions(positions) if positions.is_empty() => {
            "No position at that distance".to_string()
        }
        QueryOutcome::Positions(positions) => positions
            .iter()
            .map(describe_position)
            .collect::<Vec<_>>()
            .join("\n"),
        other => format!("{other:?}"),
    };
    Ok(Report { json, text })
}

/// Project a start along an explicit edge sequence.
pub fn cmd_project_path(
    context: &Context,
    start: &StartArgs,
    path: &[String],
    distance: i64,
    forward: bool,
) -> Result<Report, TrackError> {
    let start = context.start(start)?;
    let path = path.iter().map(|id| RecordId::from(id.trim())).collect();
    let outcome = context.run(QueryKind::ProjectOnPath {
        start,
        path,
        distance,
        forward,
    })?;
    let json = to_json(&outcome)?;

    let text = match &outcome {
        QueryOutcome::Position(Some(position)) => describe_position(position),
        QueryOutcome::Position(None) => "Path does not reach that distance".to_string(),
        other => format!("{other:?}"),
    };
    Ok(Report { json, text })
}

/// Track distance between two objects.
pub fn cmd_distance(context: &Context, from: &str, to: &str) -> Result<Report, TrackError> {
    let start = context.store.position_of(&RecordId::from(from))?;
    let end = context.store.position_of(&RecordId::from(to))?;
    let outcome = context.run(QueryKind::Distance { start, end })?;
    let json = to_json(&outcome)?;

    let text = match &outcome {
        QueryOutcome::Distance(Some(mm)) => format!("{from} -> {to}: {mm} mm"),
        QueryOutcome::Distance(None) => format!("{from} -> {to}: not connected"),
        other => format!("{other:?}"),
    };
    Ok(Report { json, text })
}

/// Relative facing of two objects.
pub fn cmd_orientation(context: &Context, from: &str, to: &str) -> Result<Report, TrackError> {
    let start = context.store.position_of(&RecordId::from(from))?;
    let end = context.store.position_of(&RecordId::from(to))?;
    let outcome = context.run(QueryKind::Orientation { start, end })?;
    let json = to_json(&outcome)?;

    let text = match &outcome {
        QueryOutcome::Orientation(orientation) => format!("{from} -> {to}: {orientation}"),
        other => format!("{other:?}"),
    };
    Ok(Report { json, text })
}

/// Which matches a search reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    All,
    Nearest,
    Farthest,
}

/// Search for matching objects on every branch.
pub fn cmd_search(
    context: &Context,
    start: &StartArgs,
    type_label: Option<&str>,
    conditions: &[String],
    orientation: &str,
    forward: bool,
    pick: Pick,
) -> Result<Report, TrackError> {
    let start = context.start(start)?;
    let orientation = Orientation::from_name(orientation)?;

    let mut parts = Vec::with_capacity(conditions.len() + 1);
    if let Some(label) = type_label {
        parts.push(Condition::type_is(label));
    }
    for expression in conditions {
        parts.push(Condition::parse_comparison(expression)?);
    }
    let condition = Condition::all(parts);
    tracing::debug!(%condition, %orientation, forward, "search");

    let outcome = context.run(QueryKind::Search {
        start,
        condition,
        orientation,
        forward,
    })?;
    let matches = match outcome {
        QueryOutcome::Matches(matches) => matches,
        other => {
            return Err(TrackError::SerializationError(format!(
                "unexpected outcome {other:?}"
            )));
        }
    };

    let selected: Vec<PathMatch> = match pick {
        Pick::All => matches,
        Pick::Nearest => PathMatch::nearest(&matches).into_iter().cloned().collect(),
        Pick::Farthest => PathMatch::farthest(&matches).into_iter().cloned().collect(),
    };

    let json = to_json(&QueryOutcome::Matches(selected.clone()))?;
    let text = if selected.is_empty() {
        "No match".to_string()
    } else {
        selected
            .iter()
            .map(describe_match)
            .collect::<Vec<_>>()
            .join("\n")
    };
    Ok(Report { json, text })
}

// =============================================================================
// SNAPSHOT COMMAND
// =============================================================================

/// Write the loaded store as a binary snapshot.
pub fn cmd_snapshot(context: &Context, output: &Path) -> Result<Report, TrackError> {
    let validated = validate_output_path(output)?;
    let data = container_to_bytes(&context.store)?;

    std::fs::write(&validated, &data)
        .map_err(|e| TrackError::IoError(format!("Write file: {e}")))?;
    tracing::info!(path = %validated.display(), bytes = data.len(), "snapshot written");

    let json = json!({
        "output": validated.to_string_lossy(),
        "bytes": data.len(),
        "records": context.store.record_count(),
    });
    let text = format!(
        "Wrote {} bytes ({} records) to {}",
        data.len(),
        context.store.record_count(),
        validated.display()
    );
    Ok(Report { json, text })
}

// =============================================================================
// TESTS
// =============================================================================
