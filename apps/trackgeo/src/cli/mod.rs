//! # trackgeo CLI Module
//!
//! This module implements the CLI interface for trackgeo.
//!
//! ## Available Commands
//!
//! - `status` - Show record counts of the loaded document
//! - `neighbors` - Edges reachable across one edge endpoint
//! - `project` - Every position at a signed distance
//! - `project-path` - The position at a distance along given edges
//! - `distance` - Track distance between two objects
//! - `orientation` - Relative facing of two objects
//! - `search` - Nearest matching objects on every branch
//! - `snapshot` - Write a binary snapshot of the loaded document

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use trackgeo_core::TrackError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// trackgeo - placement geometry on PlanPro track topologies
///
/// Answers where trackside equipment is and how far apart it sits, along
/// the track and respecting switch geometry.
#[derive(Parser, Debug)]
#[command(name = "trackgeo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// PlanPro XML document or trackgeo snapshot
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// TOML config file (defaults to $TRACKGEO_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Maximum number of edges crossed on one path
    #[arg(long, global = true)]
    pub max_hops: Option<usize>,

    /// Maximum number of results per query
    #[arg(long, global = true)]
    pub max_results: Option<usize>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where a query starts: a placed object, or a point on an edge.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct StartArgs {
    /// Identity of a placed object
    #[arg(long)]
    pub from: Option<String>,

    /// Point on an edge: EDGE:OFFSET_MM[:in|gegen|beide]
    #[arg(long)]
    pub at: Option<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show record counts of the loaded document
    Status,

    /// List edges reachable across one endpoint of an edge
    Neighbors {
        /// Edge identity
        #[arg(short, long)]
        edge: String,

        /// Leave through endpoint A instead of endpoint B
        #[arg(long)]
        descending: bool,
    },

    /// Project a position by a signed distance in millimeters
    Project {
        #[command(flatten)]
        start: StartArgs,

        /// Signed distance in millimeters; negative moves against the facing
        #[arg(short, long, allow_hyphen_values = true)]
        distance: i64,
    },

    /// Project a position along an explicit edge sequence
    ProjectPath {
        #[command(flatten)]
        start: StartArgs,

        /// Edge identities in travel order, starting with the start edge
        #[arg(short, long, value_delimiter = ',', required = true)]
        path: Vec<String>,

        /// Distance in millimeters (non-negative)
        #[arg(short, long, allow_hyphen_values = true)]
        distance: i64,

        /// Travel against the start's facing
        #[arg(long)]
        backward: bool,
    },

    /// Track distance between two placed objects
    Distance {
        /// Start object identity
        #[arg(long)]
        from: String,

        /// End object identity
        #[arg(long)]
        to: String,
    },

    /// Relative facing of two placed objects
    Orientation {
        /// Start object identity
        #[arg(long)]
        from: String,

        /// End object identity
        #[arg(long)]
        to: String,
    },

    /// Find the nearest matching objects on every branch
    Search {
        #[command(flatten)]
        start: StartArgs,

        /// Only objects with this record label
        #[arg(short = 't', long = "type")]
        type_label: Option<String>,

        /// Field comparison PATH OP VALUE (repeatable, all must hold)
        #[arg(short = 'w', long = "where")]
        conditions: Vec<String>,

        /// Facing filter: both, equal, opposite, not-connected
        #[arg(short, long, default_value = "both")]
        orientation: String,

        /// Search against the start's facing
        #[arg(long)]
        backward: bool,

        /// Report only the nearest match
        #[arg(long, conflicts_with = "farthest")]
        nearest: bool,

        /// Report only the farthest match
        #[arg(long)]
        farthest: bool,
    },

    /// Write a binary snapshot of the loaded document
    Snapshot {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: &Cli) -> Result<Report, TrackError> {
    let context = Context::open(cli)?;

    match &cli.command {
        Some(Commands::Status) | None => cmd_status(&context),
        Some(Commands::Neighbors { edge, descending }) => {
            cmd_neighbors(&context, edge, !descending)
        }
        Some(Commands::Project { start, distance }) => cmd_project(&context, start, *distance),
        Some(Commands::ProjectPath {
            start,
            path,
            distance,
            backward,
        }) => cmd_project_path(&context, start, path, *distance, !backward),
        Some(Commands::Distance { from, to }) => cmd_distance(&context, from, to),
        Some(Commands::Orientation { from, to }) => cmd_orientation(&context, from, to),
        Some(Commands::Search {
            start,
            type_label,
            conditions,
            orientation,
            backward,
            nearest,
            farthest,
        }) => {
            let pick = match (nearest, farthest) {
                (true, _) => Pick::Nearest,
                (_, true) => Pick::Farthest,
                _ => Pick::All,
            };
            cmd_search(
                &context,
                start,
                type_label.as_deref(),
                conditions,
                orientation,
                !backward,
                pick,
            )
        }
        Some(Commands::Snapshot { output }) => cmd_snapshot(&context, output),
    }
}
