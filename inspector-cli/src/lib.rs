//! # Saorsa Inspector CLI
//!
//! Developer harness for the inspection engine. Loads a recorded scan,
//! replays gestures against an [`InspectorSession`] and prints what the
//! overlay would show.
//!
//! ## Usage
//!
//! ```bash
//! ui-inspect --snapshot scan.json tree
//! ui-inspect --snapshot scan.json hit --x 120 --y 340
//! ui-inspect --snapshot scan.json measure --primary 4 --secondary 9
//! ui-inspect --snapshot scan.json --traversal depth-first replay --gestures taps.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `InspectConfig` - Resolved settings (file, then flags/env on top)
//! - `load_session` - Builds a session whose scanner replays the snapshot

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod report;

pub use report::{describe_segments, format_tree, StateReport};

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inspector_core::{
    ElementOrigin, InspectorSession, InspectorSettings, RootHandle, ScanDocument, Scanner,
    SharedSettings, SnapshotScanProvider, TraversalPolicy, UnitMode,
};

/// Command-line arguments for ui-inspect.
#[derive(Debug, Clone, Parser)]
#[command(name = "ui-inspect")]
#[command(about = "Replay UI inspection gestures against a recorded scan")]
#[command(version)]
pub struct CliArgs {
    /// Recorded scan document (JSON)
    #[arg(long, env = "INSPECTOR_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Settings file (JSON); flags below override it
    #[arg(long, env = "INSPECTOR_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Traversal policy for left/right swipes (hierarchical, depth-first)
    #[arg(long, env = "INSPECTOR_TRAVERSAL")]
    pub traversal: Option<TraversalPolicy>,

    /// Display units (px, dp)
    #[arg(long, env = "INSPECTOR_UNITS")]
    pub units: Option<UnitMode>,

    /// What to do with the snapshot
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the inferred hierarchy in depth-first order
    Tree,
    /// Show the element under a point
    Hit {
        /// X coordinate in pixels
        #[arg(long)]
        x: f32,
        /// Y coordinate in pixels
        #[arg(long)]
        y: f32,
    },
    /// Measure between two elements by id
    Measure {
        /// Primary element id
        #[arg(long)]
        primary: u64,
        /// Secondary element id
        #[arg(long)]
        secondary: u64,
    },
    /// Replay a JSON list of gestures, printing state after each
    Replay {
        /// Gesture file (JSON array)
        #[arg(long)]
        gestures: PathBuf,
    },
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Snapshot to load.
    pub snapshot: PathBuf,
    /// Effective settings.
    pub settings: InspectorSettings,
}

impl InspectConfig {
    /// Resolve settings: defaults, then the settings file, then flags.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file was given and cannot be loaded.
    pub fn from_args(args: &CliArgs) -> anyhow::Result<Self> {
        let mut settings = match &args.settings {
            Some(path) => InspectorSettings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => InspectorSettings::default(),
        };
        if let Some(policy) = args.traversal {
            settings.traversal_policy = policy;
        }
        if let Some(units) = args.units {
            settings.unit_mode = units;
        }

        Ok(Self {
            snapshot: args.snapshot.clone(),
            settings,
        })
    }
}

/// Load a snapshot and scan it into a fresh session.
///
/// The document is split by origin into two replaying providers so the
/// session goes through the same scan path as a live device.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be read or fails validation.
pub fn load_session(path: &Path, settings: &SharedSettings) -> anyhow::Result<InspectorSession> {
    let document = ScanDocument::load(path)
        .with_context(|| format!("Failed to load snapshot from {}", path.display()))?;

    let scanner = Scanner::new(
        || Some(RootHandle(0)),
        SnapshotScanProvider::new(&document, ElementOrigin::View),
        SnapshotScanProvider::new(&document, ElementOrigin::Declarative),
    );

    let mut session = InspectorSession::new()
        .with_scanner(scanner)
        .with_traversal_source(settings.clone())
        .with_redraw_sink(|| tracing::trace!("Redraw requested"));
    let count = session.scan_all_elements();
    tracing::info!("Loaded {count} elements from {}", path.display());

    Ok(session)
}
