//! # Saorsa Inspector Core
//!
//! On-device UI inspection engine. Tap an element to see its bounds and
//! spacing, swipe to walk the hierarchy, long-press to measure between two
//! elements.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  inspector-core                  │
//! ├──────────────────────────────────────────────────┤
//! │  Scanner            │  ElementTree               │
//! │  - native backend   │  - parent / children       │
//! │  - declarative      │  - siblings                │
//! │  - id normalization │  - depth-first order       │
//! ├──────────────────────────────────────────────────┤
//! │  InspectorSession   │  Measurement               │
//! │  - hit testing      │  - overlap classification  │
//! │  - Normal/Relative  │  - distance segments       │
//! │  - swipe traversal  │  - spacing to parent       │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Hierarchy is inferred purely from geometry: a record's `parent_bounds`
//! is matched against other records' `bounds`. Drawing, gesture detection
//! and the platform walkers are collaborators behind the traits in
//! [`scan`], [`session`] and [`settings`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod hierarchy;
pub mod measure;
pub mod scan;
pub mod session;
pub mod settings;
pub mod snapshot;

pub use element::{
    BackgroundKind, Capabilities, DeclarativeProperties, DetailLine, ElementId, ElementOrigin,
    ElementProperties, ElementRecord, ElementStyle, TextStyle, ViewProperties,
};
pub use error::{InspectError, InspectResult};
pub use event::{InspectorGesture, SwipeDirection};
pub use geometry::{Insets, Point, Rect, Size};
pub use hierarchy::{build_dfs_order, ElementTree};
pub use hit_test::hit_test;
pub use measure::{distances_to_parent, relative_distances, Axis, DistanceSegment, OverlapKind};
pub use scan::{RootHandle, ScanProvider, Scanner, TopHandleProvider};
pub use session::{InspectorSession, MeasurementMode, NoopRedrawSink, RedrawSink};
pub use settings::{
    InspectorSettings, SharedSettings, TraversalPolicy, TraversalPolicySource, UnitMode,
    UnitModeSource,
};
pub use snapshot::{ScanDocument, SnapshotScanProvider, SNAPSHOT_VERSION};

/// Inspector core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
