//! Text and JSON renderings of session state.

use std::fmt::Write as _;

use inspector_core::{
    Axis, DistanceSegment, ElementId, ElementRecord, ElementTree, InspectorSession,
    MeasurementMode, UnitMode,
};
use serde::Serialize;

/// Render the hierarchy as an indented outline in depth-first order.
#[must_use]
pub fn format_tree(tree: &ElementTree) -> String {
    let mut out = String::new();
    for element in tree.dfs_order() {
        let depth = depth_of(tree, element);
        let b = element.bounds;
        let _ = writeln!(
            out,
            "{:indent$}{} {} [{}] ({}, {}, {}, {})",
            "",
            element.id,
            element.properties.identifier(),
            element.origin(),
            b.left,
            b.top,
            b.right,
            b.bottom,
            indent = depth * 2
        );
    }
    out
}

// Parent chains can cycle in malformed scans; cap at the element count.
fn depth_of(tree: &ElementTree, element: &ElementRecord) -> usize {
    let mut depth = 0;
    let mut current = element;
    while let Some(parent) = tree.parent_of(current) {
        depth += 1;
        if depth >= tree.len() {
            break;
        }
        current = parent;
    }
    depth
}

/// One line per segment, e.g. `horizontal 24px at y=100`.
#[must_use]
pub fn describe_segments(segments: &[DistanceSegment], unit_mode: UnitMode, density: f32) -> Vec<String> {
    segments
        .iter()
        .map(|s| {
            let value = unit_mode.format(s.value, density);
            match s.axis {
                Axis::Horizontal => format!(
                    "horizontal {value} at y={} ({} -> {})",
                    s.start.y, s.start.x, s.end.x
                ),
                Axis::Vertical => format!(
                    "vertical {value} at x={} ({} -> {})",
                    s.start.x, s.start.y, s.end.y
                ),
            }
        })
        .collect()
}

/// What the overlay would show after a gesture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateReport {
    /// Index of the gesture in the replay.
    pub step: usize,
    /// Whether the gesture changed anything.
    pub changed: bool,
    /// Current mode.
    pub mode: MeasurementMode,
    /// Normal-mode selection.
    pub selection: Option<ElementId>,
    /// Relative-mode primary.
    pub primary: Option<ElementId>,
    /// Relative-mode secondary.
    pub secondary: Option<ElementId>,
    /// Distances drawn for the current mode.
    pub distances: Vec<String>,
}

impl StateReport {
    /// Capture `session` after replay step `step`.
    #[must_use]
    pub fn capture(
        session: &InspectorSession,
        step: usize,
        changed: bool,
        unit_mode: UnitMode,
        density: f32,
    ) -> Self {
        let segments = match session.measurement_mode() {
            MeasurementMode::Normal => session.parent_distances(),
            MeasurementMode::Relative => session.relative_distances(),
        };

        Self {
            step,
            changed,
            mode: session.measurement_mode(),
            selection: session.selection().map(|e| e.id),
            primary: session.primary_selection().map(|e| e.id),
            secondary: session.secondary_selection().map(|e| e.id),
            distances: describe_segments(&segments, unit_mode, density),
        }
    }
}
