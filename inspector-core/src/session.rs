//! The inspection session: snapshot ownership and the selection state machine.
//!
//! ```text
//!            long press X
//!   Normal ───────────────────▶ Relative(primary = X)
//!     ▲                             │
//!     └──── long press on primary ──┘
//!
//!   tap      : Normal → selection,  Relative → secondary
//!   swipe    : moves selection (Normal) or secondary (Relative)
//!   rescan   : new snapshot, back to Normal with nothing selected
//! ```
//!
//! Every call that changes visible state notifies the [`RedrawSink`] exactly
//! once; calls that change nothing stay silent.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::element::ElementRecord;
use crate::event::{InspectorGesture, SwipeDirection};
use crate::geometry::Point;
use crate::hierarchy::ElementTree;
use crate::hit_test::hit_test;
use crate::measure::{distances_to_parent, relative_distances, DistanceSegment};
use crate::scan::Scanner;
use crate::settings::{TraversalPolicy, TraversalPolicySource};

/// Which measurement the overlay is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementMode {
    /// One selection, measured against its parent.
    #[default]
    Normal,
    /// Two selections, measured against each other.
    Relative,
}

/// Receives "please redraw" signals.
pub trait RedrawSink {
    /// Fire-and-forget redraw request.
    fn notify(&self);
}

impl<F> RedrawSink for F
where
    F: Fn(),
{
    fn notify(&self) {
        self();
    }
}

/// Sink that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRedrawSink;

impl RedrawSink for NoopRedrawSink {
    fn notify(&self) {}
}

/// One active inspection session.
///
/// Owns the current scan snapshot and the selection state. Driven from a
/// single event thread; nothing here is shared or locked.
pub struct InspectorSession {
    scanner: Option<Scanner>,
    tree: Rc<ElementTree>,
    mode: MeasurementMode,
    selection: Option<ElementRecord>,
    primary: Option<ElementRecord>,
    secondary: Option<ElementRecord>,
    redraw: Box<dyn RedrawSink>,
    traversal: Box<dyn TraversalPolicySource>,
}

impl Default for InspectorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectorSession {
    /// Create an empty session with no scanner, hierarchical traversal and
    /// no redraw sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scanner: None,
            tree: Rc::new(ElementTree::default()),
            mode: MeasurementMode::Normal,
            selection: None,
            primary: None,
            secondary: None,
            redraw: Box::new(NoopRedrawSink),
            traversal: Box::new(TraversalPolicy::Hierarchical),
        }
    }

    /// Attach the scanner used by [`scan_all_elements`](Self::scan_all_elements).
    #[must_use]
    pub fn with_scanner(mut self, scanner: Scanner) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Attach the redraw collaborator.
    #[must_use]
    pub fn with_redraw_sink(mut self, sink: impl RedrawSink + 'static) -> Self {
        self.redraw = Box::new(sink);
        self
    }

    /// Attach the traversal policy setting.
    #[must_use]
    pub fn with_traversal_source(mut self, source: impl TraversalPolicySource + 'static) -> Self {
        self.traversal = Box::new(source);
        self
    }

    /// Scan the frontmost UI and replace the snapshot.
    ///
    /// Returns the number of elements scanned. Without a scanner the
    /// snapshot becomes empty.
    pub fn scan_all_elements(&mut self) -> usize {
        let records = match &self.scanner {
            Some(scanner) => scanner.scan_all(),
            None => {
                tracing::warn!("Rescan requested but no scanner is attached");
                Vec::new()
            }
        };
        self.load_elements(records)
    }

    /// Replace the snapshot with `records` and reset all selection state.
    ///
    /// Returns the number of elements loaded.
    pub fn load_elements(&mut self, records: Vec<ElementRecord>) -> usize {
        self.tree = Rc::new(ElementTree::new(records));
        self.reset_selection();
        tracing::debug!("Loaded snapshot with {} elements", self.tree.len());
        self.redraw.notify();
        self.tree.len()
    }

    /// End the session: drop the snapshot and all selections.
    pub fn clear_scan(&mut self) {
        let had_state = !self.tree.is_empty()
            || self.has_selection()
            || self.mode != MeasurementMode::Normal;
        self.tree = Rc::new(ElementTree::default());
        self.reset_selection();
        if had_state {
            tracing::debug!("Cleared inspection session");
            self.redraw.notify();
        }
    }

    /// Handle a tap. Returns whether the selection changed.
    pub fn handle_tap(&mut self, point: Point) -> bool {
        let Some(hit) = hit_test(self.tree.elements(), point).cloned() else {
            return false;
        };

        let slot = match self.mode {
            MeasurementMode::Normal => &mut self.selection,
            MeasurementMode::Relative => &mut self.secondary,
        };
        if slot.as_ref().is_some_and(|current| current.id == hit.id) {
            return false;
        }

        tracing::debug!("Tap selected {} in {:?} mode", hit.id, self.mode);
        *slot = Some(hit);
        self.redraw.notify();
        true
    }

    /// Handle a long press. Returns whether state changed.
    ///
    /// Long-pressing the primary selection while in relative mode toggles
    /// back to normal mode with that element selected. Any other hit enters
    /// relative mode with the hit as primary.
    pub fn handle_long_press(&mut self, point: Point) -> bool {
        let Some(hit) = hit_test(self.tree.elements(), point).cloned() else {
            return false;
        };

        let toggles_off = self.mode == MeasurementMode::Relative
            && self.primary.as_ref().is_some_and(|p| p.id == hit.id);

        if toggles_off {
            tracing::debug!("Leaving relative mode on {}", hit.id);
            self.mode = MeasurementMode::Normal;
            self.primary = None;
            self.secondary = None;
            self.selection = Some(hit);
        } else {
            tracing::debug!("Entering relative mode with primary {}", hit.id);
            self.mode = MeasurementMode::Relative;
            self.primary = Some(hit);
            self.secondary = None;
            self.selection = None;
        }

        self.redraw.notify();
        true
    }

    /// Handle a navigation swipe. Returns whether the selection moved.
    ///
    /// The anchor is the normal selection, or in relative mode the secondary
    /// selection falling back to the primary. The result always lands in the
    /// normal selection or the secondary slot.
    pub fn handle_swipe(&mut self, direction: SwipeDirection) -> bool {
        let anchor = match self.mode {
            MeasurementMode::Normal => self.selection.as_ref(),
            MeasurementMode::Relative => self.secondary.as_ref().or(self.primary.as_ref()),
        };
        let Some(anchor) = anchor else {
            return false;
        };

        let policy = self.traversal.traversal_policy();
        let tree = &self.tree;
        let candidate = match (direction, policy) {
            (SwipeDirection::Up, _) => tree.parent_of(anchor),
            (SwipeDirection::Down, _) => tree.first_child(anchor),
            (SwipeDirection::Left, TraversalPolicy::Hierarchical) => tree.previous_sibling(anchor),
            (SwipeDirection::Right, TraversalPolicy::Hierarchical) => tree.next_sibling(anchor),
            (SwipeDirection::Left, TraversalPolicy::DepthFirst) => tree.dfs_neighbor(anchor, -1),
            (SwipeDirection::Right, TraversalPolicy::DepthFirst) => tree.dfs_neighbor(anchor, 1),
        };
        let Some(candidate) = candidate.cloned() else {
            tracing::trace!("No {direction:?} target from {} ({policy:?})", anchor.id);
            return false;
        };

        tracing::debug!("Swipe {direction:?} moved to {}", candidate.id);
        match self.mode {
            MeasurementMode::Normal => self.selection = Some(candidate),
            MeasurementMode::Relative => self.secondary = Some(candidate),
        }
        self.redraw.notify();
        true
    }

    /// Dispatch a classified gesture to its handler.
    pub fn handle_gesture(&mut self, gesture: &InspectorGesture) -> bool {
        match *gesture {
            InspectorGesture::Tap { x, y } => self.handle_tap(Point::new(x, y)),
            InspectorGesture::LongPress { x, y } => self.handle_long_press(Point::new(x, y)),
            InspectorGesture::Swipe { direction } => self.handle_swipe(direction),
        }
    }

    /// Current measurement mode.
    #[must_use]
    pub const fn measurement_mode(&self) -> MeasurementMode {
        self.mode
    }

    /// Normal-mode selection.
    #[must_use]
    pub const fn selection(&self) -> Option<&ElementRecord> {
        self.selection.as_ref()
    }

    /// Relative-mode primary selection.
    #[must_use]
    pub const fn primary_selection(&self) -> Option<&ElementRecord> {
        self.primary.as_ref()
    }

    /// Relative-mode secondary selection.
    #[must_use]
    pub const fn secondary_selection(&self) -> Option<&ElementRecord> {
        self.secondary.as_ref()
    }

    /// Every element in the current snapshot, in scan order.
    #[must_use]
    pub fn all_elements(&self) -> &[ElementRecord] {
        self.tree.elements()
    }

    /// Shared handle to the current snapshot.
    ///
    /// The snapshot is never mutated; a rescan installs a new one.
    #[must_use]
    pub fn snapshot(&self) -> Rc<ElementTree> {
        Rc::clone(&self.tree)
    }

    /// Distance diagram between primary and secondary selections.
    ///
    /// Empty unless in relative mode with both selections present.
    #[must_use]
    pub fn relative_distances(&self) -> Vec<DistanceSegment> {
        match (self.mode, &self.primary, &self.secondary) {
            (MeasurementMode::Relative, Some(primary), Some(secondary)) => {
                relative_distances(&primary.bounds, &secondary.bounds)
            }
            _ => Vec::new(),
        }
    }

    /// Spacing between the normal selection and its inferred parent.
    #[must_use]
    pub fn parent_distances(&self) -> Vec<DistanceSegment> {
        if self.mode != MeasurementMode::Normal {
            return Vec::new();
        }
        self.selection
            .as_ref()
            .and_then(|selection| {
                self.tree
                    .parent_of(selection)
                    .map(|parent| distances_to_parent(&selection.bounds, &parent.bounds))
            })
            .unwrap_or_default()
    }

    fn has_selection(&self) -> bool {
        self.selection.is_some() || self.primary.is_some() || self.secondary.is_some()
    }

    fn reset_selection(&mut self) {
        self.mode = MeasurementMode::Normal;
        self.selection = None;
        self.primary = None;
        self.secondary = None;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::element::{ElementId, ElementProperties};
    use crate::geometry::Rect;
    use crate::settings::SharedSettings;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);
    const HEADER: Rect = Rect::new(0.0, 0.0, 400.0, 100.0);
    const BODY: Rect = Rect::new(0.0, 100.0, 400.0, 800.0);
    const TITLE: Rect = Rect::new(16.0, 20.0, 200.0, 60.0);
    const ICON: Rect = Rect::new(340.0, 20.0, 380.0, 60.0);

    fn record(id: u64, bounds: Rect, parent: Option<Rect>) -> ElementRecord {
        let mut record =
            ElementRecord::new(ElementId(id), bounds, ElementProperties::view("View", bounds));
        record.parent_bounds = parent;
        record
    }

    fn sample() -> Vec<ElementRecord> {
        vec![
            record(0, SCREEN, None),
            record(1, HEADER, Some(SCREEN)),
            record(2, TITLE, Some(HEADER)),
            record(3, ICON, Some(HEADER)),
            record(4, BODY, Some(SCREEN)),
        ]
    }

    fn counted_session() -> (InspectorSession, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let mut session =
            InspectorSession::new().with_redraw_sink(move || sink.set(sink.get() + 1));
        session.load_elements(sample());
        count.set(0);
        (session, count)
    }

    fn selected_id(record: Option<&ElementRecord>) -> Option<u64> {
        record.map(|r| r.id.0)
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = InspectorSession::new();
        assert_eq!(session.measurement_mode(), MeasurementMode::Normal);
        assert!(session.selection().is_none());
        assert!(session.all_elements().is_empty());
        assert!(session.relative_distances().is_empty());
    }

    #[test]
    fn test_tap_selects_smallest() {
        let (mut session, redraws) = counted_session();
        assert!(session.handle_tap(Point::new(50.0, 40.0)));
        assert_eq!(selected_id(session.selection()), Some(2));
        assert_eq!(redraws.get(), 1);
    }

    #[test]
    fn test_tap_same_element_is_silent() {
        let (mut session, redraws) = counted_session();
        session.handle_tap(Point::new(50.0, 40.0));
        assert!(!session.handle_tap(Point::new(60.0, 30.0)));
        assert_eq!(redraws.get(), 1);
    }

    #[test]
    fn test_tap_miss_is_noop() {
        let (mut session, redraws) = counted_session();
        assert!(!session.handle_tap(Point::new(500.0, 40.0)));
        assert!(session.selection().is_none());
        assert_eq!(redraws.get(), 0);
    }

    #[test]
    fn test_long_press_enters_relative() {
        let (mut session, redraws) = counted_session();
        session.handle_tap(Point::new(50.0, 40.0));

        assert!(session.handle_long_press(Point::new(350.0, 30.0)));
        assert_eq!(session.measurement_mode(), MeasurementMode::Relative);
        assert_eq!(selected_id(session.primary_selection()), Some(3));
        assert!(session.secondary_selection().is_none());
        assert!(session.selection().is_none());
        assert_eq!(redraws.get(), 2);
    }

    #[test]
    fn test_tap_in_relative_sets_secondary() {
        let (mut session, _) = counted_session();
        session.handle_long_press(Point::new(350.0, 30.0));
        session.handle_tap(Point::new(50.0, 40.0));

        assert_eq!(selected_id(session.primary_selection()), Some(3));
        assert_eq!(selected_id(session.secondary_selection()), Some(2));
        assert!(!session.relative_distances().is_empty());
    }

    #[test]
    fn test_long_press_on_primary_toggles_off() {
        let (mut session, redraws) = counted_session();
        session.handle_long_press(Point::new(350.0, 30.0));
        session.handle_tap(Point::new(50.0, 40.0));

        assert!(session.handle_long_press(Point::new(350.0, 30.0)));
        assert_eq!(session.measurement_mode(), MeasurementMode::Normal);
        assert_eq!(selected_id(session.selection()), Some(3));
        assert!(session.primary_selection().is_none());
        assert!(session.secondary_selection().is_none());
        assert_eq!(redraws.get(), 3);
    }

    #[test]
    fn test_long_press_other_element_restarts_relative() {
        let (mut session, _) = counted_session();
        session.handle_long_press(Point::new(350.0, 30.0));
        session.handle_tap(Point::new(50.0, 40.0));

        session.handle_long_press(Point::new(50.0, 400.0));
        assert_eq!(session.measurement_mode(), MeasurementMode::Relative);
        assert_eq!(selected_id(session.primary_selection()), Some(4));
        assert!(session.secondary_selection().is_none());
    }

    #[test]
    fn test_swipe_hierarchical() {
        let (mut session, redraws) = counted_session();
        session.handle_tap(Point::new(50.0, 40.0));

        assert!(session.handle_swipe(SwipeDirection::Right));
        assert_eq!(selected_id(session.selection()), Some(3));
        assert!(session.handle_swipe(SwipeDirection::Left));
        assert_eq!(selected_id(session.selection()), Some(2));
        assert!(session.handle_swipe(SwipeDirection::Up));
        assert_eq!(selected_id(session.selection()), Some(1));
        assert!(session.handle_swipe(SwipeDirection::Down));
        assert_eq!(selected_id(session.selection()), Some(2));
        assert_eq!(redraws.get(), 5);
    }

    #[test]
    fn test_swipe_left_without_previous_sibling_is_silent() {
        let (mut session, redraws) = counted_session();
        session.handle_tap(Point::new(50.0, 40.0));
        let before = redraws.get();

        assert!(!session.handle_swipe(SwipeDirection::Left));
        assert_eq!(selected_id(session.selection()), Some(2));
        assert_eq!(redraws.get(), before);
    }

    #[test]
    fn test_swipe_without_anchor_is_noop() {
        let (mut session, redraws) = counted_session();
        assert!(!session.handle_swipe(SwipeDirection::Up));
        assert_eq!(redraws.get(), 0);
    }

    #[test]
    fn test_swipe_depth_first_crosses_subtrees() {
        let settings = SharedSettings::default();
        let mut session = InspectorSession::new().with_traversal_source(settings.clone());
        session.load_elements(sample());
        session.handle_tap(Point::new(350.0, 30.0));

        // Icon is the last sibling: hierarchical right is a dead end.
        assert!(!session.handle_swipe(SwipeDirection::Right));

        settings.set_traversal_policy(TraversalPolicy::DepthFirst);
        assert!(session.handle_swipe(SwipeDirection::Right));
        assert_eq!(selected_id(session.selection()), Some(4));
        assert!(session.handle_swipe(SwipeDirection::Left));
        assert_eq!(selected_id(session.selection()), Some(3));
    }

    #[test]
    fn test_swipe_in_relative_moves_secondary() {
        let (mut session, _) = counted_session();
        session.handle_long_press(Point::new(50.0, 40.0));

        // No secondary yet: anchor is the primary, result lands in secondary.
        assert!(session.handle_swipe(SwipeDirection::Up));
        assert_eq!(selected_id(session.primary_selection()), Some(2));
        assert_eq!(selected_id(session.secondary_selection()), Some(1));

        assert!(session.handle_swipe(SwipeDirection::Right));
        assert_eq!(selected_id(session.secondary_selection()), Some(4));
        assert_eq!(selected_id(session.primary_selection()), Some(2));
    }

    #[test]
    fn test_rescan_resets_state() {
        let (mut session, redraws) = counted_session();
        session.handle_long_press(Point::new(50.0, 40.0));
        session.handle_tap(Point::new(350.0, 30.0));

        session.load_elements(sample());
        assert_eq!(session.measurement_mode(), MeasurementMode::Normal);
        assert!(session.primary_selection().is_none());
        assert!(session.secondary_selection().is_none());
        assert_eq!(redraws.get(), 3);
    }

    #[test]
    fn test_clear_scan() {
        let (mut session, redraws) = counted_session();
        session.handle_tap(Point::new(50.0, 40.0));
        session.clear_scan();
        assert!(session.all_elements().is_empty());
        assert!(session.selection().is_none());
        assert_eq!(redraws.get(), 2);

        // Already empty: nothing to redraw.
        session.clear_scan();
        assert_eq!(redraws.get(), 2);
    }

    #[test]
    fn test_snapshot_survives_rescan() {
        let (mut session, _) = counted_session();
        let old = session.snapshot();
        session.load_elements(vec![record(9, SCREEN, None)]);
        assert_eq!(old.len(), 5);
        assert_eq!(session.all_elements().len(), 1);
    }

    #[test]
    fn test_parent_distances_in_normal_mode() {
        let (mut session, _) = counted_session();
        session.handle_tap(Point::new(50.0, 40.0));
        let segments = session.parent_distances();
        // Title inside header: 20 top, 40 bottom, 16 left, 200 right.
        assert_eq!(segments.len(), 4);

        session.handle_long_press(Point::new(50.0, 40.0));
        assert!(session.parent_distances().is_empty());
    }

    #[test]
    fn test_scan_without_scanner_empties_snapshot() {
        let (mut session, _) = counted_session();
        assert_eq!(session.scan_all_elements(), 0);
        assert!(session.all_elements().is_empty());
    }

    #[test]
    fn test_handle_gesture_dispatch() {
        let (mut session, _) = counted_session();
        assert!(session.handle_gesture(&InspectorGesture::Tap { x: 50.0, y: 40.0 }));
        assert!(session.handle_gesture(&InspectorGesture::Swipe {
            direction: SwipeDirection::Up
        }));
        assert_eq!(selected_id(session.selection()), Some(1));
        assert!(session.handle_gesture(&InspectorGesture::LongPress { x: 50.0, y: 40.0 }));
        assert_eq!(session.measurement_mode(), MeasurementMode::Relative);
    }
}
