//! Hierarchy inference from bounding boxes.
//!
//! Neither backend exposes a tree both can share, so structure is rebuilt
//! from geometry alone: an element's parent is whichever element has
//! `bounds` exactly equal to its reported `parent_bounds`.
//!
//! ```text
//!   record.parent_bounds ──equals──▶ other.bounds   ⇒  other is the parent
//! ```
//!
//! Two unrelated elements that happen to share identical bounds will be
//! treated as related. That approximation is accepted; lookups degrade to
//! `None` rather than erroring.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementRecord};
use crate::geometry::Rect;

/// Hash key with the same equality as `Rect`'s `PartialEq`.
///
/// `-0.0` is folded into `0.0`; rectangles with NaN edges equal nothing and
/// are never keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BoundsKey([u32; 4]);

impl BoundsKey {
    fn of(rect: &Rect) -> Option<Self> {
        let edges = [rect.left, rect.top, rect.right, rect.bottom];
        if edges.iter().any(|v| v.is_nan()) {
            return None;
        }
        Some(Self(edges.map(|v| if v == 0.0 { 0.0_f32.to_bits() } else { v.to_bits() })))
    }
}

/// An immutable scan snapshot with its inferred hierarchy.
///
/// Built once per scan; every query is a lookup against indexes computed at
/// construction, so navigation gestures stay cheap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ElementRecord>", into = "Vec<ElementRecord>")]
pub struct ElementTree {
    elements: Vec<ElementRecord>,
    by_id: HashMap<ElementId, usize>,
    by_bounds: HashMap<BoundsKey, Vec<usize>>,
    by_parent_bounds: HashMap<BoundsKey, Vec<usize>>,
    dfs: Vec<usize>,
}

impl From<Vec<ElementRecord>> for ElementTree {
    fn from(elements: Vec<ElementRecord>) -> Self {
        Self::new(elements)
    }
}

impl From<ElementTree> for Vec<ElementRecord> {
    fn from(tree: ElementTree) -> Self {
        tree.elements
    }
}

impl ElementTree {
    /// Index `elements` and materialize the depth-first order.
    #[must_use]
    pub fn new(elements: Vec<ElementRecord>) -> Self {
        let mut by_id = HashMap::with_capacity(elements.len());
        let mut by_bounds: HashMap<BoundsKey, Vec<usize>> = HashMap::new();
        let mut by_parent_bounds: HashMap<BoundsKey, Vec<usize>> = HashMap::new();

        for (index, element) in elements.iter().enumerate() {
            by_id.entry(element.id).or_insert(index);
            if let Some(key) = BoundsKey::of(&element.bounds) {
                by_bounds.entry(key).or_default().push(index);
            }
            if let Some(key) = element.parent_bounds.as_ref().and_then(BoundsKey::of) {
                by_parent_bounds.entry(key).or_default().push(index);
            }
        }

        let mut tree = Self {
            elements,
            by_id,
            by_bounds,
            by_parent_bounds,
            dfs: Vec::new(),
        };
        tree.dfs = tree.build_dfs();
        tree
    }

    /// All elements in scan order.
    #[must_use]
    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when the snapshot holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up an element by id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&ElementRecord> {
        self.by_id.get(&id).map(|&index| &self.elements[index])
    }

    /// The inferred parent of `element`.
    ///
    /// The first element (in scan order) whose bounds equal the reported
    /// parent bounds. An element reporting its own bounds as its parent's
    /// has no parent, mirroring the self-match exclusion in
    /// [`children_of`](Self::children_of).
    #[must_use]
    pub fn parent_of(&self, element: &ElementRecord) -> Option<&ElementRecord> {
        let parent_bounds = element.parent_bounds?;
        if parent_bounds == element.bounds {
            return None;
        }
        let key = BoundsKey::of(&parent_bounds)?;
        self.by_bounds
            .get(&key)
            .and_then(|candidates| candidates.first())
            .map(|&index| &self.elements[index])
    }

    /// Elements that report `element`'s bounds as their parent bounds.
    ///
    /// Excludes anything bound-identical to `element`, sorted by top then
    /// left edge.
    #[must_use]
    pub fn children_of(&self, element: &ElementRecord) -> Vec<&ElementRecord> {
        self.child_indices(&element.bounds)
            .into_iter()
            .map(|index| &self.elements[index])
            .collect()
    }

    /// Siblings of `element`, itself included, in display order.
    ///
    /// Roots have no siblings.
    #[must_use]
    pub fn siblings_of(&self, element: &ElementRecord) -> Vec<&ElementRecord> {
        self.parent_of(element)
            .map(|parent| self.children_of(parent))
            .unwrap_or_default()
    }

    /// The sibling displayed just before `element`.
    #[must_use]
    pub fn previous_sibling(&self, element: &ElementRecord) -> Option<&ElementRecord> {
        let siblings = self.siblings_of(element);
        let position = siblings.iter().position(|s| s.id == element.id)?;
        position.checked_sub(1).map(|prev| siblings[prev])
    }

    /// The sibling displayed just after `element`.
    #[must_use]
    pub fn next_sibling(&self, element: &ElementRecord) -> Option<&ElementRecord> {
        let siblings = self.siblings_of(element);
        let position = siblings.iter().position(|s| s.id == element.id)?;
        siblings.get(position + 1).copied()
    }

    /// First child in display order.
    #[must_use]
    pub fn first_child(&self, element: &ElementRecord) -> Option<&ElementRecord> {
        self.child_indices(&element.bounds)
            .first()
            .map(|&index| &self.elements[index])
    }

    /// The materialized depth-first pre-order.
    pub fn dfs_order(&self) -> impl Iterator<Item = &ElementRecord> {
        self.dfs.iter().map(|&index| &self.elements[index])
    }

    /// Position of `id` within the depth-first order.
    #[must_use]
    pub fn dfs_position(&self, id: ElementId) -> Option<usize> {
        let index = *self.by_id.get(&id)?;
        self.dfs.iter().position(|&i| i == index)
    }

    /// The element `offset` steps away from `element` in depth-first order.
    #[must_use]
    pub fn dfs_neighbor(&self, element: &ElementRecord, offset: isize) -> Option<&ElementRecord> {
        let position = self.dfs_position(element.id)?;
        let target = position.checked_add_signed(offset)?;
        self.dfs.get(target).map(|&index| &self.elements[index])
    }

    fn child_indices(&self, bounds: &Rect) -> Vec<usize> {
        let Some(key) = BoundsKey::of(bounds) else {
            return Vec::new();
        };
        let children: Vec<usize> = self
            .by_parent_bounds
            .get(&key)
            .map(|indices| {
                indices
                    .iter()
                    .copied()
                    .filter(|&index| self.elements[index].bounds != *bounds)
                    .collect()
            })
            .unwrap_or_default();
        self.sorted_indices(children)
    }

    fn sorted_indices(&self, mut indices: Vec<usize>) -> Vec<usize> {
        indices.sort_by(|&a, &b| {
            self.elements[a]
                .bounds
                .position_cmp(&self.elements[b].bounds)
        });
        indices
    }

    fn build_dfs(&self) -> Vec<usize> {
        let roots = self.sorted_indices(
            (0..self.elements.len())
                .filter(|&index| self.parent_of(&self.elements[index]).is_none())
                .collect(),
        );

        let mut visited = HashSet::with_capacity(self.elements.len());
        let mut order = Vec::with_capacity(self.elements.len());
        for root in roots {
            self.visit(root, &mut visited, &mut order);
        }

        if order.len() < self.elements.len() {
            // Only reachable when parent links form a loop with no root.
            let stranded = self.sorted_indices(
                (0..self.elements.len())
                    .filter(|index| !visited.contains(index))
                    .collect(),
            );
            tracing::warn!(
                "{} elements unreachable from any root, likely a parent cycle",
                stranded.len()
            );
            for index in stranded {
                self.visit(index, &mut visited, &mut order);
            }
        }

        order
    }

    fn visit(&self, start: usize, visited: &mut HashSet<usize>, order: &mut Vec<usize>) {
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            if !visited.insert(index) {
                tracing::trace!("Skipping revisit of {}", self.elements[index].id);
                continue;
            }
            order.push(index);
            let children = self.child_indices(&self.elements[index].bounds);
            stack.extend(children.into_iter().rev().filter(|c| !visited.contains(c)));
        }
    }
}

/// Depth-first pre-order of `elements` by inferred hierarchy.
///
/// Roots come in top/left order, each followed by its descendants. Every
/// element appears exactly once, even when parent links form a cycle.
#[must_use]
pub fn build_dfs_order(elements: &[ElementRecord]) -> Vec<ElementRecord> {
    ElementTree::new(elements.to_vec())
        .dfs_order()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementProperties;

    fn record(id: u64, bounds: Rect, parent: Option<Rect>) -> ElementRecord {
        let mut record =
            ElementRecord::new(ElementId(id), bounds, ElementProperties::view("View", bounds));
        record.parent_bounds = parent;
        record
    }

    const SCREEN: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);
    const HEADER: Rect = Rect::new(0.0, 0.0, 400.0, 100.0);
    const BODY: Rect = Rect::new(0.0, 100.0, 400.0, 800.0);
    const TITLE: Rect = Rect::new(16.0, 20.0, 200.0, 60.0);
    const ICON: Rect = Rect::new(340.0, 20.0, 380.0, 60.0);

    /// screen ─┬─ header ─┬─ title
    ///         │          └─ icon
    ///         └─ body
    fn sample() -> ElementTree {
        ElementTree::new(vec![
            record(0, SCREEN, None),
            record(1, BODY, Some(SCREEN)),
            record(2, HEADER, Some(SCREEN)),
            record(3, ICON, Some(HEADER)),
            record(4, TITLE, Some(HEADER)),
        ])
    }

    fn ids<'a>(records: impl IntoIterator<Item = &'a ElementRecord>) -> Vec<u64> {
        records.into_iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn test_parent_of() {
        let tree = sample();
        let title = tree.get(ElementId(4)).expect("title");
        assert_eq!(tree.parent_of(title).map(|p| p.id), Some(ElementId(2)));

        let screen = tree.get(ElementId(0)).expect("screen");
        assert!(tree.parent_of(screen).is_none());
    }

    #[test]
    fn test_parent_of_unmatched_bounds_is_root() {
        let tree = ElementTree::new(vec![record(0, TITLE, Some(Rect::new(1.0, 2.0, 3.0, 4.0)))]);
        assert!(tree.parent_of(&tree.elements()[0]).is_none());
    }

    #[test]
    fn test_children_sorted_by_top_then_left() {
        let tree = sample();
        let screen = tree.get(ElementId(0)).expect("screen");
        assert_eq!(ids(tree.children_of(screen)), vec![2, 1]);

        let header = tree.get(ElementId(2)).expect("header");
        assert_eq!(ids(tree.children_of(header)), vec![4, 3]);
    }

    #[test]
    fn test_children_exclude_bound_identical() {
        let tree = ElementTree::new(vec![
            record(0, SCREEN, None),
            record(1, SCREEN, Some(SCREEN)),
            record(2, HEADER, Some(SCREEN)),
        ]);
        let screen = tree.get(ElementId(0)).expect("screen");
        assert_eq!(ids(tree.children_of(screen)), vec![2]);

        let filler = tree.get(ElementId(1)).expect("filler");
        assert!(tree.parent_of(filler).is_none());
    }

    #[test]
    fn test_siblings_and_neighbors() {
        let tree = sample();
        let title = tree.get(ElementId(4)).expect("title");
        let icon = tree.get(ElementId(3)).expect("icon");

        assert_eq!(ids(tree.siblings_of(title)), vec![4, 3]);
        assert_eq!(tree.next_sibling(title).map(|s| s.id), Some(ElementId(3)));
        assert!(tree.previous_sibling(title).is_none());
        assert_eq!(tree.previous_sibling(icon).map(|s| s.id), Some(ElementId(4)));
        assert!(tree.next_sibling(icon).is_none());
    }

    #[test]
    fn test_roots_have_no_siblings() {
        let tree = ElementTree::new(vec![record(0, HEADER, None), record(1, BODY, None)]);
        let header = tree.get(ElementId(0)).expect("header");
        assert!(tree.siblings_of(header).is_empty());
        assert!(tree.next_sibling(header).is_none());
    }

    #[test]
    fn test_dfs_order_is_preorder() {
        let tree = sample();
        assert_eq!(ids(tree.dfs_order()), vec![0, 2, 4, 3, 1]);
    }

    #[test]
    fn test_dfs_neighbors() {
        let tree = sample();
        let header = tree.get(ElementId(2)).expect("header");
        assert_eq!(tree.dfs_neighbor(header, 1).map(|e| e.id), Some(ElementId(4)));
        assert_eq!(tree.dfs_neighbor(header, -1).map(|e| e.id), Some(ElementId(0)));

        let screen = tree.get(ElementId(0)).expect("screen");
        assert!(tree.dfs_neighbor(screen, -1).is_none());
        let body = tree.get(ElementId(1)).expect("body");
        assert!(tree.dfs_neighbor(body, 1).is_none());
    }

    #[test]
    fn test_dfs_survives_parent_cycle() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(100.0, 0.0, 150.0, 50.0);
        let tree = ElementTree::new(vec![
            record(0, a, Some(b)),
            record(1, b, Some(a)),
            record(2, SCREEN, None),
        ]);

        assert_eq!(ids(tree.dfs_order()), vec![2, 0, 1]);
    }

    #[test]
    fn test_dfs_shared_child_emitted_once() {
        // Two elements with identical bounds both claim the same child.
        let tree = ElementTree::new(vec![
            record(0, HEADER, None),
            record(1, HEADER, None),
            record(2, TITLE, Some(HEADER)),
        ]);
        assert_eq!(ids(tree.dfs_order()), vec![0, 2, 1]);
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let parent = Rect::new(0.0, 0.0, 100.0, 100.0);
        let reported = Rect::new(-0.0, -0.0, 100.0, 100.0);
        let tree = ElementTree::new(vec![
            record(0, parent, None),
            record(1, Rect::new(10.0, 10.0, 20.0, 20.0), Some(reported)),
        ]);
        let child = tree.get(ElementId(1)).expect("child");
        assert_eq!(tree.parent_of(child).map(|p| p.id), Some(ElementId(0)));
    }

    #[test]
    fn test_build_dfs_order_free_function() {
        let tree = sample();
        let order = build_dfs_order(tree.elements());
        assert_eq!(ids(&order), vec![0, 2, 4, 3, 1]);
    }

    #[test]
    fn test_serde_round_trip_rebuilds_indexes() {
        let tree = sample();
        let json = serde_json::to_string(&tree).expect("serialize");
        let back: ElementTree = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(ids(back.dfs_order()), ids(tree.dfs_order()));
    }
}
