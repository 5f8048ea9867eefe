//! Element records - one scanned UI node per record.
//!
//! Records are produced by the two scanner backends and unified into one
//! snapshot per scan. Tree position is encoded only by `bounds` and
//! `parent_bounds`; properties never influence hierarchy.

use serde::{Deserialize, Serialize};

use crate::geometry::{Insets, Rect, Size};
use crate::settings::UnitMode;

/// Identifier of an element, unique within one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The UI backend an element was scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementOrigin {
    /// Native view-system element.
    View,
    /// Declarative-toolkit element.
    Declarative,
}

impl std::fmt::Display for ElementOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::View => f.write_str("view"),
            Self::Declarative => f.write_str("declarative"),
        }
    }
}

/// Interaction capabilities reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// Responds to taps.
    #[serde(default)]
    pub clickable: bool,
    /// Responds to long presses.
    #[serde(default)]
    pub long_clickable: bool,
    /// Can be selected.
    #[serde(default)]
    pub selectable: bool,
    /// Can be checked.
    #[serde(default)]
    pub checkable: bool,
    /// Can take input focus.
    #[serde(default)]
    pub focusable: bool,
}

impl Capabilities {
    /// Names of the capabilities that are set, in a fixed order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.clickable, "clickable"),
            (self.long_clickable, "long-clickable"),
            (self.selectable, "selectable"),
            (self.checkable, "checkable"),
            (self.focusable, "focusable"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

/// How an element's background is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    /// A flat color.
    Solid,
    /// A gradient fill.
    Gradient,
    /// A bitmap or vector image.
    Image,
    /// Some other drawable the scanner could not classify.
    Other,
}

/// Text styling for text-bearing elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Text content.
    pub content: String,
    /// Text color as hex.
    pub color: String,
    /// Font size in pixels.
    pub size: f32,
    /// Bold weight.
    #[serde(default)]
    pub bold: bool,
    /// Italic style.
    #[serde(default)]
    pub italic: bool,
}

/// Optional style payload attached to an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ElementStyle {
    /// Background fill.
    Background {
        /// Kind of fill.
        kind: BackgroundKind,
        /// Color as hex, when the fill has a single color.
        color: Option<String>,
    },
    /// Text styling.
    Text(TextStyle),
}

/// Properties of a native view-system element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewProperties {
    /// Class name of the view.
    pub class_name: String,
    /// Resource name, if the view has one.
    #[serde(default)]
    pub resource_name: Option<String>,
    /// Measured size.
    pub size: Size,
    /// Layout margins.
    #[serde(default)]
    pub margins: Insets,
    /// Interaction capabilities.
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Style payload.
    #[serde(default)]
    pub style: Option<ElementStyle>,
}

/// Properties of a declarative-toolkit element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarativeProperties {
    /// Name of the node (usually the composable function).
    pub node_name: String,
    /// Test tag, if the node carries one.
    #[serde(default)]
    pub test_tag: Option<String>,
    /// Measured size.
    pub size: Size,
    /// Padding applied around the node.
    #[serde(default)]
    pub margins: Insets,
    /// Interaction capabilities.
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Style payload.
    #[serde(default)]
    pub style: Option<ElementStyle>,
}

/// Element properties, tagged by the backend that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum ElementProperties {
    /// From the native view backend.
    View(ViewProperties),
    /// From the declarative backend.
    Declarative(DeclarativeProperties),
}

/// A label/value row for the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLine {
    /// Row label.
    pub label: String,
    /// Formatted value.
    pub value: String,
}

impl DetailLine {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

impl ElementProperties {
    /// Minimal native-view properties sized to `bounds`.
    #[must_use]
    pub fn view(class_name: impl Into<String>, bounds: Rect) -> Self {
        Self::View(ViewProperties {
            class_name: class_name.into(),
            resource_name: None,
            size: bounds.into(),
            margins: Insets::default(),
            capabilities: Capabilities::default(),
            style: None,
        })
    }

    /// Minimal declarative properties sized to `bounds`.
    #[must_use]
    pub fn declarative(node_name: impl Into<String>, bounds: Rect) -> Self {
        Self::Declarative(DeclarativeProperties {
            node_name: node_name.into(),
            test_tag: None,
            size: bounds.into(),
            margins: Insets::default(),
            capabilities: Capabilities::default(),
            style: None,
        })
    }

    /// The backend these properties came from.
    #[must_use]
    pub const fn origin(&self) -> ElementOrigin {
        match self {
            Self::View(_) => ElementOrigin::View,
            Self::Declarative(_) => ElementOrigin::Declarative,
        }
    }

    /// Human-readable identifier.
    ///
    /// Prefers the resource name or test tag, falling back to the class or
    /// node name.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::View(view) => view.resource_name.as_deref().unwrap_or(view.class_name.as_str()),
            Self::Declarative(node) => node.test_tag.as_deref().unwrap_or(node.node_name.as_str()),
        }
    }

    /// Measured size.
    #[must_use]
    pub const fn size(&self) -> Size {
        match self {
            Self::View(ViewProperties { size, .. })
            | Self::Declarative(DeclarativeProperties { size, .. }) => *size,
        }
    }

    /// Margin box.
    #[must_use]
    pub const fn margins(&self) -> Insets {
        match self {
            Self::View(ViewProperties { margins, .. })
            | Self::Declarative(DeclarativeProperties { margins, .. }) => *margins,
        }
    }

    /// Interaction capabilities.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        match self {
            Self::View(ViewProperties { capabilities, .. })
            | Self::Declarative(DeclarativeProperties { capabilities, .. }) => *capabilities,
        }
    }

    /// Style payload, if any.
    #[must_use]
    pub const fn style(&self) -> Option<&ElementStyle> {
        match self {
            Self::View(ViewProperties { style, .. })
            | Self::Declarative(DeclarativeProperties { style, .. }) => style.as_ref(),
        }
    }

    /// Rows for the detail panel, with lengths formatted in `unit_mode`.
    #[must_use]
    pub fn detail_lines(&self, unit_mode: UnitMode, density: f32) -> Vec<DetailLine> {
        let fmt = |value: f32| unit_mode.format(value, density);
        let mut lines = Vec::new();

        match self {
            Self::View(view) => {
                lines.push(DetailLine::new("class", view.class_name.as_str()));
                if let Some(name) = &view.resource_name {
                    lines.push(DetailLine::new("id", name.as_str()));
                }
            }
            Self::Declarative(node) => {
                lines.push(DetailLine::new("node", node.node_name.as_str()));
                if let Some(tag) = &node.test_tag {
                    lines.push(DetailLine::new("tag", tag.as_str()));
                }
            }
        }

        let size = self.size();
        lines.push(DetailLine::new(
            "size",
            format!("{} x {}", fmt(size.width), fmt(size.height)),
        ));

        let margins = self.margins();
        if !margins.is_zero() {
            let label = match self {
                Self::View(_) => "margin",
                Self::Declarative(_) => "padding",
            };
            lines.push(DetailLine::new(
                label,
                format!(
                    "{} {} {} {}",
                    fmt(margins.left),
                    fmt(margins.top),
                    fmt(margins.right),
                    fmt(margins.bottom)
                ),
            ));
        }

        let capabilities = self.capabilities().names();
        if !capabilities.is_empty() {
            lines.push(DetailLine::new("capabilities", capabilities.join(", ")));
        }

        match self.style() {
            Some(ElementStyle::Background { kind, color }) => {
                let value = match (kind, color) {
                    (_, Some(color)) => color.clone(),
                    (BackgroundKind::Solid, None) => "solid".to_string(),
                    (BackgroundKind::Gradient, None) => "gradient".to_string(),
                    (BackgroundKind::Image, None) => "image".to_string(),
                    (BackgroundKind::Other, None) => "other".to_string(),
                };
                lines.push(DetailLine::new("background", value));
            }
            Some(ElementStyle::Text(text)) => {
                lines.push(DetailLine::new("text", text.content.as_str()));
                lines.push(DetailLine::new("text color", text.color.as_str()));
                let mut size = fmt(text.size);
                if text.bold {
                    size.push_str(" bold");
                }
                if text.italic {
                    size.push_str(" italic");
                }
                lines.push(DetailLine::new("text size", size));
            }
            None => {}
        }

        lines
    }
}

/// One scanned UI node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Identifier, unique within the scan.
    pub id: ElementId,
    /// Screen-space bounds.
    pub bounds: Rect,
    /// Bounds of the parent node as reported by the backend.
    ///
    /// Matched by value against other records' `bounds`; not a pointer.
    #[serde(default)]
    pub parent_bounds: Option<Rect>,
    /// Backend-specific properties.
    pub properties: ElementProperties,
}

impl ElementRecord {
    /// Create a root-level record.
    #[must_use]
    pub fn new(id: ElementId, bounds: Rect, properties: ElementProperties) -> Self {
        Self {
            id,
            bounds,
            parent_bounds: None,
            properties,
        }
    }

    /// Set the reported parent bounds.
    #[must_use]
    pub fn with_parent_bounds(mut self, parent_bounds: Rect) -> Self {
        self.parent_bounds = Some(parent_bounds);
        self
    }

    /// Replace the id.
    #[must_use]
    pub fn with_id(mut self, id: ElementId) -> Self {
        self.id = id;
        self
    }

    /// The backend this record came from.
    #[must_use]
    pub const fn origin(&self) -> ElementOrigin {
        self.properties.origin()
    }
}
