//! Inspector settings and the sources the engine reads them through.
//!
//! Two settings matter to the core: how lengths are displayed and which
//! traversal policy swipes follow. Both live outside the state machine and
//! are read at the moment they are needed, so flipping a setting mid-session
//! takes effect on the next gesture.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::InspectResult;

/// Display unit for lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    /// Physical pixels.
    #[default]
    Px,
    /// Density-independent pixels.
    Dp,
}

impl UnitMode {
    /// Format a pixel length for display.
    ///
    /// Pixels are rounded to whole numbers. Density-independent values are
    /// divided by `density` and keep one decimal when fractional. A
    /// non-positive or non-finite density is treated as 1.0.
    #[must_use]
    pub fn format(self, pixels: f32, density: f32) -> String {
        match self {
            Self::Px => format!("{}px", pixels.round()),
            Self::Dp => {
                let density = if density.is_finite() && density > 0.0 {
                    density
                } else {
                    1.0
                };
                let dp = (pixels / density * 10.0).round() / 10.0;
                if dp.fract().abs() < f32::EPSILON {
                    format!("{dp}dp")
                } else {
                    format!("{dp:.1}dp")
                }
            }
        }
    }
}

impl std::str::FromStr for UnitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "px" => Ok(Self::Px),
            "dp" => Ok(Self::Dp),
            other => Err(format!("unknown unit mode: {other}")),
        }
    }
}

/// How swipes move the selection through the inferred tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalPolicy {
    /// Left/right move between siblings.
    #[default]
    Hierarchical,
    /// Left/right step through the depth-first order.
    DepthFirst,
}

impl std::str::FromStr for TraversalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "hierarchical" | "tree" => Ok(Self::Hierarchical),
            "depth_first" | "dfs" => Ok(Self::DepthFirst),
            other => Err(format!("unknown traversal policy: {other}")),
        }
    }
}

/// Read access to the unit display setting.
pub trait UnitModeSource {
    /// Current unit mode.
    fn unit_mode(&self) -> UnitMode;

    /// Display density used for dp conversion.
    fn density(&self) -> f32 {
        1.0
    }
}

/// Read access to the traversal policy setting.
pub trait TraversalPolicySource {
    /// Current traversal policy.
    fn traversal_policy(&self) -> TraversalPolicy;
}

impl TraversalPolicySource for TraversalPolicy {
    fn traversal_policy(&self) -> TraversalPolicy {
        *self
    }
}

impl UnitModeSource for UnitMode {
    fn unit_mode(&self) -> UnitMode {
        *self
    }
}

/// Persisted inspector settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InspectorSettings {
    /// Unit used when formatting lengths.
    #[serde(default)]
    pub unit_mode: UnitMode,
    /// Policy used for left/right swipes.
    #[serde(default)]
    pub traversal_policy: TraversalPolicy,
    /// Display density (pixels per dp).
    #[serde(default = "InspectorSettings::default_density")]
    pub density: f32,
}

impl Default for InspectorSettings {
    fn default() -> Self {
        Self {
            unit_mode: UnitMode::default(),
            traversal_policy: TraversalPolicy::default(),
            density: Self::default_density(),
        }
    }
}

impl InspectorSettings {
    const fn default_density() -> f32 {
        1.0
    }

    /// Load settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> InspectResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded inspector settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> InspectResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl UnitModeSource for InspectorSettings {
    fn unit_mode(&self) -> UnitMode {
        self.unit_mode
    }

    fn density(&self) -> f32 {
        self.density
    }
}

impl TraversalPolicySource for InspectorSettings {
    fn traversal_policy(&self) -> TraversalPolicy {
        self.traversal_policy
    }
}

/// Shared read/write handle to settings for single-threaded collaborators.
///
/// Clones share the same underlying settings.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings(Rc<RefCell<InspectorSettings>>);

impl SharedSettings {
    /// Wrap existing settings.
    #[must_use]
    pub fn new(settings: InspectorSettings) -> Self {
        Self(Rc::new(RefCell::new(settings)))
    }

    /// Copy of the current settings.
    #[must_use]
    pub fn get(&self) -> InspectorSettings {
        *self.0.borrow()
    }

    /// Change the unit mode.
    pub fn set_unit_mode(&self, unit_mode: UnitMode) {
        self.0.borrow_mut().unit_mode = unit_mode;
    }

    /// Change the traversal policy.
    pub fn set_traversal_policy(&self, policy: TraversalPolicy) {
        self.0.borrow_mut().traversal_policy = policy;
    }
}

impl UnitModeSource for SharedSettings {
    fn unit_mode(&self) -> UnitMode {
        self.0.borrow().unit_mode
    }

    fn density(&self) -> f32 {
        self.0.borrow().density
    }
}

impl TraversalPolicySource for SharedSettings {
    fn traversal_policy(&self) -> TraversalPolicy {
        self.0.borrow().traversal_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_format_rounds() {
        assert_eq!(UnitMode::Px.format(20.0, 3.0), "20px");
        assert_eq!(UnitMode::Px.format(19.6, 1.0), "20px");
    }

    #[test]
    fn test_dp_format() {
        assert_eq!(UnitMode::Dp.format(48.0, 2.0), "24dp");
        assert_eq!(UnitMode::Dp.format(25.0, 2.0), "12.5dp");
        assert_eq!(UnitMode::Dp.format(10.0, 3.0), "3.3dp");
    }

    #[test]
    fn test_dp_format_bad_density_falls_back() {
        assert_eq!(UnitMode::Dp.format(16.0, 0.0), "16dp");
        assert_eq!(UnitMode::Dp.format(16.0, f32::NAN), "16dp");
    }

    #[test]
    fn test_parse_settings_values() {
        assert_eq!("DP".parse::<UnitMode>(), Ok(UnitMode::Dp));
        assert_eq!(
            "depth-first".parse::<TraversalPolicy>(),
            Ok(TraversalPolicy::DepthFirst)
        );
        assert_eq!(
            "tree".parse::<TraversalPolicy>(),
            Ok(TraversalPolicy::Hierarchical)
        );
        assert!("sideways".parse::<TraversalPolicy>().is_err());
    }

    #[test]
    fn test_settings_defaults_from_empty_json() {
        let settings: InspectorSettings = serde_json::from_str("{}").expect("parse");
        assert_eq!(settings, InspectorSettings::default());
        assert!((settings.density - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_settings_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let settings = InspectorSettings {
            unit_mode: UnitMode::Dp,
            traversal_policy: TraversalPolicy::DepthFirst,
            density: 2.75,
        };

        settings.save(&path).expect("save");
        let loaded = InspectorSettings::load(&path).expect("load");
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = InspectorSettings::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(crate::InspectError::Io(_))));
    }

    #[test]
    fn test_shared_settings_are_shared() {
        let shared = SharedSettings::default();
        let reader = shared.clone();
        assert_eq!(reader.traversal_policy(), TraversalPolicy::Hierarchical);

        shared.set_traversal_policy(TraversalPolicy::DepthFirst);
        shared.set_unit_mode(UnitMode::Dp);
        assert_eq!(reader.traversal_policy(), TraversalPolicy::DepthFirst);
        assert_eq!(reader.unit_mode(), UnitMode::Dp);
    }
}
