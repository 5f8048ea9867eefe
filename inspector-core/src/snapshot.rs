//! Serialized scan snapshots.
//!
//! A [`ScanDocument`] is a recorded scan: what both backends reported for one
//! screen. Documents feed the CLI harness and tests, and
//! [`SnapshotScanProvider`] replays one as if it were a live backend.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::element::{ElementOrigin, ElementRecord};
use crate::error::{InspectError, InspectResult};
use crate::scan::{RootHandle, ScanProvider};

/// Current document format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A recorded scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanDocument {
    /// Format version.
    #[serde(default = "ScanDocument::default_version")]
    pub version: u32,
    /// Capture time in milliseconds since epoch.
    #[serde(default)]
    pub captured_at_ms: u64,
    /// Records in scan order.
    pub elements: Vec<ElementRecord>,
}

impl ScanDocument {
    const fn default_version() -> u32 {
        SNAPSHOT_VERSION
    }

    /// Wrap records in a current-version document.
    #[must_use]
    pub fn new(elements: Vec<ElementRecord>, captured_at_ms: u64) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            captured_at_ms,
            elements,
        }
    }

    /// Decode and validate a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the document fails
    /// [`validate`](Self::validate).
    pub fn from_json(json: &str) -> InspectResult<Self> {
        let document: Self = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }

    /// Read and decode a document file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(path: impl AsRef<Path>) -> InspectResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Encode as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> InspectResult<String> {
        serde_json::to_string_pretty(self).map_err(InspectError::Serialization)
    }

    /// Check version, id uniqueness and geometry.
    ///
    /// Empty bounds are allowed (they simply never hit); non-finite edges
    /// are not.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> InspectResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(InspectError::UnsupportedVersion(self.version));
        }

        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(element.id) {
                return Err(InspectError::DuplicateElementId(element.id));
            }
            if !element.bounds.is_finite() {
                return Err(InspectError::InvalidGeometry {
                    id: element.id,
                    reason: "bounds are not finite".to_string(),
                });
            }
            if element.parent_bounds.is_some_and(|p| !p.is_finite()) {
                return Err(InspectError::InvalidGeometry {
                    id: element.id,
                    reason: "parent bounds are not finite".to_string(),
                });
            }
            if element.bounds.is_empty() {
                tracing::warn!("Element {} has empty bounds", element.id);
            }
        }

        Ok(())
    }

    /// Records of one origin, in scan order.
    pub fn records_of(&self, origin: ElementOrigin) -> impl Iterator<Item = &ElementRecord> {
        self.elements.iter().filter(move |e| e.origin() == origin)
    }

    /// Consume the document, yielding its records.
    #[must_use]
    pub fn into_records(self) -> Vec<ElementRecord> {
        self.elements
    }
}

/// A [`ScanProvider`] that replays one origin's records from a document.
#[derive(Debug, Clone)]
pub struct SnapshotScanProvider {
    records: Vec<ElementRecord>,
}

impl SnapshotScanProvider {
    /// Provider for the `origin` records of `document`.
    #[must_use]
    pub fn new(document: &ScanDocument, origin: ElementOrigin) -> Self {
        Self {
            records: document.records_of(origin).cloned().collect(),
        }
    }
}

impl ScanProvider for SnapshotScanProvider {
    fn scan(&self, _root: RootHandle) -> Vec<ElementRecord> {
        self.records.clone()
    }
}
