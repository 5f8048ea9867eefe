//! Scanner seams: where element records come from.
//!
//! The platform walkers live outside this crate. Each backend is a
//! [`ScanProvider`]; a [`TopHandleProvider`] says what is on screen right
//! now. [`Scanner`] runs both backends over the current root and unifies
//! their output into one record sequence.

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementRecord};

/// Opaque handle to the root of whatever is frontmost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RootHandle(pub u64);

/// One UI backend's walker over the visible tree.
pub trait ScanProvider {
    /// Walk the visible tree under `root` and report every element.
    fn scan(&self, root: RootHandle) -> Vec<ElementRecord>;
}

/// Resolves the current frontmost root at call time.
pub trait TopHandleProvider {
    /// The frontmost root, or `None` if nothing is showing.
    fn current(&self) -> Option<RootHandle>;
}

impl<F> TopHandleProvider for F
where
    F: Fn() -> Option<RootHandle>,
{
    fn current(&self) -> Option<RootHandle> {
        self()
    }
}

/// Runs both backends over the frontmost root.
pub struct Scanner {
    top: Box<dyn TopHandleProvider>,
    native: Box<dyn ScanProvider>,
    declarative: Box<dyn ScanProvider>,
}

impl Scanner {
    /// Create a scanner from its collaborators.
    #[must_use]
    pub fn new(
        top: impl TopHandleProvider + 'static,
        native: impl ScanProvider + 'static,
        declarative: impl ScanProvider + 'static,
    ) -> Self {
        Self {
            top: Box::new(top),
            native: Box::new(native),
            declarative: Box::new(declarative),
        }
    }

    /// Scan whatever is frontmost.
    ///
    /// Returns an empty sequence when no root is available.
    #[must_use]
    pub fn scan_all(&self) -> Vec<ElementRecord> {
        match self.top.current() {
            Some(root) => self.scan_root(root),
            None => {
                tracing::debug!("No frontmost root to scan");
                Vec::new()
            }
        }
    }

    /// Scan a specific root.
    ///
    /// Native records come first, then declarative ones. Ids are reassigned
    /// `0..n` in that order so they are unique within the scan even when
    /// each backend numbers from zero.
    #[must_use]
    pub fn scan_root(&self, root: RootHandle) -> Vec<ElementRecord> {
        let native = self.native.scan(root);
        let declarative = self.declarative.scan(root);
        tracing::debug!(
            "Scanned root {}: {} native, {} declarative",
            root.0,
            native.len(),
            declarative.len()
        );

        native
            .into_iter()
            .chain(declarative)
            .zip(0u64..)
            .map(|(record, id)| record.with_id(ElementId(id)))
            .collect()
    }
}
