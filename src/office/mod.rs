//! Capability interface to the external Office automation endpoints.
//!
//! The legacy and current document formats, and the document object model,
//! are owned by the installed Office applications. This module only defines
//! the command/response surface the conversion drivers need (open a path,
//! query compatibility, save-as, close, quit), so the drivers can be
//! exercised against a scripted backend in tests. The live COM backend
//! lives in [`com`] and only builds on Windows.

use crate::error::{Error, Result};
use crate::model::{Family, SaveFormat};
use std::path::Path;

#[cfg(windows)]
pub mod com;

/// Compatibility-mode values at or above this are "current"; anything
/// below is still legacy-compatible and gets converted.
pub const CURRENT_COMPATIBILITY: i32 = 15;

/// One opened document, owned by a [`Session`]. Exactly one is open at a
/// time within a family.
pub trait Document {
    /// The document's compatibility indicator. Word reports its numeric
    /// CompatibilityMode; Excel maps its legacy flag onto the same scale
    /// (8 when set, [`CURRENT_COMPATIBILITY`] when clear); PowerPoint has
    /// no indicator and always reports legacy.
    fn compatibility_mode(&self) -> i32;

    /// Whether the document carries an embedded VBA project.
    fn has_macros(&self) -> bool;

    fn save_as(&mut self, target: &Path, format: SaveFormat) -> Result<()>;

    /// Re-normalize to the current format version after a save-as (Word
    /// otherwise leaves the document in compatibility mode). No-op for
    /// the other families.
    fn normalize_to_current(&mut self) -> Result<()>;

    fn close(&mut self, save_changes: bool) -> Result<()>;
}

/// One external application instance, opened before a family's first file
/// and quit exactly once after its last.
pub trait Session {
    fn open(&mut self, path: &Path) -> Result<Box<dyn Document>>;

    /// Ends the application instance. Errors here are of no further use
    /// to anyone, so quitting is infallible.
    fn quit(&mut self);
}

/// Factory for per-family sessions. A start failure is fatal for the run
/// (the corresponding Office product is not installed).
pub trait Suite {
    fn start(&self, family: Family) -> Result<Box<dyn Session>>;
}

/// Backend for platforms without an Office installation to automate.
pub struct UnavailableSuite;

impl Suite for UnavailableSuite {
    fn start(&self, family: Family) -> Result<Box<dyn Session>> {
        Err(Error::NotInstalled(family))
    }
}

#[cfg(windows)]
pub fn default_suite() -> Box<dyn Suite> {
    Box::new(com::ComSuite)
}

#[cfg(not(windows))]
pub fn default_suite() -> Box<dyn Suite> {
    Box::new(UnavailableSuite)
}
