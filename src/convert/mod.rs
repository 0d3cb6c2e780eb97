//! The per-family conversion driver.
//!
//! All three families run the same skeleton (open, branch on compatibility,
//! save or skip, delete the stale original, restore the timestamp), so there
//! is one driver parameterized by a small [`FamilyStrategy`]. The strategy
//! only supplies the branch: given an opened document, decide what to do
//! with it.

use crate::collate::is_lock_artifact;
use crate::error::Result;
use crate::model::{Family, SaveFormat};
use crate::office::{Document, Session, Suite};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

mod excel;
mod powerpoint;
mod word;

pub use excel::ExcelStrategy;
pub use powerpoint::PowerPointStrategy;
pub use word::WordStrategy;

/// What to do with one opened document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavePlan {
    /// Already current; close without saving.
    Skip,
    /// Save under a new path, then delete the stale original.
    ConvertToNew {
        target: PathBuf,
        format: SaveFormat,
        /// Re-normalize and re-save before close (Word leaves a fresh
        /// save-as in compatibility mode otherwise).
        normalize: bool,
    },
    /// Re-save under the same path; nothing is deleted, only the
    /// timestamp is restored afterward.
    ResaveInPlace { format: SaveFormat },
}

pub trait FamilyStrategy {
    fn family(&self) -> Family;
    fn plan(&self, doc: &dyn Document, path: &Path) -> SavePlan;
}

/// Per-family tallies; only used programmatically, never printed as a
/// summary (the run reports through its per-file log lines).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FamilyOutcome {
    pub converted: usize,
    pub resaved_in_place: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Appends the `x`/`m` format suffix to the original file name, so
/// `report.doc` becomes `report.docx` or `report.docm`.
pub fn suffixed_target(path: &Path, has_macros: bool) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push(if has_macros { 'm' } else { 'x' });
    path.with_file_name(name)
}

fn format_ts(ts: SystemTime) -> String {
    DateTime::<Local>::from(ts)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn restore_last_modified(path: &Path, ts: SystemTime) {
    let ft = filetime::FileTime::from_system_time(ts);
    if let Err(err) = filetime::set_file_mtime(path, ft) {
        warn!("Could not restore timestamp on {}: {}", path.display(), err);
    }
}

/// Drive one family's file set through a single application session.
///
/// The session is started once before the loop and quit exactly once after
/// it, no matter how many individual files fail. The only error this
/// returns is a session-start failure, which is fatal for the whole run.
pub fn run_family(
    strategy: &dyn FamilyStrategy,
    suite: &dyn Suite,
    files: &[PathBuf],
) -> Result<FamilyOutcome> {
    let family = strategy.family();
    info!("Starting {} files...", family);

    let mut session = suite.start(family)?;
    let mut outcome = FamilyOutcome::default();
    for file in files {
        process_one(strategy, session.as_mut(), file, &mut outcome);
    }
    session.quit();
    info!("{} files done", family);

    Ok(outcome)
}

fn process_one(
    strategy: &dyn FamilyStrategy,
    session: &mut dyn Session,
    file: &Path,
    outcome: &mut FamilyOutcome,
) {
    // The collator already filters these; cheap re-check in case a lock
    // file appeared between collation and now.
    if is_lock_artifact(file) {
        outcome.skipped += 1;
        return;
    }

    info!("Processing {}", file.display());

    // Captured before any mutation; restored onto whatever file survives.
    let last_modified = match fs::metadata(file).and_then(|m| m.modified()) {
        Ok(ts) => ts,
        Err(err) => {
            info!("-- {}", err);
            outcome.failed += 1;
            return;
        }
    };

    let mut doc = match session.open(file) {
        Ok(doc) => doc,
        Err(err) => {
            // Generally pre-Office-97 files or password-protected ones.
            info!("-- {}", err);
            outcome.failed += 1;
            return;
        }
    };

    match strategy.plan(doc.as_ref(), file) {
        SavePlan::Skip => {
            if let Err(err) = doc.close(false) {
                warn!("-- {}", err);
            }
            info!("- Ignored up-to-date version file: {}", file.display());
            outcome.skipped += 1;
        }
        SavePlan::ConvertToNew {
            target,
            format,
            normalize,
        } => match save_and_close(doc.as_mut(), &target, format, normalize) {
            Ok(()) => {
                if let Err(err) = fs::remove_file(file) {
                    warn!("Could not delete old file {}: {}", file.display(), err);
                }
                restore_last_modified(&target, last_modified);
                info!(
                    "-- Saved as {} w/ TS {}",
                    target.display(),
                    format_ts(last_modified)
                );
                outcome.converted += 1;
            }
            Err(err) => {
                info!("-- Save failed for {}: {}", file.display(), err);
                let _ = doc.close(false);
                outcome.failed += 1;
            }
        },
        SavePlan::ResaveInPlace { format } => {
            match save_and_close(doc.as_mut(), file, format, true) {
                Ok(()) => {
                    restore_last_modified(file, last_modified);
                    info!("-- Re-saved file as current format.");
                    outcome.resaved_in_place += 1;
                }
                Err(err) => {
                    info!("-- Save failed for {}: {}", file.display(), err);
                    let _ = doc.close(false);
                    outcome.failed += 1;
                }
            }
        }
    }
}

fn save_and_close(
    doc: &mut dyn Document,
    target: &Path,
    format: SaveFormat,
    normalize: bool,
) -> Result<()> {
    doc.save_as(target, format)?;
    if normalize {
        doc.normalize_to_current()?;
    }
    doc.close(false)?;
    Ok(())
}
