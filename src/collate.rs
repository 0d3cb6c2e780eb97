use crate::model::Family;
use colored::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Reserved filename prefix Office gives the transient lock file of a
/// currently-open document. Anything carrying it is skipped outright.
pub const LOCK_FILE_MARKER: &str = "~$";

/// One discovered file set per family, built once and consumed once.
#[derive(Debug, Default)]
pub struct FileSets {
    pub word: Vec<PathBuf>,
    pub excel: Vec<PathBuf>,
    pub powerpoint: Vec<PathBuf>,
}

impl FileSets {
    pub fn for_family(&self, family: Family) -> &[PathBuf] {
        match family {
            Family::Word => &self.word,
            Family::Excel => &self.excel,
            Family::PowerPoint => &self.powerpoint,
        }
    }

    pub fn total(&self) -> usize {
        self.word.len() + self.excel.len() + self.powerpoint.len()
    }
}

pub fn is_lock_artifact(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().contains(LOCK_FILE_MARKER))
        .unwrap_or(false)
}

fn matches_family(path: &Path, family: Family) -> bool {
    let ext = match path.extension() {
        Some(e) => e.to_string_lossy().to_lowercase(),
        None => return false,
    };
    family.extensions().contains(&ext.as_str())
}

/// Recursively enumerate `root` and partition matches into the enabled
/// families, dropping lock-file artifacts. An empty result is a normal
/// outcome, not an error.
pub fn collate(root: &Path, enabled: &[Family]) -> FileSets {
    info!("Starting file collation in root of {}", root.display());

    let mut sets = FileSets::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if is_lock_artifact(path) {
            continue;
        }
        for family in enabled {
            if matches_family(path, *family) {
                match family {
                    Family::Word => sets.word.push(path.to_path_buf()),
                    Family::Excel => sets.excel.push(path.to_path_buf()),
                    Family::PowerPoint => sets.powerpoint.push(path.to_path_buf()),
                }
                break;
            }
        }
    }

    for family in enabled {
        info!(
            "{} {} files.",
            sets.for_family(*family).len().to_string().green(),
            family
        );
    }
    info!("File collation done.");

    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_artifacts_are_detected_by_marker() {
        assert!(is_lock_artifact(Path::new("/tmp/~$report.doc")));
        assert!(!is_lock_artifact(Path::new("/tmp/report.doc")));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(matches_family(Path::new("A.DOC"), Family::Word));
        assert!(matches_family(Path::new("b.Xls"), Family::Excel));
        assert!(!matches_family(Path::new("c.pdf"), Family::Word));
        assert!(!matches_family(Path::new("noext"), Family::Word));
    }
}
