use super::{suffixed_target, FamilyStrategy, SavePlan};
use crate::model::{Family, SaveFormat};
use crate::office::{Document, CURRENT_COMPATIBILITY};
use std::path::Path;

/// Word is the one family with a graded compatibility indicator, and so
/// the one with a sub-branch: true binary `.doc` files get a renamed
/// save-as, while early x-format files (2007-era) that are still flagged
/// outdated are re-saved under their own name.
pub struct WordStrategy;

impl FamilyStrategy for WordStrategy {
    fn family(&self) -> Family {
        Family::Word
    }

    fn plan(&self, doc: &dyn Document, path: &Path) -> SavePlan {
        if doc.compatibility_mode() >= CURRENT_COMPATIBILITY {
            return SavePlan::Skip;
        }

        let format = if doc.has_macros() {
            SaveFormat::XmlDocumentMacroEnabled
        } else {
            SaveFormat::XmlDocument
        };

        let is_legacy_binary = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase() == "doc")
            .unwrap_or(false);

        if is_legacy_binary {
            SavePlan::ConvertToNew {
                target: suffixed_target(path, doc.has_macros()),
                format,
                normalize: true,
            }
        } else {
            // Already x-format but saved by an old Word; keep the name.
            SavePlan::ResaveInPlace { format }
        }
    }
}
