use super::{suffixed_target, FamilyStrategy, SavePlan};
use crate::model::{Family, SaveFormat};
use crate::office::{Document, CURRENT_COMPATIBILITY};
use std::path::Path;

/// Workbooks are either "old" or "new"; the backend maps the
/// Excel8CompatibilityMode flag onto the shared indicator scale. No
/// in-place case exists because legacy Excel files are always `.xls`.
pub struct ExcelStrategy;

impl FamilyStrategy for ExcelStrategy {
    fn family(&self) -> Family {
        Family::Excel
    }

    fn plan(&self, doc: &dyn Document, path: &Path) -> SavePlan {
        if doc.compatibility_mode() >= CURRENT_COMPATIBILITY {
            return SavePlan::Skip;
        }

        let has_macros = doc.has_macros();
        SavePlan::ConvertToNew {
            target: suffixed_target(path, has_macros),
            format: if has_macros {
                SaveFormat::XmlWorkbookMacroEnabled
            } else {
                SaveFormat::XmlWorkbook
            },
            normalize: false,
        }
    }
}
