use super::{suffixed_target, FamilyStrategy, SavePlan};
use crate::model::{Family, SaveFormat};
use crate::office::Document;
use std::path::Path;

/// PowerPoint exposes no compatibility indicator, so every opened
/// presentation is converted unconditionally. The target format pair
/// follows the original extension: `.ppt` stays a presentation, `.pps`
/// stays a slideshow.
pub struct PowerPointStrategy;

impl FamilyStrategy for PowerPointStrategy {
    fn family(&self) -> Family {
        Family::PowerPoint
    }

    fn plan(&self, doc: &dyn Document, path: &Path) -> SavePlan {
        let has_macros = doc.has_macros();
        let is_slideshow = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase() == "pps")
            .unwrap_or(false);

        let format = match (is_slideshow, has_macros) {
            (false, false) => SaveFormat::XmlPresentation,
            (false, true) => SaveFormat::XmlPresentationMacroEnabled,
            (true, false) => SaveFormat::XmlShow,
            (true, true) => SaveFormat::XmlShowMacroEnabled,
        };

        SavePlan::ConvertToNew {
            target: suffixed_target(path, has_macros),
            format,
            normalize: false,
        }
    }
}
