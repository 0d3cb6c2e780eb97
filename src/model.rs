use std::fmt;

/// The three Office document families the updater knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Word,
    Excel,
    PowerPoint,
}

impl Family {
    /// Application name as it appears in log lines and under the
    /// per-version Office registry root.
    pub fn app_name(&self) -> &'static str {
        match self {
            Family::Word => "Word",
            Family::Excel => "Excel",
            Family::PowerPoint => "PowerPoint",
        }
    }

    /// Extensions collected for this family, lowercase, without the dot.
    ///
    /// Word also collects current-format files because compatibility is
    /// decided per file at open time, not by extension alone. Excel and
    /// PowerPoint files are either "old" or "new" with nothing in between,
    /// so the x-files are never collected for those.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Family::Word => &["doc", "docx", "docm"],
            Family::Excel => &["xls"],
            Family::PowerPoint => &["ppt", "pps"],
        }
    }

    pub fn not_installed_exit(&self) -> ExitReason {
        match self {
            Family::Word => ExitReason::WordNotInstalled,
            Family::Excel => ExitReason::ExcelNotInstalled,
            Family::PowerPoint => ExitReason::PowerpointNotInstalled,
        }
    }

    pub const ALL: [Family; 3] = [Family::Word, Family::Excel, Family::PowerPoint];
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.app_name())
    }
}

/// Target format passed to the automation endpoint's save-as call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    XmlDocument,
    XmlDocumentMacroEnabled,
    XmlWorkbook,
    XmlWorkbookMacroEnabled,
    XmlPresentation,
    XmlPresentationMacroEnabled,
    XmlShow,
    XmlShowMacroEnabled,
}

impl SaveFormat {
    /// Numeric save-format constant the COM endpoint expects
    /// (WdSaveFormat / XlFileFormat / PpSaveAsFileType respectively).
    pub fn com_code(&self) -> i32 {
        match self {
            SaveFormat::XmlDocument => 12,
            SaveFormat::XmlDocumentMacroEnabled => 13,
            SaveFormat::XmlWorkbook => 51,
            SaveFormat::XmlWorkbookMacroEnabled => 52,
            SaveFormat::XmlPresentation => 24,
            SaveFormat::XmlPresentationMacroEnabled => 25,
            SaveFormat::XmlShow => 28,
            SaveFormat::XmlShowMacroEnabled => 29,
        }
    }

    pub fn macro_enabled(&self) -> bool {
        matches!(
            self,
            SaveFormat::XmlDocumentMacroEnabled
                | SaveFormat::XmlWorkbookMacroEnabled
                | SaveFormat::XmlPresentationMacroEnabled
                | SaveFormat::XmlShowMacroEnabled
        )
    }
}

/// Exit reasons; the process exit code is the ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitReason {
    Ok = 0,
    NoFolderPassed = 1,
    InvalidFolder = 2,
    WordNotInstalled = 3,
    ExcelNotInstalled = 4,
    PowerpointNotInstalled = 5,
    InvalidParametersSupplied = 6,
}

impl ExitReason {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn message(&self) -> &'static str {
        match self {
            ExitReason::Ok => "Done.",
            ExitReason::NoFolderPassed => "No folder to parse was passed.",
            ExitReason::InvalidFolder => "The folder to parse does not exist.",
            ExitReason::WordNotInstalled => "Word is not installed (or could not be started).",
            ExitReason::ExcelNotInstalled => "Excel is not installed (or could not be started).",
            ExitReason::PowerpointNotInstalled => {
                "PowerPoint is not installed (or could not be started)."
            }
            ExitReason::InvalidParametersSupplied => "Invalid parameters supplied.",
        }
    }
}
