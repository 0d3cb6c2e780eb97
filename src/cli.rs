use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "office-file-version-updater")]
#[command(
    about = "Batch-updates legacy Office files (.doc/.xls/.ppt) to the current formats",
    long_about = None
)]
pub struct Cli {
    /// Folder to parse -- this is recursive so you only need to specify the
    /// top-level. Use double-quotes if the folder name contains spaces.
    #[arg(short = 'f', long = "folderToParse")]
    pub folder_to_parse: PathBuf,

    /// Do NOT parse Word files.
    #[arg(long = "SkipWord")]
    pub skip_word: bool,

    /// Do NOT parse Excel files.
    #[arg(long = "SkipExcel")]
    pub skip_excel: bool,

    /// Do NOT parse PowerPoint files.
    #[arg(long = "SkipPowerPoint")]
    pub skip_powerpoint: bool,
}
