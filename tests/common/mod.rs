//! Scripted office backend for exercising the drivers without an Office
//! installation, plus small filesystem helpers.

#![allow(dead_code)]

use filetime::FileTime;
use office_file_version_updater::error::{Error, Result};
use office_file_version_updater::housekeeping::OfficeEnvironment;
use office_file_version_updater::model::{Family, SaveFormat};
use office_file_version_updater::office::{Document, Session, Suite, CURRENT_COMPATIBILITY};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Outcome script for one path. Unknown paths behave like an up-to-date
/// current-format document.
#[derive(Debug, Clone)]
pub struct DocScript {
    pub compatibility_mode: i32,
    pub has_macros: bool,
    pub fail_open: bool,
    pub fail_save: bool,
}

impl Default for DocScript {
    fn default() -> Self {
        DocScript {
            compatibility_mode: CURRENT_COMPATIBILITY,
            has_macros: false,
            fail_open: false,
            fail_save: false,
        }
    }
}

impl DocScript {
    pub fn legacy() -> Self {
        DocScript {
            compatibility_mode: 11,
            ..Default::default()
        }
    }

    pub fn legacy_with_macros() -> Self {
        DocScript {
            compatibility_mode: 11,
            has_macros: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub started: Vec<Family>,
    pub quit: Vec<Family>,
    pub opened: Vec<PathBuf>,
    pub saved: Vec<(PathBuf, SaveFormat)>,
    pub normalized: usize,
    pub closed: usize,
}

pub struct ScriptedSuite {
    pub scripts: HashMap<PathBuf, DocScript>,
    pub recorder: Rc<RefCell<Recorder>>,
    pub fail_start: Option<Family>,
}

impl ScriptedSuite {
    pub fn new() -> Self {
        ScriptedSuite {
            scripts: HashMap::new(),
            recorder: Rc::new(RefCell::new(Recorder::default())),
            fail_start: None,
        }
    }

    pub fn script(mut self, path: impl Into<PathBuf>, script: DocScript) -> Self {
        self.scripts.insert(path.into(), script);
        self
    }

    pub fn failing_to_start(mut self, family: Family) -> Self {
        self.fail_start = Some(family);
        self
    }
}

impl Suite for ScriptedSuite {
    fn start(&self, family: Family) -> Result<Box<dyn Session>> {
        if self.fail_start == Some(family) {
            return Err(Error::NotInstalled(family));
        }
        self.recorder.borrow_mut().started.push(family);
        Ok(Box::new(ScriptedSession {
            family,
            scripts: self.scripts.clone(),
            recorder: Rc::clone(&self.recorder),
        }))
    }
}

struct ScriptedSession {
    family: Family,
    scripts: HashMap<PathBuf, DocScript>,
    recorder: Rc<RefCell<Recorder>>,
}

impl Session for ScriptedSession {
    fn open(&mut self, path: &Path) -> Result<Box<dyn Document>> {
        let script = self.scripts.get(path).cloned().unwrap_or_default();
        if script.fail_open {
            return Err(Error::Automation(format!(
                "scripted open failure for {}",
                path.display()
            )));
        }
        self.recorder.borrow_mut().opened.push(path.to_path_buf());
        Ok(Box::new(ScriptedDocument {
            script,
            recorder: Rc::clone(&self.recorder),
        }))
    }

    fn quit(&mut self) {
        self.recorder.borrow_mut().quit.push(self.family);
    }
}

struct ScriptedDocument {
    script: DocScript,
    recorder: Rc<RefCell<Recorder>>,
}

impl Document for ScriptedDocument {
    fn compatibility_mode(&self) -> i32 {
        self.script.compatibility_mode
    }

    fn has_macros(&self) -> bool {
        self.script.has_macros
    }

    fn save_as(&mut self, target: &Path, format: SaveFormat) -> Result<()> {
        if self.script.fail_save {
            return Err(Error::Automation("scripted save failure".into()));
        }
        // Produce a real file so deletion and timestamp restoration run
        // against the actual filesystem.
        fs::write(target, b"converted document body")?;
        self.recorder
            .borrow_mut()
            .saved
            .push((target.to_path_buf(), format));
        Ok(())
    }

    fn normalize_to_current(&mut self) -> Result<()> {
        self.recorder.borrow_mut().normalized += 1;
        Ok(())
    }

    fn close(&mut self, _save_changes: bool) -> Result<()> {
        self.recorder.borrow_mut().closed += 1;
        Ok(())
    }
}

/// Environment fake recording denylist-clear requests.
#[derive(Default)]
pub struct RecordingEnvironment {
    pub version: Option<String>,
    pub cleared: RefCell<Vec<(Family, String)>>,
}

impl RecordingEnvironment {
    pub fn with_version(version: &str) -> Self {
        RecordingEnvironment {
            version: Some(version.to_string()),
            cleared: RefCell::new(Vec::new()),
        }
    }
}

impl OfficeEnvironment for RecordingEnvironment {
    fn detect_installed_version(&self) -> Option<String> {
        self.version.clone()
    }

    fn clear_failure_list(&self, family: Family, version: &str) {
        self.cleared
            .borrow_mut()
            .push((family, version.to_string()));
    }
}

/// Writes a file and pins its modification time to a fixed epoch second.
pub fn write_with_mtime(path: &Path, mtime_secs: i64) {
    fs::write(path, b"legacy document body").unwrap();
    filetime::set_file_mtime(path, FileTime::from_unix_time(mtime_secs, 0)).unwrap();
}

pub fn mtime_secs(path: &Path) -> i64 {
    FileTime::from_last_modification_time(&fs::metadata(path).unwrap()).unix_seconds()
}
