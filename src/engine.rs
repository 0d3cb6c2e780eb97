//! Sequential run orchestration: collate once, then drive Word, Excel and
//! PowerPoint to completion in that order. No overlap, no queue.

use crate::collate;
use crate::convert::{self, ExcelStrategy, FamilyStrategy, PowerPointStrategy, WordStrategy};
use crate::housekeeping::OfficeEnvironment;
use crate::model::{ExitReason, Family};
use crate::office::Suite;
use std::path::PathBuf;
use tracing::{error, info};

/// Validated command input; the single configuration value the run needs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub folder_to_parse: PathBuf,
    pub skip_word: bool,
    pub skip_excel: bool,
    pub skip_powerpoint: bool,
}

impl RunOptions {
    fn enabled_families(&self) -> Vec<Family> {
        Family::ALL
            .into_iter()
            .filter(|family| match family {
                Family::Word => !self.skip_word,
                Family::Excel => !self.skip_excel,
                Family::PowerPoint => !self.skip_powerpoint,
            })
            .collect()
    }
}

fn strategy_for(family: Family) -> Box<dyn FamilyStrategy> {
    match family {
        Family::Word => Box::new(WordStrategy),
        Family::Excel => Box::new(ExcelStrategy),
        Family::PowerPoint => Box::new(PowerPointStrategy),
    }
}

/// Run the whole batch. Per-file failures are logged and absorbed; the
/// returned reason is only non-Ok for the fatal startup conditions (bad
/// folder, application family unavailable).
pub fn run(
    options: &RunOptions,
    suite: &dyn Suite,
    env: &dyn OfficeEnvironment,
) -> ExitReason {
    if !options.folder_to_parse.is_dir() {
        return ExitReason::InvalidFolder;
    }

    let enabled = options.enabled_families();
    let sets = collate::collate(&options.folder_to_parse, &enabled);
    if sets.total() == 0 {
        info!("Nothing to do.");
        return ExitReason::Ok;
    }

    // Used for denylist-clearing only; detected once for the whole run.
    let office_version = env.detect_installed_version();

    for family in enabled {
        let files = sets.for_family(family);
        if files.is_empty() {
            continue;
        }

        if let Some(version) = &office_version {
            env.clear_failure_list(family, version);
        }

        let strategy = strategy_for(family);
        if let Err(err) = convert::run_family(strategy.as_ref(), suite, files) {
            error!("{}", err);
            return family.not_installed_exit();
        }
    }

    ExitReason::Ok
}
