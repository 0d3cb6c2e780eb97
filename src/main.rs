use clap::error::ErrorKind;
use clap::Parser;
use dotenv::dotenv;
use office_file_version_updater::cli::Cli;
use office_file_version_updater::engine::{self, RunOptions};
use office_file_version_updater::housekeeping;
use office_file_version_updater::model::ExitReason;
use office_file_version_updater::office;
use office_file_version_updater::logging;
use tracing::{error, info};

fn main() {
    let code = real_main();
    std::process::exit(code);
}

fn real_main() -> i32 {
    dotenv().ok();

    // Guard must drop before the process exits so the file log flushes.
    let _guard = logging::init_logger();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let reason = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = err.print();
                    return ExitReason::Ok.code();
                }
                ErrorKind::MissingRequiredArgument => ExitReason::NoFolderPassed,
                _ => ExitReason::InvalidParametersSupplied,
            };
            let _ = err.print();
            return finish(reason);
        }
    };

    let options = RunOptions {
        folder_to_parse: args.folder_to_parse,
        skip_word: args.skip_word,
        skip_excel: args.skip_excel,
        skip_powerpoint: args.skip_powerpoint,
    };

    let suite = office::default_suite();
    let env = housekeeping::default_environment();
    let reason = engine::run(&options, suite.as_ref(), env.as_ref());
    finish(reason)
}

fn finish(reason: ExitReason) -> i32 {
    match reason {
        ExitReason::Ok => info!("{}", reason.message()),
        _ => error!("{}", reason.message()),
    }
    reason.code()
}
