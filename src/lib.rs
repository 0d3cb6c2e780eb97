pub mod cli;
pub mod collate;
pub mod convert;
pub mod engine;
pub mod error;
pub mod housekeeping;
pub mod logging;
pub mod model;
pub mod office;

pub use engine::{run, RunOptions};
pub use error::Error;
pub use model::{ExitReason, Family, SaveFormat};
