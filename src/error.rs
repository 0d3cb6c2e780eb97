use crate::model::Family;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} is not installed (or could not be started)", .0.app_name())]
    NotInstalled(Family),

    #[error("{0}")]
    Automation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
