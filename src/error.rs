use std::io;
use std::result;

use serenity::prelude::SerenityError;
use thiserror::Error as ThisError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error("The server {0} is not authorized to use Giveaway World.")]
    UnauthorizedServer(u64),
    #[error("You are not authorized to use this command.")]
    RestrictedCommand,
    #[error("The requested giveaway was not found or has already finished.")]
    GiveawayNotFound,
    #[error("{0}")]
    InvalidParameter(String),
    #[error("The settings file `{path}` is corrupted: {reason}")]
    CorruptedStorage { path: String, reason: String },
    #[error("Invalid bot configuration: {0}")]
    Configuration(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Serialization(String),
    #[error("{0}")]
    SerenityError(String),
}

impl From<SerenityError> for Error {
    fn from(err: SerenityError) -> Error {
        let description = err.to_string();
        Error::SerenityError(description)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Serialization(err.to_string())
    }
}
