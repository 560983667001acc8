use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Entry errors
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid passcode: {0}")]
    InvalidPasscode(String),

    // Sensor errors
    #[error("Invalid distance reading: {0}")]
    InvalidDistance(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reserved key conflict: '{key}' is assigned to both {first} and {second}")]
    KeyConflict {
        key: char,
        first: &'static str,
        second: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
