//! Error types for Advisor
//!
//! The metrics engine itself never fails; these cover the layers around it
//! (documents, configuration, submission).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

pub type Result<T> = std::result::Result<T, Error>;
