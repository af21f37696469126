//! Top-level error type
//!
//! Every failure is fatal to a run. [`Error`] keeps parse failures (nothing
//! was executed) apart from runtime failures (output may already have been
//! written), and its `Display` carries the matching diagnostic prefix.

use crate::interpreter::errors::RuntimeError;
use crate::parser::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Parse Error: {0}")]
    Parse(#[from] ParseError),

    #[error("Runtime Error: {0}")]
    Runtime(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, Error>;
