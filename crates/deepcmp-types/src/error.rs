use thiserror::Error;

use crate::value::Kind;

/// Errors produced by value operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("expected {expected}, got {actual}")]
    UnexpectedKind { expected: Kind, actual: Kind },
}
