use std::{io, path::PathBuf};

use arena::ArenaError;
use thiserror::Error;

use crate::register_type::TypeSelector;

/// Structural failures. Any of these aborts the operation that raised it.
#[derive(Debug, Error)]
pub enum RegError {
    #[error("line {line}: token longer than {limit} characters")]
    TokenTooLong { line: usize, limit: usize },

    #[error(transparent)]
    Arena(#[from] ArenaError),

    #[error("cannot pop more: the arena pool is at depth {depth}")]
    PopUnderflow { depth: usize },

    #[error("cannot find profile '{profile}'")]
    ProfileNotFound { profile: String },

    #[error("cannot read profile {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("selector {0} does not name a single register type")]
    InvalidSelector(TypeSelector),

    #[error("role ordinal {0} is out of range")]
    RoleOutOfRange(usize),

    #[error("type ordinal {0} is out of range")]
    TypeOutOfRange(usize),

    #[error(transparent)]
    Field(Diagnostic),
}

/// Content problem in a single word of a profile.
///
/// These never stop a lenient parse: the field keeps its default value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown register type '{0}'")]
    UnknownType(String),

    #[error("'{0}' is a query selector, not a register type")]
    NotAStorageType(String),

    #[error("'{0}' is not a number")]
    BadNumber(String),

    #[error("'{0}' does not fit in a bit count")]
    NumberOverflow(String),

    #[error("unexpected word '{word}' in column {column}")]
    ExtraColumn { column: usize, word: String },

    #[error("invalid register role '{0}'")]
    UnknownRole(String),

    #[error("role '{0}' has no register name")]
    MissingRoleTarget(String),

    #[error("definition has {0} words, at least 4 are needed")]
    IncompleteLine(usize),
}

/// A [`FieldError`] tagged with the 1-based profile line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {error}")]
pub struct Diagnostic {
    pub line: usize,
    pub error: FieldError,
}
