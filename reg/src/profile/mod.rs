//! # Register Profiles
//!
//! A profile is a small line-oriented text describing a CPU's register layout:
//!
//! ```text
//! =pc    eip          # role binding: '=' keyword, then a register name
//! =sp    esp
//! gpr    eax   4  0   # type name size offset [packed-size]
//! gpr    ax    2  0
//! flg    cf   .1 .0   # a leading '.' gives bits instead of bytes
//! ```
//!
//! Parsing produces a [`Profile`], which the
//! [`RegisterBank`](crate::bank::RegisterBank) then installs.

pub mod parser;
pub mod source;

use serde::{Deserialize, Serialize};

use crate::{error::Diagnostic, item::RegisterItem, role::Role};

pub use parser::{MAX_TOKEN_LEN, parse};
pub use source::{PLUGINS_ENV, ProfileSource};

/// What to do when a single word of the profile is malformed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldPolicy {
    /// Log it, keep the field's default and go on.
    #[default]
    Lenient,
    /// Fail the whole parse on the first malformed word.
    Strict,
}

/// Everything a profile text defines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Definitions in text order, across all types.
    pub items: Vec<RegisterItem>,
    /// Role bindings in text order. Later bindings of the same role win.
    pub roles: Vec<(Role, String)>,
    /// Malformed words that were tolerated.
    pub diagnostics: Vec<Diagnostic>,
}
