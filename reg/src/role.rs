//! # Register Roles
//!
//! A role is the logical purpose a debugger cares about (where is the program
//! counter? the stack pointer?) bound to the name of a concrete register of
//! the loaded profile.
//!
//! Profiles bind roles with lines like `=pc eip`. Role keywords are matched on
//! their first two characters only, so `=pcx eip` binds the program counter
//! too.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RegError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Program counter (`pc`).
    ProgramCounter = 0,
    /// Status register / stack segment (`sr`).
    StatusRegister = 1,
    /// Stack pointer (`sp`).
    StackPointer = 2,
    /// Frame base pointer (`bp`).
    BasePointer = 3,
    Arg0 = 4,
    Arg1 = 5,
    Arg2 = 6,
    Arg3 = 7,
}

impl Role {
    pub const COUNT: usize = 8;

    pub const ALL: [Self; Self::COUNT] = [
        Self::ProgramCounter,
        Self::StatusRegister,
        Self::StackPointer,
        Self::BasePointer,
        Self::Arg0,
        Self::Arg1,
        Self::Arg2,
        Self::Arg3,
    ];

    /// Two-letter keyword used in profiles.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::ProgramCounter => "pc",
            Self::StatusRegister => "sr",
            Self::StackPointer => "sp",
            Self::BasePointer => "bp",
            Self::Arg0 => "a0",
            Self::Arg1 => "a1",
            Self::Arg2 => "a2",
            Self::Arg3 => "a3",
        }
    }

    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal < Self::COUNT {
            Some(Self::ALL[ordinal])
        } else {
            None
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Resolves a role keyword by its first two characters; the rest of `text`
/// is ignored. Inputs shorter than two characters never match.
#[must_use]
pub fn role_by_name(text: &str) -> Option<Role> {
    let prefix = text.as_bytes().get(..2)?;
    Role::ALL
        .into_iter()
        .find(|role| role.keyword().as_bytes() == prefix)
}

/// Register name bound to each role. The last binding for a role wins.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTable {
    names: [Option<String>; Role::COUNT],
}

impl RoleTable {
    pub fn bind(&mut self, role: Role, name: &str) {
        self.names[role.ordinal()] = Some(name.to_string());
    }

    /// Same as [`RoleTable::bind`] with a raw role ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`RegError::RoleOutOfRange`] when `ordinal` names no role; the
    /// table is left untouched.
    pub fn bind_ordinal(&mut self, ordinal: usize, name: &str) -> Result<(), RegError> {
        let role = Role::from_ordinal(ordinal).ok_or(RegError::RoleOutOfRange(ordinal))?;
        self.bind(role, name);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, role: Role) -> Option<&str> {
        self.names[role.ordinal()].as_deref()
    }

    #[must_use]
    pub fn get_ordinal(&self, ordinal: usize) -> Option<&str> {
        Role::from_ordinal(ordinal).and_then(|role| self.get(role))
    }

    pub fn clear(&mut self) {
        self.names = Default::default();
    }

    /// Bound roles in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        Role::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|name| (role, name)))
    }
}
