//! # Register Classes
//!
//! Every register belongs to exactly one hardware class. The class ordinal is
//! used directly as the index of that class's [`RegisterSet`](crate::register_set::RegisterSet)
//! inside the bank, so the ordinals are dense and start at zero.
//!
//! | Ordinal | Name  | Class                       |
//! |---------|-------|-----------------------------|
//! | 0       | `gpr` | General purpose             |
//! | 1       | `drx` | Debug                       |
//! | 2       | `fpu` | Floating point              |
//! | 3       | `mmx` | MMX                         |
//! | 4       | `xmm` | XMM / vector                |
//! | 5       | `flg` | Flags                       |
//! | 6       | `seg` | Segment                     |
//!
//! Queries can also use the `all` selector, which is not a storage class.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegisterType {
    /// General purpose registers.
    Gpr = 0,
    /// Debug registers (`dr0`..`dr7` on x86).
    Drx = 1,
    /// Floating point stack.
    Fpu = 2,
    Mmx = 3,
    /// Vector registers.
    Xmm = 4,
    /// Flags / status words.
    Flg = 5,
    /// Segment selectors.
    Seg = 6,
}

impl RegisterType {
    /// Number of storage classes.
    pub const COUNT: usize = 7;

    /// Every class in ordinal order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Gpr,
        Self::Drx,
        Self::Fpu,
        Self::Mmx,
        Self::Xmm,
        Self::Flg,
        Self::Seg,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gpr => "gpr",
            Self::Drx => "drx",
            Self::Fpu => "fpu",
            Self::Mmx => "mmx",
            Self::Xmm => "xmm",
            Self::Flg => "flg",
            Self::Seg => "seg",
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

impl fmt::Display for RegisterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which classes a query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeSelector {
    /// Every class, in ordinal order.
    All,
    Only(RegisterType),
}

impl TypeSelector {
    /// Classes covered by this selector, in ordinal order.
    pub fn types(self) -> impl Iterator<Item = RegisterType> {
        RegisterType::ALL
            .into_iter()
            .filter(move |ty| self.covers(*ty))
    }

    #[must_use]
    pub fn covers(self, ty: RegisterType) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == ty,
        }
    }
}

impl From<RegisterType> for TypeSelector {
    fn from(ty: RegisterType) -> Self {
        Self::Only(ty)
    }
}

impl fmt::Display for TypeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(ty) => ty.fmt(f),
        }
    }
}

/// Name of the class at `ordinal`, or `None` when out of range.
#[must_use]
pub const fn type_name(ordinal: usize) -> Option<&'static str> {
    match RegisterType::from_ordinal(ordinal) {
        Some(ty) => Some(ty.name()),
        None => None,
    }
}

/// Resolves a class name, case-sensitively. `"all"` gives [`TypeSelector::All`].
///
/// # Errors
///
/// Returns [`FieldError::UnknownType`] for anything else.
pub fn type_by_name(text: &str) -> Result<TypeSelector, FieldError> {
    if text == "all" {
        return Ok(TypeSelector::All);
    }

    RegisterType::ALL
        .into_iter()
        .find(|ty| ty.name() == text)
        .map(TypeSelector::Only)
        .ok_or_else(|| FieldError::UnknownType(text.to_string()))
}
