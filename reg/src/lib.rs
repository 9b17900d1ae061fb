//! Register file model for debuggers and disassemblers: which registers a
//! CPU has, how they are grouped, which ones play the program counter /
//! stack pointer / ... roles, and stacked generations of their storage.

pub mod bank;
pub mod error;
pub mod item;
pub mod profile;
pub mod register_set;
pub mod register_type;
pub mod role;

pub use bank::RegisterBank;
pub use error::{Diagnostic, FieldError, RegError};
pub use item::RegisterItem;
pub use profile::{FieldPolicy, Profile, ProfileSource};
pub use register_set::RegisterSet;
pub use register_type::{RegisterType, TypeSelector, type_by_name, type_name};
pub use role::{Role, RoleTable, role_by_name};
