use std::fmt;

use serde::{Deserialize, Serialize};

use crate::register_type::RegisterType;

/// One named register and where its bits live inside its class's arena.
///
/// All sizes and offsets are in bits. `packed_bit_size` is `0` when the
/// profile does not give one; deciding what that means is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterItem {
    pub name: String,
    pub ty: RegisterType,
    pub bit_size: u32,
    pub bit_offset: u32,
    pub packed_bit_size: u32,
}

impl RegisterItem {
    /// First bit past the end of this register.
    #[must_use]
    pub fn extent(&self) -> u64 {
        u64::from(self.bit_offset) + u64::from(self.bit_size)
    }
}

/// Formats the item as a profile line using explicit bit fields,
/// e.g. `gpr eax .32 .0 .0`.
impl fmt::Display for RegisterItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} .{} .{} .{}",
            self.ty, self.name, self.bit_size, self.bit_offset, self.packed_bit_size
        )
    }
}
