//! # Register Sets
//!
//! One set per [`RegisterType`]: the register definitions of that class in
//! profile order, plus a stack of arenas holding successive generations of
//! their values.
//!
//! ```text
//!   push ──►  ┌───────────┐
//!             │  current  │  ◄── reads/writes of the step being traced
//!             ├───────────┤
//!             │ previous  │  ◄── what the comparison step diffs against
//!             ├───────────┤
//!             │    ...    │
//!   pop  ◄──  └───────────┘
//! ```
//!
//! The current arena is owned directly by the set, the older generations sit
//! in a vector below it. A set therefore always has at least one arena, and
//! popping drops exactly the arena that was current.

use arena::{Arena, ArenaAllocator, bytes_for_bits};

use crate::{error::RegError, item::RegisterItem, register_type::RegisterType};

#[derive(Debug)]
pub struct RegisterSet {
    ty: RegisterType,
    items: Vec<RegisterItem>,
    current: Arena,
    saved: Vec<Arena>,
}

impl RegisterSet {
    #[must_use]
    pub const fn new(ty: RegisterType, arena: Arena) -> Self {
        Self {
            ty,
            items: Vec::new(),
            current: arena,
            saved: Vec::new(),
        }
    }

    #[must_use]
    pub const fn register_type(&self) -> RegisterType {
        self.ty
    }

    /// Definitions in profile order.
    #[must_use]
    pub fn items(&self) -> &[RegisterItem] {
        &self.items
    }

    /// First item called `name`. Duplicated names are not rejected on load,
    /// the earliest definition shadows the later ones.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&RegisterItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub(crate) fn add(&mut self, item: RegisterItem) {
        debug_assert_eq!(item.ty, self.ty);
        self.items.push(item);
    }

    /// Number of arenas on the stack, never less than one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len() + 1
    }

    #[must_use]
    pub const fn current(&self) -> &Arena {
        &self.current
    }

    pub const fn current_mut(&mut self) -> &mut Arena {
        &mut self.current
    }

    /// The generation right below the current one, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&Arena> {
        self.saved.last()
    }

    pub(crate) fn push_arena(&mut self, arena: Arena) {
        let older = std::mem::replace(&mut self.current, arena);
        self.saved.push(older);
    }

    /// Drops the current arena and makes the one below it current.
    pub(crate) fn pop_arena(&mut self) -> Result<(), RegError> {
        let below = self
            .saved
            .pop()
            .ok_or(RegError::PopUnderflow { depth: 1 })?;
        self.current = below;
        Ok(())
    }

    /// Forgets every item and generation, leaving `arena` as the only one.
    pub(crate) fn reset(&mut self, arena: Arena) {
        self.items.clear();
        self.saved.clear();
        self.current = arena;
    }

    /// Same as [`RegisterSet::reset`], reusing the current arena shrunk to
    /// zero bytes instead of a fresh one.
    pub(crate) fn discard(&mut self) {
        self.items.clear();
        self.saved.clear();
        self.current.clear();
    }

    /// Bytes needed to hold every item: the largest `bit_offset + bit_size`
    /// rounded up to a whole byte.
    #[must_use]
    pub fn extent_bytes(&self) -> usize {
        let bits = self
            .items
            .iter()
            .map(RegisterItem::extent)
            .max()
            .unwrap_or(0);
        usize::try_from(bytes_for_bits(bits)).unwrap_or(usize::MAX)
    }

    /// Resizes the current arena to [`RegisterSet::extent_bytes`].
    pub(crate) fn fit(&mut self, allocator: &impl ArenaAllocator) -> Result<(), RegError> {
        let size = self.extent_bytes();
        allocator.resize(&mut self.current, size)?;
        tracing::debug!("fit {} arena to {size} bytes", self.ty);
        Ok(())
    }
}
