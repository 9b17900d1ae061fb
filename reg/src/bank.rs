//! # Register Bank
//!
//! The debugger's view of a CPU register file: one [`RegisterSet`] per
//! [`RegisterType`] plus the [`RoleTable`]. A debugger drives it like this:
//!
//! ```text
//! bank.load_profile(...)
//! loop {
//!     read registers into bank current arenas
//!     bank.push()            // keep this generation, start a new one
//!     step
//!     read registers again
//!     compare current() against previous()
//!     bank.pop()             // drop the stale generation
//! }
//! ```
//!
//! Every set is pushed and popped together, so all of them always have the
//! same depth. A bank is not synchronised; whoever owns it serialises access.

use arena::{Arena, ArenaAllocator, HeapAllocator};

use crate::{
    error::{Diagnostic, RegError},
    item::RegisterItem,
    profile::{FieldPolicy, Profile, ProfileSource, parse},
    register_set::RegisterSet,
    register_type::{RegisterType, TypeSelector},
    role::{Role, RoleTable},
};

#[derive(Debug)]
pub struct RegisterBank<A: ArenaAllocator = HeapAllocator> {
    allocator: A,
    roles: RoleTable,
    /// Indexed by [`RegisterType::ordinal`].
    sets: Vec<RegisterSet>,
}

impl RegisterBank<HeapAllocator> {
    /// Creates an empty bank backed by heap arenas.
    ///
    /// # Errors
    ///
    /// Fails when the initial arenas cannot be created.
    pub fn new() -> Result<Self, RegError> {
        Self::with_allocator(HeapAllocator)
    }
}

impl<A: ArenaAllocator> RegisterBank<A> {
    /// Creates an empty bank whose arenas come from `allocator`.
    ///
    /// # Errors
    ///
    /// Fails when the initial arenas cannot be created.
    pub fn with_allocator(allocator: A) -> Result<Self, RegError> {
        let arenas = fresh_arenas(&allocator)?;
        let sets = RegisterType::ALL
            .into_iter()
            .zip(arenas)
            .map(|(ty, arena)| RegisterSet::new(ty, arena))
            .collect();

        Ok(Self {
            allocator,
            roles: RoleTable::default(),
            sets,
        })
    }

    #[must_use]
    pub const fn roles(&self) -> &RoleTable {
        &self.roles
    }

    /// Name of the register bound to `role`.
    #[must_use]
    pub fn role(&self, role: Role) -> Option<&str> {
        self.roles.get(role)
    }

    pub fn bind_role(&mut self, role: Role, name: &str) {
        self.roles.bind(role, name);
    }

    /// # Errors
    ///
    /// [`RegError::RoleOutOfRange`] when `ordinal` names no role.
    pub fn bind_role_ordinal(&mut self, ordinal: usize, name: &str) -> Result<(), RegError> {
        self.roles.bind_ordinal(ordinal, name)
    }

    #[must_use]
    pub fn set(&self, ty: RegisterType) -> &RegisterSet {
        &self.sets[ty.ordinal()]
    }

    pub fn set_mut(&mut self, ty: RegisterType) -> &mut RegisterSet {
        &mut self.sets[ty.ordinal()]
    }

    pub fn sets(&self) -> impl Iterator<Item = &RegisterSet> {
        self.sets.iter()
    }

    /// The items of a single class, in profile order.
    ///
    /// # Errors
    ///
    /// [`RegError::InvalidSelector`] for [`TypeSelector::All`].
    pub fn items_of(&self, selector: TypeSelector) -> Result<&[RegisterItem], RegError> {
        match selector {
            TypeSelector::Only(ty) => Ok(self.set(ty).items()),
            TypeSelector::All => Err(RegError::InvalidSelector(selector)),
        }
    }

    /// Same as [`RegisterBank::items_of`] with a raw class ordinal.
    ///
    /// # Errors
    ///
    /// [`RegError::TypeOutOfRange`] when `ordinal` names no class.
    pub fn items_of_ordinal(&self, ordinal: usize) -> Result<&[RegisterItem], RegError> {
        let ty = RegisterType::from_ordinal(ordinal).ok_or(RegError::TypeOutOfRange(ordinal))?;
        self.items_of(ty.into())
    }

    /// Every item, classes in ordinal order.
    pub fn items(&self) -> impl Iterator<Item = &RegisterItem> {
        self.sets.iter().flat_map(RegisterSet::items)
    }

    /// First item called `name` among the selected classes.
    #[must_use]
    pub fn lookup(&self, name: &str, selector: TypeSelector) -> Option<&RegisterItem> {
        selector
            .types()
            .find_map(|ty| self.set(ty).lookup(name))
    }

    /// Current number of arena generations.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.sets.first().map_or(1, RegisterSet::depth)
    }

    /// Starts a new generation of empty arenas on every set and returns the
    /// new depth.
    ///
    /// # Errors
    ///
    /// Fails when any arena cannot be created. No set is pushed in that case.
    pub fn push(&mut self) -> Result<usize, RegError> {
        let arenas = fresh_arenas(&self.allocator)?;
        for (set, arena) in self.sets.iter_mut().zip(arenas) {
            set.push_arena(arena);
        }

        let depth = self.depth();
        tracing::debug!("pushed register arenas, depth {depth}");
        Ok(depth)
    }

    /// Drops the current generation of every set and returns the new depth.
    ///
    /// # Errors
    ///
    /// [`RegError::PopUnderflow`] when a set is down to its last arena. No
    /// set is popped in that case.
    pub fn pop(&mut self) -> Result<usize, RegError> {
        if let Some(set) = self.sets.iter().find(|set| set.depth() <= 1) {
            tracing::warn!("cannot pop more {} arenas", set.register_type());
            return Err(RegError::PopUnderflow { depth: set.depth() });
        }

        for set in &mut self.sets {
            set.pop_arena()?;
        }

        let depth = self.depth();
        tracing::debug!("popped register arenas, depth {depth}");
        Ok(depth)
    }

    /// Drops every item, role binding and arena generation, leaving each set
    /// with one empty arena.
    ///
    /// # Errors
    ///
    /// Fails when the fresh arenas cannot be created. The bank is untouched
    /// in that case.
    pub fn reset(&mut self) -> Result<(), RegError> {
        let arenas = fresh_arenas(&self.allocator)?;
        for (set, arena) in self.sets.iter_mut().zip(arenas) {
            set.reset(arena);
        }
        self.roles.clear();

        tracing::debug!("register bank reset");
        Ok(())
    }

    /// Replaces the register model with the one described by `text`.
    ///
    /// The bank is reset first. On failure it stays in that reset state; on
    /// success it holds exactly the profile's items and roles and each
    /// current arena is sized to its items. Returns the tolerated field
    /// problems.
    ///
    /// # Errors
    ///
    /// Parse failures (see [`parse`]) and arena failures. A layout whose
    /// largest `bit_offset + bit_size` needs more than
    /// [`MAX_ARENA_BYTES`](arena::MAX_ARENA_BYTES) in one class fails with
    /// [`ArenaError::TooLarge`](arena::ArenaError::TooLarge).
    pub fn load_profile_str(
        &mut self,
        text: &str,
        policy: FieldPolicy,
    ) -> Result<Vec<Diagnostic>, RegError> {
        self.reset()?;
        let profile = parse(text, policy)?;

        self.install(profile).inspect_err(|_| self.discard())
    }

    /// Empties every set and the role table without allocating, so it
    /// cannot fail halfway.
    fn discard(&mut self) {
        for set in &mut self.sets {
            set.discard();
        }
        self.roles.clear();
    }

    /// Resolves `profile` through `source` and loads it.
    ///
    /// # Errors
    ///
    /// [`RegError::ProfileNotFound`] (bank untouched) or any error of
    /// [`RegisterBank::load_profile_str`].
    pub fn load_profile(
        &mut self,
        profile: &str,
        source: &ProfileSource,
        policy: FieldPolicy,
    ) -> Result<Vec<Diagnostic>, RegError> {
        let text = source.read(profile)?;
        self.load_profile_str(&text, policy)
    }

    fn install(&mut self, profile: Profile) -> Result<Vec<Diagnostic>, RegError> {
        let Profile {
            items,
            roles,
            diagnostics,
        } = profile;

        let item_count = items.len();
        for item in items {
            self.set_mut(item.ty).add(item);
        }
        for (role, name) in &roles {
            self.roles.bind(*role, name);
        }
        for set in &mut self.sets {
            set.fit(&self.allocator)?;
        }

        tracing::info!(
            "loaded {item_count} registers, {} role bindings, {} warnings",
            roles.len(),
            diagnostics.len()
        );
        Ok(diagnostics)
    }
}

/// One empty arena per class, or none at all.
fn fresh_arenas(allocator: &impl ArenaAllocator) -> Result<Vec<Arena>, RegError> {
    RegisterType::ALL
        .iter()
        .map(|_| allocator.create(0).map_err(RegError::from))
        .collect()
}
