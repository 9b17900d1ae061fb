//! # Register Arenas
//!
//! An [`Arena`] is a fixed-size block of raw bytes holding the live values of
//! every register of one hardware class. The register model never looks inside
//! it: it only creates arenas, stacks them, resizes the current one to fit the
//! declared layout and drops the ones it no longer needs.
//!
//! Creation goes through an [`ArenaAllocator`] so callers can decide where the
//! storage comes from (and tests can make it fail on purpose).

use thiserror::Error;

/// Largest block a single arena may hold.
pub const MAX_ARENA_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("arena of {requested} bytes exceeds the {limit} byte limit")]
    TooLarge { requested: usize, limit: usize },

    #[error("could not allocate {requested} bytes of arena storage")]
    Allocation { requested: usize },
}

/// A zero-initialised, fixed-size byte block.
///
/// The size only changes through [`Arena::resize`]; reads and writes go
/// through the byte slices and never grow it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Arena {
    bytes: Vec<u8>,
}

impl Arena {
    /// Creates an arena of `byte_size` zeroed bytes. `0` is a valid size and
    /// means "not sized yet".
    ///
    /// # Errors
    ///
    /// Fails when the size is over [`MAX_ARENA_BYTES`] or the allocation is refused.
    pub fn new(byte_size: usize) -> Result<Self, ArenaError> {
        let mut arena = Self::default();
        arena.resize(byte_size)?;
        Ok(arena)
    }

    /// Grows or shrinks the block to exactly `byte_size` bytes. Bytes that
    /// survive the resize keep their value, new bytes are zero.
    ///
    /// # Errors
    ///
    /// Fails when the size is over [`MAX_ARENA_BYTES`] or the allocation is refused.
    /// The arena is untouched on failure.
    pub fn resize(&mut self, byte_size: usize) -> Result<(), ArenaError> {
        if byte_size > MAX_ARENA_BYTES {
            return Err(ArenaError::TooLarge {
                requested: byte_size,
                limit: MAX_ARENA_BYTES,
            });
        }

        if byte_size > self.bytes.len() {
            self.bytes
                .try_reserve_exact(byte_size - self.bytes.len())
                .map_err(|_| ArenaError::Allocation {
                    requested: byte_size,
                })?;
        }

        self.bytes.resize(byte_size, 0);
        self.bytes.shrink_to_fit();
        Ok(())
    }

    /// Shrinks the block to zero bytes. Never allocates.
    pub fn clear(&mut self) {
        self.bytes = Vec::new();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

/// Source of arena storage.
///
/// Destroying an arena is dropping it, so the trait only covers creation and
/// resizing.
pub trait ArenaAllocator {
    /// Creates a fresh arena of `byte_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns an [`ArenaError`] when the storage cannot be provided.
    fn create(&self, byte_size: usize) -> Result<Arena, ArenaError>;

    /// Resizes `arena` in place to `byte_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns an [`ArenaError`] when the storage cannot be provided.
    fn resize(&self, arena: &mut Arena, byte_size: usize) -> Result<(), ArenaError> {
        arena.resize(byte_size)
    }
}

/// Allocates arenas on the heap.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl ArenaAllocator for HeapAllocator {
    fn create(&self, byte_size: usize) -> Result<Arena, ArenaError> {
        Arena::new(byte_size)
    }
}

/// Number of bytes needed to hold `bits` bits.
#[must_use]
pub const fn bytes_for_bits(bits: u64) -> u64 {
    bits.div_ceil(8)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new() {
        let arena = Arena::new(0).unwrap();
        assert!(arena.is_empty());
        assert_eq!(arena.len(), 0);

        let arena = Arena::new(16).unwrap();
        assert_eq!(arena.len(), 16);
        assert_eq!(arena.as_bytes(), [0; 16]);
    }

    #[test]
    fn resize_keeps_prefix() {
        let mut arena = Arena::new(4).unwrap();
        arena.as_bytes_mut().copy_from_slice(&[1, 2, 3, 4]);

        arena.resize(6).unwrap();
        assert_eq!(arena.as_bytes(), [1, 2, 3, 4, 0, 0]);

        arena.resize(2).unwrap();
        assert_eq!(arena.as_bytes(), [1, 2]);
    }

    #[test]
    fn clear_releases_storage() {
        let mut arena = Arena::new(32).unwrap();
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena, Arena::default());
    }

    #[test]
    fn too_large() {
        let requested = MAX_ARENA_BYTES + 1;
        assert_eq!(
            Arena::new(requested),
            Err(ArenaError::TooLarge {
                requested,
                limit: MAX_ARENA_BYTES
            })
        );

        let mut arena = Arena::new(8).unwrap();
        assert!(arena.resize(requested).is_err());
        assert_eq!(arena.len(), 8);
    }

    #[test]
    fn heap_allocator() {
        let allocator = HeapAllocator;
        let mut arena = allocator.create(3).unwrap();
        assert_eq!(arena.len(), 3);

        allocator.resize(&mut arena, 10).unwrap();
        assert_eq!(arena.len(), 10);
    }

    #[test]
    fn bits_to_bytes() {
        assert_eq!(bytes_for_bits(0), 0);
        assert_eq!(bytes_for_bits(1), 1);
        assert_eq!(bytes_for_bits(8), 1);
        assert_eq!(bytes_for_bits(9), 2);
        assert_eq!(bytes_for_bits(64), 8);
    }
}
