//! The `Block` and `BlockBuilder` contracts.
//!
//! A [`Block`] is an immutable column of `position_count()` values. Every operation
//! that takes a position or a region validates it against the block and fails with a
//! range error (see [`strata_common::checks`]); nothing is clamped.
//!
//! A [`BlockBuilder`] is the mutable side: it is owned by a single producer, appended to
//! linearly and consumed by `build()`. Builders do not implement `Block`, so a value
//! under construction can only be observed through the explicit copy operations or
//! after the consuming transition.

use std::{any::Any, fmt, sync::Arc};

use strata_common::{Result, error::Error};

use crate::encoding::BlockEncoding;

/// Shared handle to an immutable block.
pub type BlockRef = Arc<dyn Block>;

/// Capacity hint used by builders when the caller has none.
pub const DEFAULT_EXPECTED_ENTRIES: usize = 1024;

/// Identity of one retained memory part, stable across every block sharing it.
///
/// Memory accountants key on `PartId` to count a buffer shared by several regions once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(usize);

impl PartId {
    /// Identity of an object by its address.
    pub fn of<T: ?Sized>(value: &T) -> PartId {
        PartId(value as *const T as *const () as usize)
    }

    /// Identity of a shared allocation, as reported by `SharedVec::allocation_id`.
    pub fn from_allocation(id: usize) -> PartId {
        PartId(id)
    }
}

/// An immutable sequence of values of one column for a batch of positions.
pub trait Block: Send + Sync + fmt::Debug + 'static {
    /// Returns a reference to this block as a type-erased `Any` trait object.
    ///
    /// Enables downcasting to the concrete block once the encoding is known.
    fn as_any(&self) -> &(dyn Any + Send + Sync + 'static);

    /// The concrete encoding of this block.
    fn encoding(&self) -> BlockEncoding;

    /// Stable name of the concrete encoding, used for dispatch by serializers.
    fn encoding_name(&self) -> &'static str {
        self.encoding().name()
    }

    /// Number of logical positions (rows) in this block.
    fn position_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.position_count() == 0
    }

    /// Returns `true` if the value at `position` is null.
    fn is_null(&self, position: usize) -> Result<bool>;

    /// Number of null positions.
    fn null_count(&self) -> usize;

    /// Reads the value at `position` as a 64-bit integer.
    fn get_long(&self, position: usize, offset: usize) -> Result<i64>;

    /// Reads the value at `position` as a 32-bit integer.
    fn get_int(&self, position: usize, offset: usize) -> Result<i32>;

    /// Reads the value at `position` as a 16-bit integer.
    fn get_short(&self, position: usize, offset: usize) -> Result<i16>;

    /// Reads the value at `position` as an 8-bit integer.
    fn get_byte(&self, position: usize, offset: usize) -> Result<i8>;

    /// Reads `length` bytes starting at `offset` of the value at `position`.
    fn get_slice(&self, position: usize, offset: usize, length: usize) -> Result<&[u8]>;

    /// Returns a block of length 1 holding only the value at `position`.
    fn get_single_value_block(&self, position: usize) -> Result<BlockRef>;

    /// Gathers `positions[offset..offset + length]` into a new, independent block.
    fn copy_positions(&self, positions: &[usize], offset: usize, length: usize)
    -> Result<BlockRef>;

    /// Returns a view of `position_offset..position_offset + length`.
    ///
    /// The result may share storage with `self`; neither can mutate it.
    fn get_region(&self, position_offset: usize, length: usize) -> Result<BlockRef>;

    /// Returns an independent copy of `position..position + length` that retains none
    /// of the storage of `self`.
    fn copy_region(&self, position: usize, length: usize) -> Result<BlockRef>;

    /// Uncompressed logical size of the values.
    fn size_in_bytes(&self) -> u64;

    /// Uncompressed logical size of the values in `position..position + length`.
    fn region_size_in_bytes(&self, position: usize, length: usize) -> Result<u64>;

    /// Total memory kept alive by this block, including its fixed instance overhead.
    fn retained_size_in_bytes(&self) -> u64;

    /// Reports every retained part with its size. The sizes sum to
    /// `retained_size_in_bytes()`.
    fn retained_bytes_for_each_part(&self, visit: &mut dyn FnMut(PartId, u64));

    /// Appends the value at `position` (or a null) to `builder`.
    fn write_position_to(&self, position: usize, builder: &mut dyn BlockBuilder) -> Result<()>;
}

/// A mutable accumulator producing a [`Block`].
pub trait BlockBuilder: Send + fmt::Debug {
    /// Number of entries appended so far.
    fn position_count(&self) -> usize;

    /// Appends a null entry.
    fn append_null(&mut self);

    fn write_long(&mut self, _value: i64) -> Result<()> {
        Err(Error::invalid_operation(format!(
            "write_long on {}",
            self.encoding().name()
        )))
    }

    fn write_int(&mut self, _value: i32) -> Result<()> {
        Err(Error::invalid_operation(format!(
            "write_int on {}",
            self.encoding().name()
        )))
    }

    fn write_short(&mut self, _value: i16) -> Result<()> {
        Err(Error::invalid_operation(format!(
            "write_short on {}",
            self.encoding().name()
        )))
    }

    fn write_byte(&mut self, _value: i8) -> Result<()> {
        Err(Error::invalid_operation(format!(
            "write_byte on {}",
            self.encoding().name()
        )))
    }

    /// Encoding produced by `build()` when at least one value was appended.
    fn encoding(&self) -> BlockEncoding;

    /// Logical size of the entries appended so far.
    fn size_in_bytes(&self) -> u64;

    /// Memory currently held by the builder.
    fn retained_size_in_bytes(&self) -> u64;

    /// Gathers `positions[offset..offset + length]` of the appended entries into a block.
    fn copy_positions(&self, positions: &[usize], offset: usize, length: usize)
    -> Result<BlockRef>;

    /// Returns a block holding the entries in `position_offset..position_offset + length`.
    fn get_region(&self, position_offset: usize, length: usize) -> Result<BlockRef>;

    /// Returns an independent block holding the entries in `position..position + length`.
    fn copy_region(&self, position: usize, length: usize) -> Result<BlockRef>;

    /// Creates an empty builder of the same kind.
    fn new_block_builder_like(&self, expected_entries: usize) -> Box<dyn BlockBuilder>;

    /// Consumes the boxed builder and returns the built block.
    fn build_boxed(self: Box<Self>) -> BlockRef;
}
