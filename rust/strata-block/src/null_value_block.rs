//! A block whose every position is null.

use std::{any::Any, sync::Arc};

use strata_common::{
    Result,
    checks::{check_readable_position, check_valid_positions, check_valid_region, checked_count},
};

use crate::{
    block::{Block, BlockBuilder, BlockRef, PartId},
    encoding::BlockEncoding,
};

/// A run of `position_count` nulls.
///
/// Stores nothing but the count, so its sizes do not depend on the number of
/// positions. Typed readers return the zero value of their type (or an empty byte
/// range) for any valid position, which lets numeric code read through null positions
/// without special-casing this encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullValueBlock {
    position_count: usize,
}

impl NullValueBlock {
    /// Fixed memory cost of one instance.
    pub const INSTANCE_SIZE: u64 = std::mem::size_of::<NullValueBlock>() as u64;

    /// Logical payload size: a single tag byte, whatever the position count.
    pub const SIZE_IN_BYTES: u64 = std::mem::size_of::<u8>() as u64;

    pub fn new(position_count: usize) -> NullValueBlock {
        NullValueBlock { position_count }
    }

    /// Creates a block from a signed count, as read from external data.
    ///
    /// Fails with a construction error if the count is negative.
    pub fn try_from_count(position_count: i64) -> Result<NullValueBlock> {
        let position_count = checked_count("position_count", position_count)?;
        Ok(NullValueBlock::new(position_count))
    }

    /// Returns `block` as a `NullValueBlock` if that is its concrete encoding.
    pub fn downcast(block: &dyn Block) -> Option<&NullValueBlock> {
        block.as_any().downcast_ref::<NullValueBlock>()
    }

    pub fn into_ref(self) -> BlockRef {
        Arc::new(self)
    }

    #[inline]
    fn check_readable_position(&self, position: usize) -> Result<()> {
        check_readable_position(position, self.position_count)
    }
}

impl Block for NullValueBlock {
    fn as_any(&self) -> &(dyn Any + Send + Sync + 'static) {
        self
    }

    fn encoding(&self) -> BlockEncoding {
        BlockEncoding::NullValue
    }

    fn position_count(&self) -> usize {
        self.position_count
    }

    fn is_null(&self, position: usize) -> Result<bool> {
        self.check_readable_position(position)?;
        Ok(true)
    }

    fn null_count(&self) -> usize {
        self.position_count
    }

    // Typed readers ignore offset and length: a null has no bytes to address.

    fn get_long(&self, position: usize, _offset: usize) -> Result<i64> {
        self.check_readable_position(position)?;
        Ok(0)
    }

    fn get_int(&self, position: usize, _offset: usize) -> Result<i32> {
        self.check_readable_position(position)?;
        Ok(0)
    }

    fn get_short(&self, position: usize, _offset: usize) -> Result<i16> {
        self.check_readable_position(position)?;
        Ok(0)
    }

    fn get_byte(&self, position: usize, _offset: usize) -> Result<i8> {
        self.check_readable_position(position)?;
        Ok(0)
    }

    fn get_slice(&self, position: usize, _offset: usize, _length: usize) -> Result<&[u8]> {
        self.check_readable_position(position)?;
        Ok(&[])
    }

    fn get_single_value_block(&self, position: usize) -> Result<BlockRef> {
        self.check_readable_position(position)?;
        Ok(NullValueBlock::new(1).into_ref())
    }

    fn copy_positions(
        &self,
        positions: &[usize],
        offset: usize,
        length: usize,
    ) -> Result<BlockRef> {
        check_valid_positions(positions, offset, length, self.position_count)?;
        Ok(NullValueBlock::new(length).into_ref())
    }

    fn get_region(&self, position_offset: usize, length: usize) -> Result<BlockRef> {
        check_valid_region(self.position_count, position_offset, length)?;
        Ok(NullValueBlock::new(length).into_ref())
    }

    fn copy_region(&self, position: usize, length: usize) -> Result<BlockRef> {
        check_valid_region(self.position_count, position, length)?;
        Ok(NullValueBlock::new(length).into_ref())
    }

    fn size_in_bytes(&self) -> u64 {
        Self::SIZE_IN_BYTES
    }

    fn region_size_in_bytes(&self, position: usize, length: usize) -> Result<u64> {
        check_valid_region(self.position_count, position, length)?;
        Ok(Self::SIZE_IN_BYTES)
    }

    fn retained_size_in_bytes(&self) -> u64 {
        Self::INSTANCE_SIZE
    }

    fn retained_bytes_for_each_part(&self, visit: &mut dyn FnMut(PartId, u64)) {
        visit(PartId::of(self), Self::INSTANCE_SIZE);
    }

    fn write_position_to(&self, position: usize, builder: &mut dyn BlockBuilder) -> Result<()> {
        self.check_readable_position(position)?;
        builder.append_null();
        Ok(())
    }
}
