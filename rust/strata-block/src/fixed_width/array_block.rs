//! Fixed-width values with per-position null markers.

use std::{any::Any, sync::Arc};

use strata_common::{
    Result,
    checks::{check_readable_position, check_valid_positions, check_valid_region},
    error::Error,
    verify_arg,
};
use strata_shared_vec::SharedVec;

use super::FixedWidthValue;
use crate::{
    block::{Block, BlockBuilder, BlockRef, PartId},
    encoding::BlockEncoding,
    null_value_block::NullValueBlock,
    presence::Presence,
};

/// A block of fixed-width values of type `T`.
///
/// Values live in a [`SharedVec`], so regions taken with `get_region` point into the
/// same allocation as their source. Null positions hold `T`'s zero value and are
/// flagged in the [`Presence`].
///
/// Any region, gather or copy whose selected positions are all null is returned as a
/// [`NullValueBlock`] instead of a block of null markers.
#[derive(Debug, Clone)]
pub struct FixedWidthBlock<T> {
    values: SharedVec<T>,
    presence: Presence,
}

impl<T: FixedWidthValue> FixedWidthBlock<T> {
    /// Fixed memory cost of one instance, excluding its buffers.
    pub const INSTANCE_SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Logical bytes per position: the value plus one null marker.
    const BYTES_PER_POSITION: u64 = (T::WIDTH + 1) as u64;

    /// Creates a block from values and their null markers, which must be of equal length.
    pub fn new(values: SharedVec<T>, presence: Presence) -> Result<Self> {
        verify_arg!(presence, presence.len() == values.len());
        Ok(FixedWidthBlock { values, presence })
    }

    pub(super) fn from_parts(values: SharedVec<T>, presence: Presence) -> Self {
        debug_assert_eq!(values.len(), presence.len());
        FixedWidthBlock { values, presence }
    }

    /// Creates a block without nulls.
    pub fn from_values(values: Vec<T>) -> Self {
        let presence = Presence::Trivial(values.len());
        FixedWidthBlock::from_parts(SharedVec::from_vec(values), presence)
    }

    /// Creates a block from optional values, `None` marking a null.
    pub fn from_options(values: impl IntoIterator<Item = Option<T>>) -> Self {
        let (values, presence): (Vec<T>, Vec<u8>) = values
            .into_iter()
            .map(|value| match value {
                Some(value) => (value, 1),
                None => (T::zeroed(), 0),
            })
            .unzip();
        FixedWidthBlock::from_parts(SharedVec::from_vec(values), Presence::from_bytes(presence))
    }

    /// Returns `block` as a `FixedWidthBlock<T>` if that is its concrete encoding.
    pub fn downcast(block: &dyn Block) -> Option<&Self> {
        block.as_any().downcast_ref::<Self>()
    }

    /// The stored values, with zeros at null positions.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Reads the value at `position`, `None` for a null.
    pub fn value(&self, position: usize) -> Result<Option<T>> {
        check_readable_position(position, self.values.len())?;
        if self.presence.is_null(position) {
            Ok(None)
        } else {
            Ok(Some(self.values[position]))
        }
    }

    fn read_value<R>(
        &self,
        position: usize,
        offset: usize,
        reader: &str,
        read: impl FnOnce(T) -> Option<R>,
    ) -> Result<R> {
        check_readable_position(position, self.values.len())?;
        let value = read(self.values[position])
            .ok_or_else(|| Error::invalid_operation(format!("{reader} on {}", T::ENCODING)))?;
        if offset != 0 {
            return Err(Error::invalid_arg(
                "offset",
                format!("{reader} on {} requires offset 0, got {offset}", T::ENCODING),
            ));
        }
        Ok(value)
    }

    /// Wraps a selection result, collapsing it when every selected position is null.
    fn collapse_or(values: impl FnOnce() -> SharedVec<T>, presence: Presence) -> BlockRef {
        if presence.is_all_null() {
            NullValueBlock::new(presence.len()).into_ref()
        } else {
            Arc::new(FixedWidthBlock::from_parts(values(), presence))
        }
    }
}

impl<T: FixedWidthValue> Block for FixedWidthBlock<T> {
    fn as_any(&self) -> &(dyn Any + Send + Sync + 'static) {
        self
    }

    fn encoding(&self) -> BlockEncoding {
        T::ENCODING
    }

    fn position_count(&self) -> usize {
        self.values.len()
    }

    fn is_null(&self, position: usize) -> Result<bool> {
        check_readable_position(position, self.values.len())?;
        Ok(self.presence.is_null(position))
    }

    fn null_count(&self) -> usize {
        self.presence.count_nulls()
    }

    fn get_long(&self, position: usize, offset: usize) -> Result<i64> {
        self.read_value(position, offset, "get_long", T::as_long)
    }

    fn get_int(&self, position: usize, offset: usize) -> Result<i32> {
        self.read_value(position, offset, "get_int", T::as_int)
    }

    fn get_short(&self, position: usize, offset: usize) -> Result<i16> {
        self.read_value(position, offset, "get_short", T::as_short)
    }

    fn get_byte(&self, position: usize, offset: usize) -> Result<i8> {
        self.read_value(position, offset, "get_byte", T::as_byte)
    }

    /// Returns bytes of the value in native byte order.
    fn get_slice(&self, position: usize, offset: usize, length: usize) -> Result<&[u8]> {
        check_readable_position(position, self.values.len())?;
        let bytes = bytemuck::bytes_of(&self.values[position]);
        check_valid_region(bytes.len(), offset, length)?;
        Ok(&bytes[offset..offset + length])
    }

    fn get_single_value_block(&self, position: usize) -> Result<BlockRef> {
        check_readable_position(position, self.values.len())?;
        Ok(Arc::new(FixedWidthBlock::from_parts(
            self.values.slice(position..position + 1).compact(),
            self.presence.copy_range(position, 1),
        )))
    }

    fn copy_positions(
        &self,
        positions: &[usize],
        offset: usize,
        length: usize,
    ) -> Result<BlockRef> {
        let selected = check_valid_positions(positions, offset, length, self.values.len())?;
        let presence = self.presence.gather(selected);
        Ok(Self::collapse_or(|| self.values.gather(selected), presence))
    }

    fn get_region(&self, position_offset: usize, length: usize) -> Result<BlockRef> {
        check_valid_region(self.values.len(), position_offset, length)?;
        let presence = self.presence.slice(position_offset, length);
        Ok(Self::collapse_or(
            || self.values.slice(position_offset..position_offset + length),
            presence,
        ))
    }

    fn copy_region(&self, position: usize, length: usize) -> Result<BlockRef> {
        check_valid_region(self.values.len(), position, length)?;
        let presence = self.presence.copy_range(position, length);
        Ok(Self::collapse_or(
            || self.values.slice(position..position + length).compact(),
            presence,
        ))
    }

    fn size_in_bytes(&self) -> u64 {
        Self::BYTES_PER_POSITION * self.values.len() as u64
    }

    /// Matches `get_region(position, length).size_in_bytes()`, including the flat size of
    /// an all-null region.
    fn region_size_in_bytes(&self, position: usize, length: usize) -> Result<u64> {
        check_valid_region(self.values.len(), position, length)?;
        if self.presence.is_range_all_null(position, length) {
            Ok(NullValueBlock::SIZE_IN_BYTES)
        } else {
            Ok(Self::BYTES_PER_POSITION * length as u64)
        }
    }

    fn retained_size_in_bytes(&self) -> u64 {
        Self::INSTANCE_SIZE
            + self.values.retained_size_in_bytes() as u64
            + self.presence.retained_size_in_bytes() as u64
    }

    fn retained_bytes_for_each_part(&self, visit: &mut dyn FnMut(PartId, u64)) {
        visit(
            PartId::from_allocation(self.values.allocation_id()),
            self.values.retained_size_in_bytes() as u64,
        );
        if let Some((id, size)) = self.presence.buffer_part() {
            visit(PartId::from_allocation(id), size as u64);
        }
        visit(PartId::of(self), Self::INSTANCE_SIZE);
    }

    fn write_position_to(&self, position: usize, builder: &mut dyn BlockBuilder) -> Result<()> {
        check_readable_position(position, self.values.len())?;
        if self.presence.is_null(position) {
            builder.append_null();
            Ok(())
        } else {
            self.values[position].write_to(builder)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_width::{IntArrayBlock, LongArrayBlock, LongArrayBlockBuilder};
    use strata_common::error::ErrorKind;

    fn mixed() -> LongArrayBlock {
        // [10, null, 30, null, null, null, 70]
        LongArrayBlock::from_options([
            Some(10),
            None,
            Some(30),
            None,
            None,
            None,
            Some(70),
        ])
    }

    #[test]
    fn test_reads() {
        let block = mixed();
        assert_eq!(block.position_count(), 7);
        assert_eq!(block.null_count(), 4);
        assert_eq!(block.encoding_name(), "LONG_ARRAY");
        assert_eq!(block.get_long(0, 0).unwrap(), 10);
        assert_eq!(block.get_long(1, 0).unwrap(), 0);
        assert!(block.is_null(1).unwrap());
        assert!(!block.is_null(6).unwrap());
        assert_eq!(block.value(2).unwrap(), Some(30));
        assert_eq!(block.value(3).unwrap(), None);
        assert!(block.is_null(7).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_mismatched_readers() {
        let block = mixed();
        let err = block.get_int(0, 0).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidOperation { .. }));
        let err = block.get_long(0, 1).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
        assert!(block.get_byte(9, 0).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_get_slice() {
        let block = IntArrayBlock::from_values(vec![0x0403_0201]);
        let bytes = block.get_slice(0, 0, 4).unwrap();
        assert_eq!(bytes, &0x0403_0201i32.to_ne_bytes());
        assert_eq!(block.get_slice(0, 1, 2).unwrap().len(), 2);
        assert!(block.get_slice(0, 2, 3).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_region_shares_values() {
        let block = mixed();
        let region = block.get_region(0, 3).unwrap();
        assert_eq!(region.encoding(), BlockEncoding::LongArray);
        let region = LongArrayBlock::downcast(region.as_ref()).unwrap();
        assert_eq!(region.values(), &[10, 0, 30]);
        assert_eq!(region.retained_size_in_bytes(), block.retained_size_in_bytes());
        assert_eq!(region.region_size_in_bytes(0, 3).unwrap(), 27);

        let copy = block.copy_region(0, 3).unwrap();
        assert!(copy.retained_size_in_bytes() < block.retained_size_in_bytes());
    }

    #[test]
    fn test_null_selections_collapse() {
        let block = mixed();
        let region = block.get_region(3, 3).unwrap();
        assert_eq!(region.encoding(), BlockEncoding::NullValue);
        assert_eq!(region.position_count(), 3);

        let copy = block.copy_region(1, 1).unwrap();
        assert_eq!(copy.encoding(), BlockEncoding::NullValue);

        let gathered = block.copy_positions(&[1, 3, 5], 0, 3).unwrap();
        assert_eq!(gathered.encoding(), BlockEncoding::NullValue);
        assert_eq!(gathered.position_count(), 3);

        let gathered = block.copy_positions(&[1, 6, 5], 0, 3).unwrap();
        assert_eq!(gathered.encoding(), BlockEncoding::LongArray);
        assert_eq!(gathered.get_long(1, 0).unwrap(), 70);
        assert!(gathered.is_null(2).unwrap());

        assert_eq!(
            block.get_region(7, 0).unwrap().encoding(),
            BlockEncoding::NullValue
        );
    }

    #[test]
    fn test_region_size_matches_region() {
        let block = mixed();
        for (position, length) in [(0, 3), (1, 1), (3, 3), (1, 2), (7, 0), (0, 7)] {
            let region = block.get_region(position, length).unwrap();
            assert_eq!(
                block.region_size_in_bytes(position, length).unwrap(),
                region.size_in_bytes(),
                "region {position}..{}",
                position + length
            );
        }
        assert_eq!(
            block.region_size_in_bytes(3, 3).unwrap(),
            NullValueBlock::SIZE_IN_BYTES
        );
        assert!(block.region_size_in_bytes(6, 2).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_single_value_block_keeps_encoding() {
        let block = mixed();
        let single = block.get_single_value_block(3).unwrap();
        assert_eq!(single.encoding(), BlockEncoding::LongArray);
        assert!(single.is_null(0).unwrap());
        let single = block.get_single_value_block(6).unwrap();
        assert_eq!(single.get_long(0, 0).unwrap(), 70);
    }

    #[test]
    fn test_retained_parts_sum() {
        let block = mixed();
        let mut parts = Vec::new();
        block.retained_bytes_for_each_part(&mut |part, size| parts.push((part, size)));
        assert_eq!(parts.len(), 3);
        let total: u64 = parts.iter().map(|(_, size)| size).sum();
        assert_eq!(total, block.retained_size_in_bytes());

        let region = block.get_region(0, 3).unwrap();
        let mut region_parts = Vec::new();
        region.retained_bytes_for_each_part(&mut |part, size| region_parts.push((part, size)));
        assert_eq!(region_parts[0], parts[0]);
    }

    #[test]
    fn test_write_position_to() {
        let block = mixed();
        let mut builder = LongArrayBlockBuilder::new(4);
        block.write_position_to(0, &mut builder).unwrap();
        block.write_position_to(1, &mut builder).unwrap();
        assert!(block.write_position_to(7, &mut builder).is_err());
        let copy = builder.build();
        assert_eq!(copy.get_long(0, 0).unwrap(), 10);
        assert!(copy.is_null(1).unwrap());

        let mut builder = crate::fixed_width::IntArrayBlockBuilder::new(1);
        assert!(block.write_position_to(0, &mut builder).is_err());
    }

    #[test]
    fn test_new_checks_lengths() {
        let values = SharedVec::from_vec(vec![1i64, 2]);
        assert!(LongArrayBlock::new(values.clone(), Presence::Trivial(2)).is_ok());
        let err = LongArrayBlock::new(values, Presence::Nulls(3)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }
}
