use std::sync::Arc;

use strata_common::{
    Result,
    checks::{check_readable_position, check_valid_positions, check_valid_region},
    error::Error,
};
use strata_shared_vec::SharedVec;

use super::{FixedWidthBlock, FixedWidthValue};
use crate::{
    block::{BlockBuilder, BlockRef, DEFAULT_EXPECTED_ENTRIES},
    encoding::BlockEncoding,
    null_value_block::NullValueBlock,
    presence::{Presence, PresenceBuilder},
};

/// Appends fixed-width values and nulls, producing a [`FixedWidthBlock`].
///
/// While only nulls have been appended the builder stores nothing but their count,
/// and `build` returns a [`NullValueBlock`]. The first value backfills zeros for the
/// preceding nulls; from then on `build` always yields the fixed-width encoding.
///
/// `build` consumes the builder. Clone it first to build more than once.
#[derive(Debug, Clone)]
pub struct FixedWidthBlockBuilder<T> {
    values: Vec<T>,
    presence: PresenceBuilder,
    expected_entries: usize,
}

impl<T: FixedWidthValue> FixedWidthBlockBuilder<T> {
    /// Creates an empty builder. `expected_entries` sizes the value buffer once the
    /// first value arrives.
    pub fn new(expected_entries: usize) -> Self {
        FixedWidthBlockBuilder {
            values: Vec::new(),
            presence: PresenceBuilder::new(),
            expected_entries,
        }
    }

    pub fn len(&self) -> usize {
        self.presence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presence.is_empty()
    }

    pub fn append_value(&mut self, value: T) -> &mut Self {
        if self.values.is_empty() {
            let len = self.presence.len();
            self.values.reserve(self.expected_entries.max(len + 1));
            self.values.resize(len, T::zeroed());
        }
        self.values.push(value);
        self.presence.add_non_null();
        self
    }

    pub fn append_option(&mut self, value: Option<T>) -> &mut Self {
        match value {
            Some(value) => self.append_value(value),
            None => {
                self.push_null();
                self
            }
        }
    }

    /// Returns `true` if the entry at `position` is null.
    pub fn is_null(&self, position: usize) -> Result<bool> {
        check_readable_position(position, self.len())?;
        Ok(self.presence.is_null(position))
    }

    /// Consumes the builder and returns the block.
    pub fn build(self) -> BlockRef {
        let FixedWidthBlockBuilder {
            values, presence, ..
        } = self;
        if presence.is_all_null() {
            return NullValueBlock::new(presence.len()).into_ref();
        }
        Arc::new(FixedWidthBlock::from_parts(
            SharedVec::from_vec(values),
            presence.build(),
        ))
    }

    fn push_null(&mut self) {
        if !self.values.is_empty() {
            self.values.push(T::zeroed());
        }
        self.presence.add_null();
    }

    fn write_value(&mut self, writer: &str, value: Option<T>) -> Result<()> {
        let value = value
            .ok_or_else(|| Error::invalid_operation(format!("{writer} on {}", T::ENCODING)))?;
        self.append_value(value);
        Ok(())
    }

    fn finish_selection(&self, presence: Presence, values: impl FnOnce() -> Vec<T>) -> BlockRef {
        if presence.is_all_null() {
            NullValueBlock::new(presence.len()).into_ref()
        } else {
            Arc::new(FixedWidthBlock::from_parts(
                SharedVec::from_vec(values()),
                presence,
            ))
        }
    }
}

impl<T: FixedWidthValue> Default for FixedWidthBlockBuilder<T> {
    fn default() -> Self {
        Self::new(DEFAULT_EXPECTED_ENTRIES)
    }
}

impl<T: FixedWidthValue> BlockBuilder for FixedWidthBlockBuilder<T> {
    fn position_count(&self) -> usize {
        self.len()
    }

    fn append_null(&mut self) {
        self.push_null();
    }

    fn write_long(&mut self, value: i64) -> Result<()> {
        self.write_value("write_long", T::from_long(value))
    }

    fn write_int(&mut self, value: i32) -> Result<()> {
        self.write_value("write_int", T::from_int(value))
    }

    fn write_short(&mut self, value: i16) -> Result<()> {
        self.write_value("write_short", T::from_short(value))
    }

    fn write_byte(&mut self, value: i8) -> Result<()> {
        self.write_value("write_byte", T::from_byte(value))
    }

    fn encoding(&self) -> BlockEncoding {
        T::ENCODING
    }

    /// Matches the size of the block `build` would return.
    fn size_in_bytes(&self) -> u64 {
        if self.presence.is_all_null() {
            NullValueBlock::SIZE_IN_BYTES
        } else {
            (T::WIDTH as u64 + 1) * self.len() as u64
        }
    }

    fn retained_size_in_bytes(&self) -> u64 {
        (std::mem::size_of::<Self>()
            + self.values.capacity() * T::WIDTH
            + self.presence.retained_size_in_bytes()) as u64
    }

    fn copy_positions(
        &self,
        positions: &[usize],
        offset: usize,
        length: usize,
    ) -> Result<BlockRef> {
        let selected = check_valid_positions(positions, offset, length, self.len())?;
        let presence = self.presence.gather(selected);
        Ok(self.finish_selection(presence, || {
            selected.iter().map(|&i| self.values[i]).collect()
        }))
    }

    /// Equivalent to `copy_region`: the builder's buffers keep growing, so a block
    /// cannot share them.
    fn get_region(&self, position_offset: usize, length: usize) -> Result<BlockRef> {
        self.copy_region(position_offset, length)
    }

    fn copy_region(&self, position: usize, length: usize) -> Result<BlockRef> {
        check_valid_region(self.len(), position, length)?;
        let presence = self.presence.copy_range(position, length);
        Ok(self.finish_selection(presence, || {
            self.values[position..position + length].to_vec()
        }))
    }

    fn new_block_builder_like(&self, expected_entries: usize) -> Box<dyn BlockBuilder> {
        Box::new(Self::new(expected_entries))
    }

    fn build_boxed(self: Box<Self>) -> BlockRef {
        (*self).build()
    }
}
