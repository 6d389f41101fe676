//! Fixed-width numeric blocks and their builders, generic over the value width.

use std::fmt;

use strata_common::Result;

use crate::{block::BlockBuilder, encoding::BlockEncoding};

mod array_block;
mod array_builder;

pub use array_block::FixedWidthBlock;
pub use array_builder::FixedWidthBlockBuilder;

pub type LongArrayBlock = FixedWidthBlock<i64>;
pub type IntArrayBlock = FixedWidthBlock<i32>;
pub type ShortArrayBlock = FixedWidthBlock<i16>;
pub type ByteArrayBlock = FixedWidthBlock<i8>;

pub type LongArrayBlockBuilder = FixedWidthBlockBuilder<i64>;
pub type IntArrayBlockBuilder = FixedWidthBlockBuilder<i32>;
pub type ShortArrayBlockBuilder = FixedWidthBlockBuilder<i16>;
pub type ByteArrayBlockBuilder = FixedWidthBlockBuilder<i8>;

/// A value type stored by a fixed-width block.
///
/// Each implementation is bound to one [`BlockEncoding`]. The `as_*` / `from_*` pairs
/// answer `Some` only for the reader and writer of the matching width; every other
/// width is rejected by the block or builder as an invalid operation.
pub trait FixedWidthValue:
    bytemuck::Pod + PartialEq + fmt::Debug + Send + Sync + 'static
{
    const ENCODING: BlockEncoding;

    /// Width of one value in bytes.
    const WIDTH: usize = std::mem::size_of::<Self>();

    fn as_long(self) -> Option<i64> {
        None
    }

    fn as_int(self) -> Option<i32> {
        None
    }

    fn as_short(self) -> Option<i16> {
        None
    }

    fn as_byte(self) -> Option<i8> {
        None
    }

    fn from_long(_value: i64) -> Option<Self> {
        None
    }

    fn from_int(_value: i32) -> Option<Self> {
        None
    }

    fn from_short(_value: i16) -> Option<Self> {
        None
    }

    fn from_byte(_value: i8) -> Option<Self> {
        None
    }

    /// Appends this value to `builder` through the writer of the matching width.
    fn write_to(self, builder: &mut dyn BlockBuilder) -> Result<()>;
}

macro_rules! impl_fixed_width_value {
    ($ty:ty, $encoding:ident, $as_fn:ident, $from_fn:ident, $write_fn:ident) => {
        impl FixedWidthValue for $ty {
            const ENCODING: BlockEncoding = BlockEncoding::$encoding;

            fn $as_fn(self) -> Option<$ty> {
                Some(self)
            }

            fn $from_fn(value: $ty) -> Option<$ty> {
                Some(value)
            }

            fn write_to(self, builder: &mut dyn BlockBuilder) -> Result<()> {
                builder.$write_fn(self)
            }
        }
    };
}

impl_fixed_width_value!(i64, LongArray, as_long, from_long, write_long);
impl_fixed_width_value!(i32, IntArray, as_int, from_int, write_int);
impl_fixed_width_value!(i16, ShortArray, as_short, from_short, write_short);
impl_fixed_width_value!(i8, ByteArray, as_byte, from_byte, write_byte);
