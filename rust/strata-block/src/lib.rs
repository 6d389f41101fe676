//! Columnar value containers for the Strata execution engine.
//!
//! A [`Block`](crate::block::Block) holds one column's worth of values for a batch of
//! positions. Blocks are immutable once built and are shared between pipeline stages
//! through [`BlockRef`](crate::block::BlockRef) (`Arc<dyn Block>`), so they can be read
//! from any thread without locking.
//!
//! # Building blocks
//!
//! Producers append to a [`BlockBuilder`](crate::block::BlockBuilder) one entry per
//! output row and then consume it with `build()`. Fixed-width builders
//! ([`LongArrayBlockBuilder`], [`IntArrayBlockBuilder`], [`ShortArrayBlockBuilder`],
//! [`ByteArrayBlockBuilder`]) collapse to a [`NullValueBlock`] when no value was ever
//! appended. The same collapse applies to every region or gathered selection that
//! covers only null positions, whether it is taken from a builder or from a built block.
//!
//! # Encodings
//!
//! Consumers never match on concrete block types. They read through the `Block` trait
//! and, when they need to dispatch (serializers, typed readers), they use
//! [`BlockEncoding`](crate::encoding::BlockEncoding) and the
//! [`BlockEncodingRegistry`](crate::encoding::BlockEncodingRegistry).
//!
//! # Memory accounting
//!
//! Every block answers `size_in_bytes()`, `region_size_in_bytes()` and
//! `retained_size_in_bytes()` in constant time. Per-instance overheads are compile-time
//! constants derived from the type layout (`std::mem::size_of`).

pub mod block;
pub mod encoding;
pub mod fixed_width;
pub mod null_value_block;
pub mod presence;

pub use block::{Block, BlockBuilder, BlockRef, DEFAULT_EXPECTED_ENTRIES, PartId};
pub use encoding::{BlockEncoding, BlockEncodingRegistry, read_long_value};
pub use fixed_width::{
    ByteArrayBlock, ByteArrayBlockBuilder, FixedWidthBlock, FixedWidthBlockBuilder,
    FixedWidthValue, IntArrayBlock, IntArrayBlockBuilder, LongArrayBlock, LongArrayBlockBuilder,
    ShortArrayBlock, ShortArrayBlockBuilder,
};
pub use null_value_block::NullValueBlock;
