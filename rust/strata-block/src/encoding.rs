//! Block encoding identifiers and the name registry used for generic dispatch.

use std::sync::Arc;

use ahash::AHashMap;
use strata_common::{Result, error::Error};

use crate::{
    block::{Block, BlockBuilder},
    fixed_width::{
        ByteArrayBlockBuilder, IntArrayBlockBuilder, LongArrayBlockBuilder, ShortArrayBlockBuilder,
    },
};

/// The closed set of block encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockEncoding {
    /// Every position is null; only the position count is stored.
    NullValue,
    /// 64-bit fixed-width values.
    LongArray,
    /// 32-bit fixed-width values.
    IntArray,
    /// 16-bit fixed-width values.
    ShortArray,
    /// 8-bit fixed-width values.
    ByteArray,
}

impl BlockEncoding {
    pub const ALL: [BlockEncoding; 5] = [
        BlockEncoding::NullValue,
        BlockEncoding::LongArray,
        BlockEncoding::IntArray,
        BlockEncoding::ShortArray,
        BlockEncoding::ByteArray,
    ];

    /// Stable encoding name, as written by serializers.
    pub const fn name(self) -> &'static str {
        match self {
            BlockEncoding::NullValue => "NULL_VALUE",
            BlockEncoding::LongArray => "LONG_ARRAY",
            BlockEncoding::IntArray => "INT_ARRAY",
            BlockEncoding::ShortArray => "SHORT_ARRAY",
            BlockEncoding::ByteArray => "BYTE_ARRAY",
        }
    }

    pub fn from_name(name: &str) -> Option<BlockEncoding> {
        Self::ALL.into_iter().find(|encoding| encoding.name() == name)
    }

    /// Width in bytes of one value, `None` for encodings that store no values.
    pub const fn value_width(self) -> Option<usize> {
        match self {
            BlockEncoding::NullValue => None,
            BlockEncoding::LongArray => Some(8),
            BlockEncoding::IntArray => Some(4),
            BlockEncoding::ShortArray => Some(2),
            BlockEncoding::ByteArray => Some(1),
        }
    }
}

impl std::fmt::Display for BlockEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Creates an empty builder for the given capacity hint.
pub type BuilderFactory = Arc<dyn Fn(usize) -> Box<dyn BlockBuilder> + Send + Sync>;

/// Wraps a builder constructor into a [`BuilderFactory`].
pub fn builder_factory<B, F>(create: F) -> BuilderFactory
where
    B: BlockBuilder + 'static,
    F: Fn(usize) -> B + Send + Sync + 'static,
{
    Arc::new(move |expected| Box::new(create(expected)) as Box<dyn BlockBuilder>)
}

struct RegistryEntry {
    encoding: BlockEncoding,
    factory: BuilderFactory,
}

/// Maps encoding names to encodings and to the builders that produce them.
///
/// Serializers and other generic consumers resolve a block's `encoding_name()` here
/// instead of inspecting its concrete type.
pub struct BlockEncodingRegistry {
    entries: AHashMap<String, RegistryEntry>,
}

impl BlockEncodingRegistry {
    /// Creates a registry with no entries.
    pub fn new() -> BlockEncodingRegistry {
        BlockEncodingRegistry {
            entries: AHashMap::new(),
        }
    }

    /// Creates a registry holding every built-in encoding under its own name.
    ///
    /// `NULL_VALUE` carries no width and resolves to a 64-bit builder factory.
    pub fn with_builtins() -> BlockEncodingRegistry {
        let mut registry = BlockEncodingRegistry::new();
        for encoding in BlockEncoding::ALL {
            let factory = match encoding {
                BlockEncoding::NullValue | BlockEncoding::LongArray => {
                    builder_factory(LongArrayBlockBuilder::new)
                }
                BlockEncoding::IntArray => builder_factory(IntArrayBlockBuilder::new),
                BlockEncoding::ShortArray => builder_factory(ShortArrayBlockBuilder::new),
                BlockEncoding::ByteArray => builder_factory(ByteArrayBlockBuilder::new),
            };
            registry
                .entries
                .insert(encoding.name().to_string(), RegistryEntry { encoding, factory });
        }
        registry
    }

    /// Registers `name` as an additional name for `encoding`.
    ///
    /// Fails if the name is already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        encoding: BlockEncoding,
        factory: BuilderFactory,
    ) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::invalid_arg(
                "name",
                format!("encoding '{name}' is already registered"),
            ));
        }
        log::debug!("registering block encoding '{name}' as {encoding}");
        self.entries.insert(name, RegistryEntry { encoding, factory });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<BlockEncoding> {
        self.entries
            .get(name)
            .map(|entry| entry.encoding)
            .ok_or_else(|| Error::unknown_key("block encoding", name))
    }

    /// Resolves the encoding of `block` through its advertised name.
    pub fn resolve(&self, block: &dyn Block) -> Result<BlockEncoding> {
        self.lookup(block.encoding_name())
    }

    pub fn create_builder(
        &self,
        name: &str,
        expected_entries: usize,
    ) -> Result<Box<dyn BlockBuilder>> {
        self.entries
            .get(name)
            .map(|entry| (entry.factory)(expected_entries))
            .ok_or_else(|| Error::unknown_key("block encoding", name))
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for BlockEncodingRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Reads the value at `position` of any block widened to `i64`, or `None` for a null.
///
/// This is the uniform numeric read path: it dispatches on the block's encoding and
/// calls the reader of the matching width.
pub fn read_long_value(block: &dyn Block, position: usize) -> Result<Option<i64>> {
    if block.is_null(position)? {
        return Ok(None);
    }
    let value = match block.encoding() {
        BlockEncoding::NullValue => return Ok(None),
        BlockEncoding::LongArray => block.get_long(position, 0)?,
        BlockEncoding::IntArray => block.get_int(position, 0)? as i64,
        BlockEncoding::ShortArray => block.get_short(position, 0)? as i64,
        BlockEncoding::ByteArray => block.get_byte(position, 0)? as i64,
    };
    Ok(Some(value))
}
