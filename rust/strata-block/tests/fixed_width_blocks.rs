use strata_block::{
    Block, BlockEncoding, BlockEncodingRegistry, BlockRef, ByteArrayBlockBuilder,
    FixedWidthBlockBuilder, FixedWidthValue, IntArrayBlockBuilder, LongArrayBlockBuilder,
    ShortArrayBlockBuilder,
};
use strata_testkit::{
    assertions::assert_block,
    data_gen::{random_null_runs, random_nullable_values},
};

fn build<T: FixedWidthValue>(values: &[Option<i64>], convert: impl Fn(i64) -> T) -> BlockRef {
    let mut builder = FixedWidthBlockBuilder::<T>::new(values.len());
    for value in values {
        builder.append_option(value.map(&convert));
    }
    builder.build()
}

fn build_all_widths(values: &[Option<i64>]) -> Vec<BlockRef> {
    vec![
        build::<i64>(values, |v| v),
        build::<i32>(values, |v| v as i32),
        build::<i16>(values, |v| v as i16),
        build::<i8>(values, |v| v as i8),
    ]
}

#[test]
fn test_random_nullable_blocks() {
    for seed in 0..4 {
        let values = random_nullable_values(seed, 200, -100, 100, 0.4);
        for block in build_all_widths(&values) {
            assert_block(block.as_ref(), &values);
        }
    }
}

#[test]
fn test_null_runs_collapse_in_regions() {
    let values = random_null_runs(11, 300, 40);
    let narrowed: Vec<Option<i64>> = values.iter().map(|v| v.map(|v| v as i16 as i64)).collect();
    let block = build::<i16>(&narrowed, |v| v as i16);
    assert_block(block.as_ref(), &narrowed);
}

#[test]
fn test_builder_never_collapses_after_value() {
    let mut builder = LongArrayBlockBuilder::new(8);
    builder.append_value(42);
    for _ in 0..1000 {
        builder.append_option(None);
    }
    let block = builder.build();
    assert_eq!(block.encoding(), BlockEncoding::LongArray);
    assert_eq!(block.null_count(), 1000);

    let tail = block.get_region(1, 1000).unwrap();
    assert_eq!(tail.encoding(), BlockEncoding::NullValue);
    let head = block.get_region(0, 2).unwrap();
    assert_eq!(head.encoding(), BlockEncoding::LongArray);
}

#[test]
fn test_registry_dispatch() {
    let registry = BlockEncodingRegistry::default();
    let blocks: Vec<BlockRef> = vec![
        {
            let mut b = ByteArrayBlockBuilder::new(1);
            b.append_value(1);
            b.build()
        },
        {
            let mut b = ShortArrayBlockBuilder::new(1);
            b.append_value(1);
            b.build()
        },
        {
            let mut b = IntArrayBlockBuilder::new(1);
            b.append_value(1);
            b.build()
        },
    ];
    for block in &blocks {
        let encoding = registry.resolve(block.as_ref()).unwrap();
        assert_eq!(encoding, block.encoding());
        assert_eq!(encoding.value_width().map(|w| (w + 1) as u64), Some(block.size_in_bytes()));
    }
}

#[test]
fn test_shared_regions_dedupe_parts() {
    let values = random_nullable_values(5, 64, 0, 1000, 0.2);
    let block = build::<i64>(&values, |v| v);
    let left = block.get_region(0, 32).unwrap();
    let right = block.get_region(32, 32).unwrap();

    let mut parts = std::collections::HashMap::new();
    for region in [&left, &right] {
        region.retained_bytes_for_each_part(&mut |part, size| {
            parts.insert(part, size);
        });
    }
    let shared: u64 = parts.values().sum();
    assert!(shared < left.retained_size_in_bytes() + right.retained_size_in_bytes());
}

#[test]
fn test_zero_value_does_not_collapse() {
    let mut builder = LongArrayBlockBuilder::new(4);
    builder.append_value(0);
    let block = builder.build();
    assert_eq!(block.encoding(), BlockEncoding::LongArray);
    assert!(!block.is_null(0).unwrap());
    assert_eq!(block.get_long(0, 0).unwrap(), 0);

    let mut builder = ByteArrayBlockBuilder::new(4);
    builder.append_option(None).append_value(0).append_option(None);
    let block = builder.build();
    assert_eq!(block.encoding(), BlockEncoding::ByteArray);
    assert_block(block.as_ref(), &[None, Some(0), None]);
}
