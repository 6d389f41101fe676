//! Assertions over the observable behavior of a block.

use strata_block::{Block, BlockEncoding, BlockEncodingRegistry, BlockRef, read_long_value};

/// Asserts that `block` holds exactly `expected`, `None` marking a null.
///
/// Beyond per-position reads this exercises regions, copies, single-value blocks and
/// `write_position_to`, and checks that every all-null selection comes back as a
/// `NULL_VALUE` block.
pub fn assert_block(block: &dyn Block, expected: &[Option<i64>]) {
    assert_eq!(block.position_count(), expected.len());
    assert_eq!(
        block.null_count(),
        expected.iter().filter(|value| value.is_none()).count()
    );
    assert_eq!(block.is_empty(), expected.is_empty());
    assert_positions(block, expected);

    let count = expected.len();
    assert!(block.is_null(count).unwrap_err().is_out_of_range());
    assert!(read_long_value(block, count).is_err());
    assert!(block.get_single_value_block(count).is_err());
    assert!(block.get_region(count + 1, 0).is_err());
    assert!(block.copy_region(0, count + 1).is_err());
    assert!(block.region_size_in_bytes(0, count).is_ok());

    for (position, value) in expected.iter().enumerate() {
        let single = block.get_single_value_block(position).unwrap();
        assert_positions(single.as_ref(), std::slice::from_ref(value));
    }

    let step = (count / 8).max(1);
    for offset in (0..=count).step_by(step) {
        for length in (0..=count - offset).step_by(step) {
            let slice = &expected[offset..offset + length];
            assert_selection(&block.get_region(offset, length).unwrap(), slice);
            assert_selection(&block.copy_region(offset, length).unwrap(), slice);
        }
    }

    let reversed: Vec<usize> = (0..count).rev().collect();
    let gathered = block.copy_positions(&reversed, 0, count).unwrap();
    let reversed_values: Vec<Option<i64>> = expected.iter().rev().copied().collect();
    assert_selection(&gathered, &reversed_values);

    assert_rewritten(block, expected);
}

/// Asserts the per-position reads of `block` against `expected`.
pub fn assert_positions(block: &dyn Block, expected: &[Option<i64>]) {
    assert_eq!(block.position_count(), expected.len());
    for (position, value) in expected.iter().enumerate() {
        assert_eq!(
            block.is_null(position).unwrap(),
            value.is_none(),
            "nullness at {position}"
        );
        assert_eq!(
            read_long_value(block, position).unwrap(),
            *value,
            "value at {position}"
        );
    }
}

fn assert_selection(selection: &BlockRef, expected: &[Option<i64>]) {
    assert_positions(selection.as_ref(), expected);
    if expected.iter().all(Option::is_none) {
        assert_eq!(selection.encoding(), BlockEncoding::NullValue);
    }
}

/// Copies `block` position by position into a builder resolved through the registry.
fn assert_rewritten(block: &dyn Block, expected: &[Option<i64>]) {
    let registry = BlockEncodingRegistry::with_builtins();
    let mut builder = registry
        .create_builder(block.encoding_name(), expected.len())
        .unwrap();
    for position in 0..block.position_count() {
        block.write_position_to(position, builder.as_mut()).unwrap();
    }
    assert_eq!(builder.position_count(), expected.len());
    let rebuilt = builder.build_boxed();
    assert_selection(&rebuilt, expected);
    if expected.iter().any(Option::is_some) {
        assert_eq!(rebuilt.encoding(), block.encoding());
    }
}
