use strata_block::{
    Block, BlockBuilder, BlockEncoding, BlockRef, ByteArrayBlockBuilder, IntArrayBlockBuilder,
    LongArrayBlockBuilder, NullValueBlock, ShortArrayBlockBuilder,
};
use strata_testkit::assertions::assert_block;

#[test]
fn test_null_value_block_contract() {
    for position_count in 0..10 {
        let block = NullValueBlock::new(position_count);
        assert_block(&block, &vec![None; position_count]);
    }
}

fn assert_null_value(block: &BlockRef, position_count: usize) {
    assert_eq!(block.encoding(), BlockEncoding::NullValue);
    assert_eq!(block.encoding_name(), "NULL_VALUE");
    assert_block(block.as_ref(), &vec![None; position_count]);
}

fn assert_builder_collapses(mut builder: Box<dyn BlockBuilder>) {
    for _ in 0..100 {
        builder.append_null();
    }
    assert_null_value(&builder.copy_positions(&[2, 4, 6, 8], 0, 4).unwrap(), 4);
    assert_null_value(&builder.copy_region(90, 10).unwrap(), 10);
    assert_null_value(&builder.get_region(80, 10).unwrap(), 10);

    let block = builder.build_boxed();
    assert_null_value(&block, 100);
    assert_null_value(&block.copy_positions(&[2, 4, 6, 8], 0, 4).unwrap(), 4);
    assert_null_value(&block.copy_region(90, 10).unwrap(), 10);
    assert_null_value(&block.get_region(80, 10).unwrap(), 10);
}

#[test]
fn test_all_null_builders_collapse() {
    assert_builder_collapses(Box::new(LongArrayBlockBuilder::new(100)));
    assert_builder_collapses(Box::new(IntArrayBlockBuilder::new(100)));
    assert_builder_collapses(Box::new(ShortArrayBlockBuilder::new(100)));
    assert_builder_collapses(Box::new(ByteArrayBlockBuilder::new(100)));
}

#[test]
fn test_zero_length_selections_collapse() {
    let mut builder = LongArrayBlockBuilder::new(4);
    builder.append_value(1).append_value(2);
    assert_null_value(&builder.copy_region(1, 0).unwrap(), 0);
    assert_null_value(&builder.copy_positions(&[], 0, 0).unwrap(), 0);
    let block = builder.build();
    assert_null_value(&block.get_region(2, 0).unwrap(), 0);
}

#[test]
fn test_negative_count_is_rejected() {
    assert!(NullValueBlock::try_from_count(-5).is_err());
    let block = NullValueBlock::try_from_count(0).unwrap();
    assert_null_value(&block.into_ref(), 0);
}
