//! Tests for size exponents and block option encoding.

use proptest::prelude::*;
use rstest::rstest;

use crate::block::{BlockError, BlockOption, Szx};

#[rstest]
#[case(16, 0)]
#[case(32, 1)]
#[case(64, 2)]
#[case(128, 3)]
#[case(256, 4)]
#[case(512, 5)]
#[case(1024, 6)]
fn szx_encodes_block_sizes(#[case] size: usize, #[case] exponent: u8) {
    let szx = Szx::from_block_size(size).expect("valid block size");
    assert_eq!(szx.get(), exponent);
    assert_eq!(szx.size(), size);
}

#[rstest]
#[case(0)]
#[case(8)]
#[case(48)]
#[case(100)]
#[case(2048)]
fn szx_rejects_invalid_block_sizes(#[case] size: usize) {
    assert_eq!(
        Szx::from_block_size(size),
        Err(BlockError::InvalidBlockSize(size))
    );
}

#[test]
fn szx_rejects_reserved_exponent() {
    assert_eq!(Szx::new(7), Err(BlockError::InvalidSzx(7)));
    assert_eq!(Szx::new(6), Ok(Szx::MAX));
}

#[test]
fn block_option_exposes_offset_and_size() {
    let block = BlockOption::new(3, Szx::new(2).expect("valid szx"), false).expect("valid num");
    assert_eq!(block.num(), 3);
    assert_eq!(block.size(), 64);
    assert_eq!(block.offset(), 192);
    assert!(!block.more());
    assert!(block.with_more(true).more());
}

#[test]
fn block_option_rejects_num_beyond_twenty_bits() {
    let err = BlockOption::new(1 << 20, Szx::MIN, false).expect_err("num must fit in 20 bits");
    assert_eq!(err, BlockError::NumOutOfRange(1 << 20));
}

#[rstest]
#[case(0, 0, false, &[])]
#[case(0, 6, true, &[0x0e])]
#[case(1, 2, false, &[0x12])]
#[case(20, 5, true, &[0x01, 0x4d])]
#[case(0x000f_ffff, 6, false, &[0xff, 0xff, 0xf6])]
fn block_option_encodes_minimal_value(
    #[case] num: u32,
    #[case] szx: u8,
    #[case] more: bool,
    #[case] expected: &[u8],
) {
    let block = BlockOption::new(num, Szx::new(szx).expect("valid szx"), more).expect("valid num");
    assert_eq!(block.to_bytes(), expected);
    assert_eq!(BlockOption::from_bytes(expected), Ok(block));
}

#[test]
fn block_option_rejects_long_or_reserved_values() {
    assert_eq!(
        BlockOption::from_bytes(&[0, 0, 0, 1]),
        Err(BlockError::ValueTooLong(4))
    );
    assert_eq!(BlockOption::from_bytes(&[0x07]), Err(BlockError::InvalidSzx(7)));
}

#[test]
fn block_option_displays_num_more_and_size() {
    let block = BlockOption::new(4, Szx::new(4).expect("valid szx"), true).expect("valid num");
    assert_eq!(block.to_string(), "4/1/256");
}

proptest! {
    #[test]
    fn szx_round_trips_every_valid_exponent(exponent in 0_u8..=6) {
        let size = Szx::new(exponent).expect("valid szx").size();
        prop_assert_eq!(Szx::from_block_size(size).map(Szx::size), Ok(size));
    }

    #[test]
    fn block_option_decodes_its_own_encoding(
        num in 0_u32..(1 << 20),
        exponent in 0_u8..=6,
        more in any::<bool>(),
    ) {
        let block = BlockOption::new(num, Szx::new(exponent).expect("valid szx"), more)
            .expect("valid num");
        prop_assert_eq!(BlockOption::from_bytes(&block.to_bytes()), Ok(block));
    }
}
