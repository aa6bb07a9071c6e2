//! Tests for rebuilding incoming bodies from blocks.

use proptest::prelude::*;

use super::{body, limit, request_block, response_block};
use crate::assembler::{
    AssemblyError,
    AssemblyStatus,
    RequestBlockAssembler,
    ResponseBlockAssembler,
};

#[test]
fn request_blocks_reassemble_in_order() {
    let payload = body(80);
    let mut assembler = RequestBlockAssembler::new(limit(1024));

    let first = request_block(0, 32, true, payload[..32].to_vec());
    let second = request_block(1, 32, true, payload[32..64].to_vec());
    let last = request_block(2, 32, false, payload[64..].to_vec());

    assert_eq!(assembler.insert(first), Ok(AssemblyStatus::Incomplete));
    assert_eq!(assembler.body_len(), 32);
    assert_eq!(assembler.insert(second), Ok(AssemblyStatus::Incomplete));
    assert!(assembler.assembled_request().is_none());
    assert_eq!(assembler.insert(last), Ok(AssemblyStatus::Complete));

    let assembled = assembler.assembled_request().expect("request complete");
    assert_eq!(assembled.payload().as_ref(), payload.as_slice());
    let block1 = assembled.options().block1().expect("final block options kept");
    assert_eq!(block1.num(), 2);
    assert!(!block1.more());
}

#[test]
fn repeated_block_is_reported_as_duplicate() {
    let payload = body(48);
    let mut assembler = ResponseBlockAssembler::new(limit(1024));

    let first = response_block(0, 32, true, payload[..32].to_vec());
    assert_eq!(assembler.insert(first.clone()), Ok(AssemblyStatus::Incomplete));
    assert_eq!(assembler.insert(first), Ok(AssemblyStatus::Duplicate));
    assert_eq!(assembler.body_len(), 32);

    let last = response_block(1, 32, false, payload[32..].to_vec());
    assert_eq!(assembler.insert(last.clone()), Ok(AssemblyStatus::Complete));
    assert_eq!(assembler.insert(last), Ok(AssemblyStatus::Duplicate));
    assert!(assembler.is_complete());
}

#[test]
fn early_block_is_parked_until_the_gap_fills() {
    let payload = body(40);
    let mut assembler = ResponseBlockAssembler::new(limit(1024));

    let last = response_block(1, 32, false, payload[32..].to_vec());
    assert_eq!(assembler.insert(last), Ok(AssemblyStatus::Incomplete));
    assert_eq!(assembler.parked_len(), 1);
    assert!(!assembler.is_complete());

    let first = response_block(0, 32, true, payload[..32].to_vec());
    assert_eq!(assembler.insert(first), Ok(AssemblyStatus::Complete));
    assert_eq!(assembler.parked_len(), 0);

    let assembled = assembler.assembled_response().expect("response complete");
    assert_eq!(assembled.payload().as_ref(), payload.as_slice());
    assert!(
        !assembled
            .options()
            .block2()
            .expect("block2 kept")
            .more()
    );
}

#[test]
fn block_size_may_shrink_mid_transfer() {
    let payload = body(96);
    let mut assembler = RequestBlockAssembler::new(limit(1024));

    let first = request_block(0, 64, true, payload[..64].to_vec());
    let last = request_block(2, 32, false, payload[64..].to_vec());

    assert_eq!(assembler.insert(first), Ok(AssemblyStatus::Incomplete));
    assert_eq!(assembler.insert(last), Ok(AssemblyStatus::Complete));
    assert_eq!(
        assembler
            .assembled_request()
            .expect("request complete")
            .payload()
            .as_ref(),
        payload.as_slice()
    );
}

#[test]
fn short_intermediate_block_is_rejected() {
    let mut assembler = RequestBlockAssembler::new(limit(1024));
    let err = assembler
        .insert(request_block(0, 32, true, body(20)))
        .expect_err("non-final blocks must be full");
    assert!(matches!(
        err,
        AssemblyError::InvalidBlockLength { len: 20, .. }
    ));
}

#[test]
fn body_larger_than_limit_is_rejected() {
    let mut assembler = RequestBlockAssembler::new(limit(48));
    assert_eq!(
        assembler.insert(request_block(0, 32, true, body(32))),
        Ok(AssemblyStatus::Incomplete)
    );
    let err = assembler
        .insert(request_block(1, 32, true, body(32)))
        .expect_err("body would exceed 48 bytes");
    assert!(matches!(err, AssemblyError::BodyTooLarge { attempted: 64, .. }));
}

#[test]
fn block_after_the_final_block_is_rejected() {
    let mut assembler = RequestBlockAssembler::new(limit(1024));
    assert_eq!(
        assembler.insert(request_block(0, 32, false, body(10))),
        Ok(AssemblyStatus::Complete)
    );
    let err = assembler
        .insert(request_block(1, 32, false, body(10)))
        .expect_err("nothing follows the final block");
    assert!(matches!(err, AssemblyError::BeyondFinalBlock { .. }));
}

#[test]
fn short_final_block_cannot_cut_through_a_parked_block() {
    let payload = body(48);
    let mut assembler = ResponseBlockAssembler::new(limit(1024));

    let parked = response_block(2, 16, true, payload[32..48].to_vec());
    assert_eq!(assembler.insert(parked), Ok(AssemblyStatus::Incomplete));

    let err = assembler
        .insert(response_block(0, 64, false, payload[..40].to_vec()))
        .expect_err("parked block reaches past the final block");
    assert!(matches!(err, AssemblyError::BeyondFinalBlock { .. }));
    assert!(!assembler.is_complete());
    assert_eq!(assembler.body_len(), 0);
}

#[test]
fn block_without_option_is_rejected() {
    let mut assembler = ResponseBlockAssembler::new(limit(1024));
    let err = assembler
        .insert(crate::message::Response::new(
            crate::message::ResponseCode::Content,
        ))
        .expect_err("block2 required");
    assert_eq!(err, AssemblyError::MissingBlockOption);
}

proptest! {
    #[test]
    fn in_order_blocks_rebuild_the_concatenated_body(
        len in 1_usize..600,
        exponent in 0_u8..=4,
    ) {
        let size = 16_usize << exponent;
        let payload = body(len);
        let chunks: Vec<&[u8]> = payload.chunks(size).collect();
        let mut assembler = RequestBlockAssembler::new(limit(1024));

        for (index, chunk) in chunks.iter().enumerate() {
            let more = index + 1 < chunks.len();
            let num = u32::try_from(index).expect("few blocks");
            prop_assert!(!assembler.is_complete());
            let status = assembler
                .insert(request_block(num, size, more, chunk.to_vec()))
                .expect("in-order block accepted");
            prop_assert_eq!(status == AssemblyStatus::Complete, !more);
        }

        prop_assert!(assembler.is_complete());
        let assembled = assembler.assembled_request().expect("request complete");
        prop_assert_eq!(assembled.payload().as_ref(), payload.as_slice());
    }
}
