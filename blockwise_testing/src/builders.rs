//! Builders for settings, bodies and the blocks a peer would send.

use std::num::NonZeroUsize;

use blockwise::{
    BlockOption,
    BlockwiseConfig,
    RequestBlockAssembler,
    ResponseBlockAssembler,
    Szx,
    message::{Method, Request, Response, ResponseCode},
};
use rstest::fixture;

/// Size exponent for a block size in bytes.
pub fn szx(size: usize) -> Szx { Szx::from_block_size(size).expect("valid block size") }

/// Block descriptor with a block size in bytes.
pub fn block(num: u32, size: usize, more: bool) -> BlockOption {
    BlockOption::new(num, szx(size), more).expect("valid block number")
}

/// Settings with the given threshold and block size in bytes.
pub fn config(max_message_size: usize, block_size: usize) -> BlockwiseConfig {
    BlockwiseConfig::default()
        .max_message_size(NonZeroUsize::new(max_message_size).expect("non-zero threshold"))
        .default_block_size(szx(block_size))
}

/// Settings small enough to split modest payloads: 64-byte threshold,
/// 32-byte blocks.
#[fixture]
pub fn small_config() -> BlockwiseConfig { config(64, 32) }

/// A recognisable body of `len` bytes.
pub fn body(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| u8::try_from(i % 251).expect("below 256"))
        .collect()
}

/// A confirmable PUT carrying `len` body bytes.
pub fn put(len: usize) -> Request { Request::new(Method::Put).with_payload(body(len)) }

/// Cut `payload` into request blocks of `size` bytes, numbering messages
/// from 100.
pub fn request_blocks(payload: Vec<u8>, size: usize) -> Vec<Request> {
    let mut assembler =
        RequestBlockAssembler::for_request(Request::new(Method::Put).with_payload(payload));
    let mut blocks = Vec::new();
    for num in 0_u16.. {
        let request = assembler
            .block(szx(size), u32::from(num))
            .expect("block within body");
        blocks.push(request.with_message_id(100 + num));
        if assembler.is_complete() {
            break;
        }
    }
    blocks
}

/// Cut `payload` into Content response blocks of `size` bytes, numbering
/// messages from 200.
pub fn response_blocks(payload: Vec<u8>, size: usize) -> Vec<Response> {
    let response = Response::new(ResponseCode::Content).with_payload(payload);
    let mut assembler = ResponseBlockAssembler::for_response(response, szx(size));
    let mut blocks = Vec::new();
    for num in 0_u16.. {
        let response = assembler.block(u32::from(num)).expect("block within body");
        blocks.push(response.with_message_id(200 + num));
        if assembler.is_complete() {
            break;
        }
    }
    blocks
}
