//! Tests for Block1 transfers: fragmenting outgoing requests on the client
//! and reassembling incoming ones on the server.

use std::{num::NonZeroUsize, sync::Arc};

use rstest::rstest;

use super::{block, blockwise_stack, body, config, szx};
use crate::{
    Exchange,
    assembler::RequestBlockAssembler,
    layer::LayerError,
    message::{MessageType, Method, Request, Response, ResponseCode},
};

/// Cut `payload` into blocks the way a peer client would.
fn peer_blocks(payload: Vec<u8>, size: usize) -> Vec<Request> {
    let mut assembler =
        RequestBlockAssembler::for_request(Request::new(Method::Put).with_payload(payload));
    let mut blocks = Vec::new();
    for num in 0.. {
        let request = assembler.block(szx(size), num).expect("block within body");
        blocks.push(request.with_message_id(100 + u16::try_from(num).expect("few blocks")));
        if assembler.is_complete() {
            break;
        }
    }
    blocks
}

#[rstest]
#[case(0)]
#[case(63)]
#[case(64)]
#[tokio::test]
async fn requests_within_the_threshold_pass_unchanged(#[case] len: usize) {
    let (stack, recorder) = blockwise_stack(config(64, 32));
    let exchange = Arc::new(Exchange::new());
    let request = Request::new(Method::Post)
        .with_payload(body(len))
        .with_message_id(1);

    stack
        .send_request(&exchange, request.clone())
        .await
        .expect("send succeeds");

    assert_eq!(recorder.take_requests(), [request.clone()]);
    assert_eq!(exchange.current_request(), Some(request));
    assert!(exchange.request_assembler().is_none());
}

#[rstest]
#[case(65, 32, true)]
#[case(100, 64, true)]
#[case(100, 128, false)]
#[tokio::test]
async fn oversized_requests_start_with_block_zero(
    #[case] len: usize,
    #[case] size: usize,
    #[case] more: bool,
) {
    let (stack, recorder) = blockwise_stack(config(64, size));
    let exchange = Arc::new(Exchange::new());
    let request = Request::new(Method::Post)
        .with_payload(body(len))
        .with_message_id(1);

    stack
        .send_request(&exchange, request)
        .await
        .expect("send succeeds");

    let sent = recorder.take_requests();
    assert_eq!(sent.len(), 1);
    let first = &sent[0];
    assert_eq!(first.options().block1(), Some(block(0, size, more)));
    assert_eq!(first.payload_size(), size.min(len));
    assert_eq!(first.message_id(), Some(1));
    assert_eq!(exchange.current_request().as_ref(), Some(first));

    let assembler = exchange.request_assembler().expect("assembler attached");
    assert!(assembler.lock().expect("assembler lock").is_sending());
}

#[rstest]
#[case::changed(ResponseCode::Changed)]
#[case::continue_(ResponseCode::Continue)]
#[tokio::test]
async fn client_follows_block1_acknowledgements_to_the_final_response(
    #[case] interim: ResponseCode,
) {
    let (stack, recorder) = blockwise_stack(config(64, 32));
    let exchange = Arc::new(Exchange::new());
    let payload = body(80);

    stack
        .send_request(&exchange, Request::new(Method::Put).with_payload(payload.clone()))
        .await
        .expect("send succeeds");
    let mut sent = recorder.take_requests();

    for num in 0..2 {
        let mut ack = Response::new(interim).with_type(MessageType::Acknowledgement);
        ack.options_mut().set_block1(block(num, 32, true));
        let delivered = stack
            .receive_response(&exchange, ack)
            .await
            .expect("receive succeeds");
        assert_eq!(delivered, None, "interim acknowledgement reached the endpoint");

        let next = recorder.take_requests();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].options().block1().map(|b| b.num()), Some(num + 1));
        assert_eq!(next[0].message_id(), None);
        assert_eq!(exchange.current_request().as_ref(), Some(&next[0]));
        sent.extend(next);
    }

    let rebuilt: Vec<u8> = sent
        .iter()
        .flat_map(|request| request.payload().to_vec())
        .collect();
    assert_eq!(rebuilt, payload);
    assert!(!sent[2].options().block1().expect("block1").more());

    let mut last = Response::new(ResponseCode::Changed);
    last.options_mut().set_block1(block(2, 32, false));
    let delivered = stack
        .receive_response(&exchange, last.clone())
        .await
        .expect("receive succeeds");
    assert_eq!(delivered, Some(last));
    assert!(recorder.take().is_empty());
}

#[tokio::test]
async fn client_adopts_a_smaller_block_size_requested_by_the_server() {
    let (stack, recorder) = blockwise_stack(config(64, 64));
    let exchange = Arc::new(Exchange::new());

    stack
        .send_request(&exchange, Request::new(Method::Put).with_payload(body(200)))
        .await
        .expect("send succeeds");
    recorder.take();

    let mut ack = Response::new(ResponseCode::Changed);
    ack.options_mut().set_block1(block(0, 16, true));
    stack
        .receive_response(&exchange, ack)
        .await
        .expect("receive succeeds");

    let next = recorder.take_requests();
    assert_eq!(next[0].options().block1(), Some(block(4, 16, true)));
    assert_eq!(next[0].payload(), &body(200)[64..80]);
}

#[rstest]
#[case::too_large(ResponseCode::RequestEntityTooLarge)]
#[case::bad_request(ResponseCode::BadRequest)]
#[tokio::test]
async fn error_response_ends_the_request_transfer(#[case] code: ResponseCode) {
    let (stack, recorder) = blockwise_stack(config(64, 32));
    let exchange = Arc::new(Exchange::new());

    stack
        .send_request(&exchange, Request::new(Method::Put).with_payload(body(200)))
        .await
        .expect("send succeeds");
    recorder.take();

    let mut refusal = Response::new(code).with_type(MessageType::Acknowledgement);
    refusal.options_mut().set_block1(block(0, 32, false));
    let delivered = stack
        .receive_response(&exchange, refusal.clone())
        .await
        .expect("receive succeeds");

    assert_eq!(delivered, Some(refusal));
    assert!(recorder.take().is_empty(), "no further request blocks");
}

#[tokio::test]
async fn block1_response_without_assembler_is_an_error() {
    let (stack, _recorder) = blockwise_stack(config(64, 32));
    let exchange = Arc::new(Exchange::new());
    let mut response = Response::new(ResponseCode::Changed);
    response.options_mut().set_block1(block(0, 32, true));

    let err = stack
        .receive_response(&exchange, response)
        .await
        .expect_err("no request is being sent in blocks");

    assert!(matches!(
        err,
        LayerError::MissingRequestAssembler { block } if block.num() == 0
    ));
}

#[tokio::test]
async fn server_acknowledges_blocks_and_delivers_the_whole_request() {
    let (stack, recorder) = blockwise_stack(config(64, 32));
    let exchange = Arc::new(Exchange::new());
    let payload = body(50);
    let blocks = peer_blocks(payload.clone(), 32);

    let delivered = stack
        .receive_request(&exchange, blocks[0].clone())
        .await
        .expect("receive succeeds");
    assert_eq!(delivered, None);

    let continuation = recorder.take_responses();
    assert_eq!(continuation.len(), 1);
    assert_eq!(continuation[0].code(), ResponseCode::Changed);
    assert_eq!(continuation[0].message_type(), MessageType::Acknowledgement);
    assert_eq!(continuation[0].message_id(), Some(100));
    assert_eq!(continuation[0].options().block1(), Some(block(0, 32, true)));

    let delivered = stack
        .receive_request(&exchange, blocks[1].clone())
        .await
        .expect("receive succeeds")
        .expect("request complete");
    assert_eq!(delivered.payload().as_ref(), payload.as_slice());
    assert!(delivered.is_acknowledged());
    assert_eq!(exchange.request(), Some(delivered.clone()));
    assert!(recorder.take().is_empty());

    let reply = Response::piggybacked(&delivered, ResponseCode::Changed);
    stack
        .send_response(&exchange, reply)
        .await
        .expect("send succeeds");
    let replies = recorder.take_responses();
    assert_eq!(replies[0].options().block1(), Some(block(1, 32, false)));
    assert_eq!(exchange.take_block1_to_ack(), None);
}

#[tokio::test]
async fn server_reacknowledges_duplicate_blocks() {
    let (stack, recorder) = blockwise_stack(config(64, 32));
    let exchange = Arc::new(Exchange::new());
    let blocks = peer_blocks(body(50), 32);

    for _ in 0..2 {
        let delivered = stack
            .receive_request(&exchange, blocks[0].clone())
            .await
            .expect("receive succeeds");
        assert_eq!(delivered, None);
    }
    let acks = recorder.take_responses();
    assert_eq!(acks.len(), 2);
    assert!(acks.iter().all(|ack| ack.code() == ResponseCode::Changed));

    let delivered = stack
        .receive_request(&exchange, blocks[1].clone())
        .await
        .expect("receive succeeds");
    assert!(delivered.is_some());

    let again = stack
        .receive_request(&exchange, blocks[1].clone())
        .await
        .expect("receive succeeds");
    assert_eq!(again, None);
    assert!(recorder.take().is_empty());
}

#[tokio::test]
async fn server_rejects_a_short_intermediate_block_with_entity_incomplete() {
    let (stack, recorder) = blockwise_stack(config(64, 32));
    let exchange = Arc::new(Exchange::new());
    let mut request = Request::new(Method::Put)
        .with_payload(body(10))
        .with_message_id(3);
    request.options_mut().set_block1(block(0, 32, true));

    let delivered = stack
        .receive_request(&exchange, request)
        .await
        .expect("receive succeeds");

    assert_eq!(delivered, None);
    let replies = recorder.take_responses();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].code(), ResponseCode::RequestEntityIncomplete);
    assert_eq!(replies[0].message_id(), Some(3));
}

#[tokio::test]
async fn server_rejects_oversized_bodies_with_entity_too_large() {
    let config = config(64, 32).max_body_size(NonZeroUsize::new(64).expect("non-zero"));
    let (stack, recorder) = blockwise_stack(config);
    let exchange = Arc::new(Exchange::new());
    let mut request = Request::new(Method::Put)
        .with_payload(body(32))
        .with_message_id(5);
    request.options_mut().set_block1(block(2, 32, true));

    let delivered = stack
        .receive_request(&exchange, request)
        .await
        .expect("receive succeeds");

    assert_eq!(delivered, None);
    let replies = recorder.take_responses();
    assert_eq!(replies[0].code(), ResponseCode::RequestEntityTooLarge);
    assert_eq!(replies[0].options().block1(), Some(block(0, 32, false)));
}
