#![cfg(feature = "metrics")]
//! Tests for `blockwise` metrics.
//!
//! These tests verify that counters update as expected using
//! `metrics_util::debugging::DebuggingRecorder`.

use blockwise::{
    Loopback,
    message::{Method, Request, Response, ResponseCode},
    metrics::{self as bw_metrics, BLOCKS_TOTAL, BlockKind, Direction, ERRORS_TOTAL, TRANSFERS_COMPLETED},
};
use blockwise_testing::{Counters, body, debugging_recorder, small_config};
use rstest::rstest;

fn current_thread() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

#[rstest]
#[case(Direction::Inbound, BlockKind::Block1, "inbound", "block1")]
#[case(Direction::Outbound, BlockKind::Block2, "outbound", "block2")]
fn block_metric_increments(
    #[case] direction: Direction,
    #[case] kind: BlockKind,
    #[case] direction_label: &str,
    #[case] option_label: &str,
) {
    let (snapshotter, recorder) = debugging_recorder();
    metrics::with_local_recorder(&recorder, || bw_metrics::inc_blocks(direction, kind));

    let counters = Counters::capture(&snapshotter);
    assert_eq!(
        counters.value(
            BLOCKS_TOTAL,
            &[("direction", direction_label), ("option", option_label)]
        ),
        1
    );
}

#[test]
fn error_metric_increments() {
    let (snapshotter, recorder) = debugging_recorder();
    metrics::with_local_recorder(&recorder, bw_metrics::inc_errors);

    assert_eq!(Counters::capture(&snapshotter).value(ERRORS_TOTAL, &[]), 1);
}

#[test]
fn transfers_are_counted_on_both_ends() {
    let (snapshotter, recorder) = debugging_recorder();
    let runtime = current_thread();

    metrics::with_local_recorder(&recorder, || {
        runtime.block_on(async {
            let mut link = Loopback::new(small_config(), small_config());
            link.exchange(Request::new(Method::Put).with_payload(body(100)), |request| {
                Response::piggybacked(request, ResponseCode::Changed).with_payload(body(70))
            })
            .await
            .expect("conversation completes");
        });
    });

    let counters = Counters::capture(&snapshotter);
    let blocks = |direction: &str, option: &str| {
        counters.value(BLOCKS_TOTAL, &[("direction", direction), ("option", option)])
    };
    assert_eq!(blocks("outbound", "block1"), 4);
    assert_eq!(blocks("inbound", "block1"), 4);
    assert_eq!(blocks("outbound", "block2"), 3);
    assert_eq!(blocks("inbound", "block2"), 3);
    assert_eq!(counters.value(TRANSFERS_COMPLETED, &[("option", "block1")]), 1);
    assert_eq!(counters.value(TRANSFERS_COMPLETED, &[("option", "block2")]), 1);
    assert_eq!(counters.value(ERRORS_TOTAL, &[]), 0);
}
