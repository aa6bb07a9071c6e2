//! Helpers for asserting on counters recorded by `blockwise`.

use metrics_util::{
    CompositeKey,
    debugging::{DebugValue, DebuggingRecorder, Snapshotter},
};

/// Creates a debugging recorder and its snapshotter.
pub fn debugging_recorder() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

/// Counter values captured by one snapshot.
#[derive(Debug)]
pub struct Counters(Vec<(CompositeKey, u64)>);

impl Counters {
    /// Capture the counters recorded so far.
    pub fn capture(snapshotter: &Snapshotter) -> Self {
        Self(
            snapshotter
                .snapshot()
                .into_vec()
                .into_iter()
                .filter_map(|(key, _, _, value)| match value {
                    DebugValue::Counter(count) => Some((key, count)),
                    _ => None,
                })
                .collect(),
        )
    }

    /// Sum the counters named `name` whose labels include every pair in
    /// `labels`.
    pub fn value(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        self.0
            .iter()
            .filter(|(key, _)| {
                key.key().name() == name
                    && labels.iter().all(|(label, value)| {
                        key.key()
                            .labels()
                            .any(|l| l.key() == *label && l.value() == *value)
                    })
            })
            .map(|(_, count)| count)
            .sum()
    }
}
