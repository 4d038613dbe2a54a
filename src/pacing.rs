use std::time::Instant;

use crate::system::snapshot::MetricsSnapshot;

/// Converts the collector's per-interval network deltas into bytes/sec.
///
/// Every snapshot must pass through [`SampleClock::normalize`], baseline
/// included, so the clock always knows when the previous `sample()` ran.
#[derive(Debug, Default)]
pub struct SampleClock {
    last: Option<Instant>,
}

impl SampleClock {
    /// `at` is when `snapshot` was sampled.
    pub fn normalize(&mut self, snapshot: MetricsSnapshot, at: Instant) -> MetricsSnapshot {
        let elapsed = self.last.map(|prev| at.saturating_duration_since(prev));
        self.last = Some(at);

        let net = match (snapshot.net, elapsed) {
            (Some(delta), Some(elapsed)) => Some(delta.per_second(elapsed)),
            // A delta with no recorded start cannot be turned into a rate.
            _ => None,
        };
        MetricsSnapshot { net, ..snapshot }
    }
}
