use std::time::Duration;

use serde::Serialize;

/// Throughput of the selected interface over the last sampling interval.
///
/// As produced by the collector the two byte fields hold raw deltas since the
/// previous `sample()`. [`NetSample::per_second`] rescales them by the
/// measured interval; only then are they bytes/sec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetSample {
    pub recv_bytes_per_sec: f64,
    pub sent_bytes_per_sec: f64,
    /// Nominal link speed in bits/sec, 0 when the OS does not report one.
    pub link_speed_bps: u64,
}

impl NetSample {
    /// Rescale per-interval deltas to bytes/sec. A zero interval reads as idle.
    pub fn per_second(self, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        let scale = |delta: f64| if secs > 0.0 { delta / secs } else { 0.0 };
        NetSample {
            recv_bytes_per_sec: scale(self.recv_bytes_per_sec),
            sent_bytes_per_sec: scale(self.sent_bytes_per_sec),
            ..self
        }
    }

    /// Busiest direction as a fraction of link capacity, 0 when the speed is unknown.
    pub fn utilization(&self) -> f32 {
        if self.link_speed_bps == 0 {
            return 0.0;
        }
        let capacity = self.link_speed_bps as f64 / 8.0;
        let busiest = self.recv_bytes_per_sec.max(self.sent_bytes_per_sec);
        (busiest / capacity).clamp(0.0, 1.0) as f32
    }
}

/// Per-second disk rates as computed by the disk counter subsystem itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiskSample {
    pub read_bytes_per_sec: f64,
    pub write_bytes_per_sec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MetricsSnapshot {
    /// Busy fraction since the previous sample, in [0, 1].
    pub cpu: f32,
    /// Used physical memory right now, in [0, 1].
    pub memory: f32,
    pub net: Option<NetSample>,
    pub disk: Option<DiskSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utilization_uses_busiest_direction() {
        let net = NetSample {
            recv_bytes_per_sec: 250_000.0,
            sent_bytes_per_sec: 1_000_000.0,
            link_speed_bps: 80_000_000,
        };
        assert!((net.utilization() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn per_second_divides_by_interval() {
        let delta = NetSample {
            recv_bytes_per_sec: 250.0,
            sent_bytes_per_sec: 50.0,
            link_speed_bps: 8_000,
        };
        let rate = delta.per_second(Duration::from_millis(250));
        assert_eq!(rate.recv_bytes_per_sec, 1_000.0);
        assert_eq!(rate.sent_bytes_per_sec, 200.0);
        assert_eq!(rate.link_speed_bps, 8_000);
        assert_eq!(rate.utilization(), 1.0);

        let stalled = delta.per_second(Duration::from_secs(5));
        assert_eq!(stalled.recv_bytes_per_sec, 50.0);
        assert_eq!(delta.per_second(Duration::ZERO).recv_bytes_per_sec, 0.0);
    }

    #[test]
    fn utilization_is_zero_without_link_speed() {
        let net = NetSample {
            recv_bytes_per_sec: 5_000.0,
            sent_bytes_per_sec: 0.0,
            link_speed_bps: 0,
        };
        assert_eq!(net.utilization(), 0.0);
    }

    #[test]
    fn utilization_saturates_at_one() {
        let net = NetSample {
            recv_bytes_per_sec: 10_000_000.0,
            sent_bytes_per_sec: 0.0,
            link_speed_bps: 8_000_000,
        };
        assert_eq!(net.utilization(), 1.0);
    }
}
