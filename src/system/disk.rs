use super::platform::{CounterSource, DiskQuery};
use super::snapshot::DiskSample;

/// Holds the aggregate disk query for the collector's lifetime.
///
/// Once opening fails the sampler stays unavailable; there is no retry.
#[derive(Default)]
pub struct DiskSampler {
    query: Option<Box<dyn DiskQuery>>,
    attempted: bool,
}

impl DiskSampler {
    pub fn is_available(&self) -> bool {
        self.query.is_some()
    }

    pub fn open<S: CounterSource>(&mut self, source: &mut S) -> bool {
        if self.attempted {
            return self.is_available();
        }
        self.attempted = true;
        self.query = source.open_disk_query();
        if self.query.is_some() {
            tracing::info!("disk counters opened");
        } else {
            tracing::info!("disk counters unavailable; disk reporting disabled");
        }
        self.is_available()
    }

    pub fn update(&mut self) -> Option<DiskSample> {
        let sample = self.query.as_mut()?.collect()?;
        Some(DiskSample {
            read_bytes_per_sec: non_negative(sample.read_bytes_per_sec),
            write_bytes_per_sec: non_negative(sample.write_bytes_per_sec),
        })
    }
}

fn non_negative(rate: f64) -> f64 {
    if rate.is_finite() { rate.max(0.0) } else { 0.0 }
}
