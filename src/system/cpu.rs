use super::platform::CpuTimes;

/// Busy fraction between two cumulative CPU readings.
pub fn usage_between(prev: CpuTimes, now: CpuTimes) -> f32 {
    let idle = now.idle.saturating_sub(prev.idle);
    let kernel = now.kernel.saturating_sub(prev.kernel);
    let user = now.user.saturating_sub(prev.user);
    let total = kernel.saturating_add(user);
    if total == 0 {
        return 0.0;
    }
    (1.0 - idle as f64 / total as f64).clamp(0.0, 1.0) as f32
}

#[derive(Debug, Default)]
pub struct CpuSampler {
    baseline: Option<CpuTimes>,
}

impl CpuSampler {
    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Feed the latest reading. Reports 0 until a baseline exists; a failed
    /// read (`None`) reports 0 and keeps the old baseline.
    pub fn update(&mut self, now: Option<CpuTimes>) -> f32 {
        let Some(now) = now else {
            return 0.0;
        };
        let usage = match self.baseline {
            Some(prev) => usage_between(prev, now),
            None => {
                tracing::debug!(idle = now.idle, "cpu baseline captured");
                0.0
            }
        };
        self.baseline = Some(now);
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(idle: u64, kernel: u64, user: u64) -> CpuTimes {
        CpuTimes { idle, kernel, user }
    }

    #[test]
    fn first_reading_only_sets_baseline() {
        let mut sampler = CpuSampler::default();
        assert_eq!(sampler.update(Some(times(100, 60, 40))), 0.0);
        assert!(sampler.has_baseline());
    }

    #[test]
    fn all_idle_interval_reports_zero() {
        let mut sampler = CpuSampler::default();
        sampler.update(Some(times(100, 60, 40)));
        // idle 50, kernel 30, user 20 -> total 50 -> 1 - 50/50
        assert_eq!(sampler.update(Some(times(150, 90, 60))), 0.0);
    }

    #[test]
    fn quarter_busy_interval() {
        let mut sampler = CpuSampler::default();
        sampler.update(Some(times(0, 0, 0)));
        // kernel 80 (of which 75 idle), user 20 -> busy 25 of 100
        let usage = sampler.update(Some(times(75, 80, 20)));
        assert!((usage - 0.25).abs() < 1e-6);
    }

    #[test]
    fn idle_exceeding_total_clamps_to_zero() {
        assert_eq!(usage_between(times(0, 0, 0), times(500, 10, 10)), 0.0);
    }

    #[test]
    fn counter_reset_does_not_underflow() {
        let usage = usage_between(times(1_000, 2_000, 3_000), times(10, 20, 30));
        assert_eq!(usage, 0.0);
    }

    #[test]
    fn failed_read_keeps_baseline() {
        let mut sampler = CpuSampler::default();
        sampler.update(Some(times(0, 0, 0)));
        assert_eq!(sampler.update(None), 0.0);
        let usage = sampler.update(Some(times(50, 50, 50)));
        assert!((usage - 0.5).abs() < 1e-6);
    }
}
