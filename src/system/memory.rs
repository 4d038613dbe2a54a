use super::platform::MemoryStatus;

/// Used fraction of physical memory; 0 when the query failed or reported no memory.
pub fn usage_fraction(status: Option<MemoryStatus>) -> f32 {
    match status {
        Some(MemoryStatus { total, available }) if total > 0 => {
            let used = total.saturating_sub(available);
            (used as f64 / total as f64).clamp(0.0, 1.0) as f32
        }
        _ => 0.0,
    }
}
