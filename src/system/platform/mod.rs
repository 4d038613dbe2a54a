use sysinfo::System;

use super::snapshot::DiskSample;

/// Cumulative system-wide CPU time counters.
///
/// `kernel` includes `idle`; busy time is `kernel + user - idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub idle: u64,
    pub kernel: u64,
    pub user: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStatus {
    pub total: u64,
    pub available: u64,
}

/// One row of the OS interface table, in enumeration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterfaceRow {
    pub index: u32,
    pub name: String,
    pub operational: bool,
    pub loopback: bool,
    pub recv_octets: u64,
    pub sent_octets: u64,
    pub link_speed_bps: u64,
}

/// An open aggregate disk-rate query. Dropping it releases the OS handle.
pub trait DiskQuery {
    /// Runs a fresh collection pass and returns per-second rates.
    fn collect(&mut self) -> Option<DiskSample>;
}

/// Raw counter access. Every method is best-effort: `None` means the
/// underlying OS query failed for this call.
pub trait CounterSource {
    fn cpu_times(&mut self) -> Option<CpuTimes>;
    fn memory_status(&mut self) -> Option<MemoryStatus>;
    fn interfaces(&mut self) -> Option<Vec<InterfaceRow>>;
    fn open_disk_query(&mut self) -> Option<Box<dyn DiskQuery>>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub type NativeSource = platform_impl::Platform;

pub fn native() -> NativeSource {
    platform_impl::Platform::new()
}

fn sysinfo_memory(sys: &mut System) -> Option<MemoryStatus> {
    sys.refresh_memory();
    let total = sys.total_memory();
    if total == 0 {
        return None;
    }
    Some(MemoryStatus {
        total,
        available: sys.available_memory(),
    })
}
