use std::ffi::CString;

use sysinfo::{Networks, System};

use super::{CounterSource, CpuTimes, DiskQuery, InterfaceRow, MemoryStatus, sysinfo_memory};

const PROCESSOR_CPU_LOAD_INFO: i32 = 2;
const CPU_STATE_USER: usize = 0;
const CPU_STATE_SYSTEM: usize = 1;
const CPU_STATE_IDLE: usize = 2;
const CPU_STATE_NICE: usize = 3;
const CPU_STATE_MAX: usize = 4;

unsafe extern "C" {
    fn mach_host_self() -> u32;
    fn mach_task_self() -> u32;
    fn host_processor_info(
        host: u32,
        flavor: i32,
        out_processor_count: *mut u32,
        out_processor_info: *mut *mut i32,
        out_processor_info_count: *mut u32,
    ) -> i32;
    fn vm_deallocate(target: u32, address: usize, size: usize) -> i32;
}

pub struct Platform {
    sys: System,
    networks: Networks,
}

impl Platform {
    pub fn new() -> Self {
        Platform {
            sys: System::new(),
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

fn interface_index(name: &str) -> Option<u32> {
    let c_name = CString::new(name).ok()?;
    let index = unsafe { libc::if_nametoindex(c_name.as_ptr()) };
    if index == 0 { None } else { Some(index) }
}

/// Sum per-core `CPU_STATE_*` tick rows into host counters with `kernel`
/// including idle. Mach reports each tick as an unsigned 32-bit count.
fn fold_load_ticks(info: &[i32]) -> CpuTimes {
    let mut user = 0u64;
    let mut system = 0u64;
    let mut idle = 0u64;
    for core in info.chunks_exact(CPU_STATE_MAX) {
        let tick = |state: usize| core[state] as u32 as u64;
        user += tick(CPU_STATE_USER) + tick(CPU_STATE_NICE);
        system += tick(CPU_STATE_SYSTEM);
        idle += tick(CPU_STATE_IDLE);
    }
    CpuTimes {
        idle,
        kernel: system + idle,
        user,
    }
}

fn host_load_ticks() -> Option<CpuTimes> {
    let mut processor_count: u32 = 0;
    let mut info: *mut i32 = std::ptr::null_mut();
    let mut info_count: u32 = 0;

    let status = unsafe {
        host_processor_info(
            mach_host_self(),
            PROCESSOR_CPU_LOAD_INFO,
            &mut processor_count,
            &mut info,
            &mut info_count,
        )
    };
    if status != 0 || info.is_null() {
        return None;
    }

    let times = unsafe {
        let rows = std::slice::from_raw_parts(info, info_count as usize);
        let times = fold_load_ticks(rows);
        vm_deallocate(
            mach_task_self(),
            info as usize,
            info_count as usize * std::mem::size_of::<i32>(),
        );
        times
    };
    Some(times)
}

impl CounterSource for Platform {
    fn cpu_times(&mut self) -> Option<CpuTimes> {
        host_load_ticks()
    }

    fn memory_status(&mut self) -> Option<MemoryStatus> {
        sysinfo_memory(&mut self.sys)
    }

    fn interfaces(&mut self) -> Option<Vec<InterfaceRow>> {
        self.networks.refresh(true);
        let mut rows: Vec<InterfaceRow> = self
            .networks
            .list()
            .iter()
            .filter_map(|(name, data)| {
                Some(InterfaceRow {
                    index: interface_index(name)?,
                    name: name.clone(),
                    operational: !data.ip_networks().is_empty(),
                    loopback: name.starts_with("lo"),
                    recv_octets: data.total_received(),
                    sent_octets: data.total_transmitted(),
                    link_speed_bps: 0,
                })
            })
            .collect();
        rows.sort_by_key(|row| row.index);
        Some(rows)
    }

    fn open_disk_query(&mut self) -> Option<Box<dyn DiskQuery>> {
        None
    }
}
