use sysinfo::System;
use windows_sys::Win32::{
    Foundation::FILETIME,
    NetworkManagement::{
        IpHelper::{FreeMibTable, GetIfTable2, MIB_IF_TABLE2},
        Ndis::IfOperStatusUp,
    },
    System::{
        Performance::{
            PDH_FMT_COUNTERVALUE, PDH_FMT_LARGE, PDH_HCOUNTER, PDH_HQUERY, PdhAddCounterW,
            PdhCloseQuery, PdhCollectQueryData, PdhGetFormattedCounterValue, PdhOpenQueryW,
        },
        Threading::GetSystemTimes,
    },
};

use super::{CounterSource, CpuTimes, DiskQuery, InterfaceRow, MemoryStatus, sysinfo_memory};
use crate::system::snapshot::DiskSample;

const ERROR_SUCCESS: u32 = 0;
const IF_TYPE_SOFTWARE_LOOPBACK: u32 = 24;
const READ_COUNTER_PATH: &str = "\\PhysicalDisk(_Total)\\Disk Read Bytes/sec";
const WRITE_COUNTER_PATH: &str = "\\PhysicalDisk(_Total)\\Disk Write Bytes/sec";

pub struct Platform {
    sys: System,
}

impl Platform {
    pub fn new() -> Self {
        Platform { sys: System::new() }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

fn filetime_to_u64(ft: &FILETIME) -> u64 {
    ((ft.dwHighDateTime as u64) << 32) | ft.dwLowDateTime as u64
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn from_wide(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

impl CounterSource for Platform {
    fn cpu_times(&mut self) -> Option<CpuTimes> {
        let mut idle = FILETIME {
            dwLowDateTime: 0,
            dwHighDateTime: 0,
        };
        let mut kernel = idle;
        let mut user = idle;
        let ok = unsafe { GetSystemTimes(&mut idle, &mut kernel, &mut user) };
        if ok == 0 {
            return None;
        }
        Some(CpuTimes {
            idle: filetime_to_u64(&idle),
            kernel: filetime_to_u64(&kernel),
            user: filetime_to_u64(&user),
        })
    }

    fn memory_status(&mut self) -> Option<MemoryStatus> {
        sysinfo_memory(&mut self.sys)
    }

    fn interfaces(&mut self) -> Option<Vec<InterfaceRow>> {
        let mut table: *mut MIB_IF_TABLE2 = std::ptr::null_mut();
        let status = unsafe { GetIfTable2(&mut table) };
        if status != ERROR_SUCCESS || table.is_null() {
            return None;
        }

        let rows = unsafe {
            let count = (*table).NumEntries as usize;
            let first = (*table).Table.as_ptr();
            std::slice::from_raw_parts(first, count)
                .iter()
                .map(|row| InterfaceRow {
                    index: row.InterfaceIndex,
                    name: from_wide(&row.Description),
                    operational: row.OperStatus == IfOperStatusUp,
                    loopback: row.Type == IF_TYPE_SOFTWARE_LOOPBACK,
                    recv_octets: row.InOctets,
                    sent_octets: row.OutOctets,
                    link_speed_bps: row.ReceiveLinkSpeed.max(row.TransmitLinkSpeed),
                })
                .collect()
        };

        unsafe { FreeMibTable(table as *const _) };
        Some(rows)
    }

    fn open_disk_query(&mut self) -> Option<Box<dyn DiskQuery>> {
        let query = PdhDiskQuery::open()?;
        Some(Box::new(query))
    }
}

/// Owned PDH query over the aggregate physical-disk byte counters.
struct PdhDiskQuery {
    query: PDH_HQUERY,
    read_counter: PDH_HCOUNTER,
    write_counter: PDH_HCOUNTER,
}

impl PdhDiskQuery {
    fn open() -> Option<Self> {
        let mut query: PDH_HQUERY = unsafe { std::mem::zeroed() };
        if unsafe { PdhOpenQueryW(std::ptr::null(), 0, &mut query) } != ERROR_SUCCESS {
            return None;
        }
        // From here on the handle is owned; any early return closes it via Drop.
        let mut owned = PdhDiskQuery {
            query,
            read_counter: unsafe { std::mem::zeroed() },
            write_counter: unsafe { std::mem::zeroed() },
        };

        let read_path = wide(READ_COUNTER_PATH);
        let write_path = wide(WRITE_COUNTER_PATH);
        unsafe {
            if PdhAddCounterW(owned.query, read_path.as_ptr(), 0, &mut owned.read_counter)
                != ERROR_SUCCESS
            {
                return None;
            }
            if PdhAddCounterW(owned.query, write_path.as_ptr(), 0, &mut owned.write_counter)
                != ERROR_SUCCESS
            {
                return None;
            }
            // Rate counters need two collections; this is the first.
            if PdhCollectQueryData(owned.query) != ERROR_SUCCESS {
                return None;
            }
        }
        Some(owned)
    }

    fn large_value(counter: PDH_HCOUNTER) -> Option<f64> {
        let mut kind: u32 = 0;
        let mut value: PDH_FMT_COUNTERVALUE = unsafe { std::mem::zeroed() };
        let status =
            unsafe { PdhGetFormattedCounterValue(counter, PDH_FMT_LARGE, &mut kind, &mut value) };
        if status != ERROR_SUCCESS {
            return None;
        }
        let raw = unsafe { value.Anonymous.largeValue };
        Some(raw.max(0) as f64)
    }
}

impl DiskQuery for PdhDiskQuery {
    fn collect(&mut self) -> Option<DiskSample> {
        if unsafe { PdhCollectQueryData(self.query) } != ERROR_SUCCESS {
            return None;
        }
        Some(DiskSample {
            read_bytes_per_sec: Self::large_value(self.read_counter)?,
            write_bytes_per_sec: Self::large_value(self.write_counter)?,
        })
    }
}

impl Drop for PdhDiskQuery {
    fn drop(&mut self) {
        unsafe {
            PdhCloseQuery(self.query);
        }
    }
}
