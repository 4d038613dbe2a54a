use std::fs;
use std::path::Path;
use std::time::Instant;

use sysinfo::System;

use super::{CounterSource, CpuTimes, DiskQuery, InterfaceRow, MemoryStatus, sysinfo_memory};
use crate::system::snapshot::DiskSample;

const SECTOR_BYTES: u64 = 512;
const ARPHRD_LOOPBACK: u32 = 772;

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

impl CounterSource for Platform {
    fn cpu_times(&mut self) -> Option<CpuTimes> {
        let contents = fs::read_to_string("/proc/stat").ok()?;
        parse_proc_stat(&contents)
    }

    fn memory_status(&mut self) -> Option<MemoryStatus> {
        sysinfo_memory(&mut self.sys)
    }

    fn interfaces(&mut self) -> Option<Vec<InterfaceRow>> {
        let entries = fs::read_dir("/sys/class/net").ok()?;
        let mut rows: Vec<InterfaceRow> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                read_interface(&entry.path(), name)
            })
            .collect();
        rows.sort_by_key(|row| row.index);
        Some(rows)
    }

    fn open_disk_query(&mut self) -> Option<Box<dyn DiskQuery>> {
        let query = DiskStatsQuery::open()?;
        Some(Box::new(query))
    }
}

/// Parse the aggregate `cpu` line of /proc/stat; `kernel` is folded to include idle.
fn parse_proc_stat(contents: &str) -> Option<CpuTimes> {
    let line = contents.lines().find(|l| l.starts_with("cpu "))?;
    // user nice system idle iowait irq softirq steal
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|f| f.parse().unwrap_or(0))
        .collect();
    if fields.len() < 4 {
        return None;
    }
    let at = |i: usize| fields.get(i).copied().unwrap_or(0);
    let idle = at(3) + at(4);
    let system = at(2) + at(5) + at(6) + at(7);
    Some(CpuTimes {
        idle,
        kernel: system + idle,
        user: at(0) + at(1),
    })
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn read_interface(dir: &Path, name: String) -> Option<InterfaceRow> {
    let index: u32 = read_trimmed(&dir.join("ifindex"))?.parse().ok()?;
    let recv_octets: u64 = read_trimmed(&dir.join("statistics/rx_bytes"))?.parse().ok()?;
    let sent_octets: u64 = read_trimmed(&dir.join("statistics/tx_bytes"))?.parse().ok()?;

    let operstate = read_trimmed(&dir.join("operstate")).unwrap_or_default();
    // `speed` errors on interfaces that are down and reads -1 on virtual ones.
    let speed_mbps = read_trimmed(&dir.join("speed")).and_then(|s| s.parse::<i64>().ok());
    let carrier = read_trimmed(&dir.join("carrier")).as_deref() == Some("1");
    let kind: Option<u32> = read_trimmed(&dir.join("type")).and_then(|s| s.parse().ok());

    Some(InterfaceRow {
        index,
        loopback: kind == Some(ARPHRD_LOOPBACK) || name == "lo",
        operational: is_operational(&operstate, carrier),
        name,
        recv_octets,
        sent_octets,
        link_speed_bps: speed_to_bps(speed_mbps),
    })
}

fn is_operational(operstate: &str, carrier: bool) -> bool {
    match operstate {
        "up" => true,
        // tun/wireguard devices never leave "unknown"
        "unknown" => carrier,
        _ => false,
    }
}

fn speed_to_bps(speed_mbps: Option<i64>) -> u64 {
    match speed_mbps {
        Some(mbps) if mbps > 0 => mbps as u64 * 1_000_000,
        _ => 0,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct DiskTotals {
    read_bytes: u64,
    written_bytes: u64,
}

fn is_physical_disk(name: &str) -> bool {
    Path::new(&format!("/sys/block/{name}/device")).exists()
}

/// Sum sectors read/written (fields 5 and 9) over devices accepted by `include`.
fn parse_diskstats(contents: &str, include: impl Fn(&str) -> bool) -> DiskTotals {
    let mut totals = DiskTotals::default();
    for line in contents.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 10 || !include(parts[2]) {
            continue;
        }
        let sectors_read: u64 = parts[5].parse().unwrap_or(0);
        let sectors_written: u64 = parts[9].parse().unwrap_or(0);
        totals.read_bytes += sectors_read * SECTOR_BYTES;
        totals.written_bytes += sectors_written * SECTOR_BYTES;
    }
    totals
}

fn read_disk_totals() -> Option<DiskTotals> {
    let contents = fs::read_to_string("/proc/diskstats").ok()?;
    Some(parse_diskstats(&contents, is_physical_disk))
}

fn rates_between(prev: DiskTotals, now: DiskTotals, elapsed_secs: f64) -> DiskSample {
    if elapsed_secs <= 0.0 {
        return DiskSample {
            read_bytes_per_sec: 0.0,
            write_bytes_per_sec: 0.0,
        };
    }
    DiskSample {
        read_bytes_per_sec: now.read_bytes.saturating_sub(prev.read_bytes) as f64 / elapsed_secs,
        write_bytes_per_sec: now.written_bytes.saturating_sub(prev.written_bytes) as f64
            / elapsed_secs,
    }
}

/// Rates over /proc/diskstats, timed by the query's own clock.
struct DiskStatsQuery {
    prev: DiskTotals,
    prev_at: Instant,
}

impl DiskStatsQuery {
    fn open() -> Option<Self> {
        // Priming collection; the first real collect() then has a baseline.
        let prev = read_disk_totals()?;
        Some(DiskStatsQuery {
            prev,
            prev_at: Instant::now(),
        })
    }
}

impl DiskQuery for DiskStatsQuery {
    fn collect(&mut self) -> Option<DiskSample> {
        let now = read_disk_totals()?;
        let at = Instant::now();
        let elapsed = at.duration_since(self.prev_at).as_secs_f64();
        let sample = rates_between(self.prev, now, elapsed);
        self.prev = now;
        self.prev_at = at;
        Some(sample)
    }
}
