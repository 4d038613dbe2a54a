use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::snapshot::MetricsSnapshot;

const MIB: f64 = 1024.0 * 1024.0;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Bytes/sec as MiB/sec with fixed decimals. Negative input reads as zero.
pub fn format_mb(bytes_per_sec: f64, decimals: usize) -> String {
    let mb = (bytes_per_sec / MIB).max(0.0);
    format!("{mb:.decimals$}")
}

fn percent(fraction: f32) -> i32 {
    ((fraction * 100.0).round() as i32).clamp(0, 100)
}

/// The one-line readout shown next to the graphs.
pub fn overlay_line(snapshot: &MetricsSnapshot) -> String {
    let (net_r, net_w) = snapshot
        .net
        .map(|n| (n.recv_bytes_per_sec, n.sent_bytes_per_sec))
        .unwrap_or((0.0, 0.0));
    let (disk_r, disk_w) = snapshot
        .disk
        .map(|d| (d.read_bytes_per_sec, d.write_bytes_per_sec))
        .unwrap_or((0.0, 0.0));

    format!(
        "CPU {:>3}% | MEM {:>3}% | NET R: {} W: {} MB/s | DSK R: {} W: {} MB/s",
        percent(snapshot.cpu),
        percent(snapshot.memory),
        format_mb(net_r, 1),
        format_mb(net_w, 2),
        format_mb(disk_r, 1),
        format_mb(disk_w, 2),
    )
}

pub fn format_link_speed(bits_per_sec: u64) -> String {
    const GBPS: u64 = 1_000_000_000;
    const MBPS: u64 = 1_000_000;

    if bits_per_sec == 0 {
        "speed n/a".to_string()
    } else if bits_per_sec >= GBPS {
        format!("{:.1} Gb/s", bits_per_sec as f64 / GBPS as f64)
    } else {
        format!("{:.0} Mb/s", bits_per_sec as f64 / MBPS as f64)
    }
}
