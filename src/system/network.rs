use std::fmt;

use super::platform::InterfaceRow;
use super::snapshot::NetSample;

/// Which interface the network sampler targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NetSelection {
    /// Fastest operational, non-loopback interface, re-evaluated every sample.
    #[default]
    Auto,
    /// A specific OS interface index.
    Pinned(u32),
}

impl NetSelection {
    pub fn from_config_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" | "-1" => NetSelection::Auto,
            other => other
                .parse()
                .map(NetSelection::Pinned)
                .unwrap_or(NetSelection::Auto),
        }
    }

    pub fn to_config_string(self) -> String {
        match self {
            NetSelection::Auto => "auto".to_string(),
            NetSelection::Pinned(index) => index.to_string(),
        }
    }
}

impl fmt::Display for NetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetSelection::Auto => write!(f, "auto"),
            NetSelection::Pinned(index) => write!(f, "#{index}"),
        }
    }
}

/// An interface the user may pin, as offered by a settings picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceChoice {
    pub index: u32,
    pub name: String,
    pub link_speed_bps: u64,
}

pub fn is_selectable(row: &InterfaceRow) -> bool {
    row.operational && !row.loopback
}

/// Interfaces eligible for sampling, in enumeration order.
pub fn selectable_interfaces(rows: &[InterfaceRow]) -> Vec<InterfaceChoice> {
    rows.iter()
        .filter(|row| is_selectable(row))
        .map(|row| InterfaceChoice {
            index: row.index,
            name: row.name.clone(),
            link_speed_bps: row.link_speed_bps,
        })
        .collect()
}

pub fn select_interface(rows: &[InterfaceRow], selection: NetSelection) -> Option<&InterfaceRow> {
    let mut candidates = rows.iter().filter(|row| is_selectable(row));
    match selection {
        NetSelection::Auto => {
            candidates.fold(None, |best: Option<&InterfaceRow>, row| match best {
                // strictly greater keeps the first of equally fast interfaces
                Some(b) if row.link_speed_bps <= b.link_speed_bps => Some(b),
                _ => Some(row),
            })
        }
        NetSelection::Pinned(index) => candidates.find(|row| row.index == index),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Baseline {
    index: u32,
    recv: u64,
    sent: u64,
}

impl Baseline {
    fn of(row: &InterfaceRow) -> Self {
        Baseline {
            index: row.index,
            recv: row.recv_octets,
            sent: row.sent_octets,
        }
    }
}

#[derive(Debug, Default)]
pub struct NetSampler {
    selection: NetSelection,
    baseline: Option<Baseline>,
}

impl NetSampler {
    pub fn selection(&self) -> NetSelection {
        self.selection
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Returns true when the selection changed and the baseline was dropped.
    pub fn set_selection(&mut self, selection: NetSelection) -> bool {
        if selection == self.selection {
            return false;
        }
        tracing::debug!(from = %self.selection, to = %selection, "network selection changed");
        self.selection = selection;
        self.baseline = None;
        true
    }

    /// One tick over a fresh interface table. `None` rows means the
    /// enumeration failed.
    ///
    /// A returned delta always spans exactly one call: a tick without the
    /// target interface drops the baseline, so its return re-baselines.
    pub fn update(&mut self, rows: Option<&[InterfaceRow]>) -> Option<NetSample> {
        let Some(row) = rows.and_then(|rows| select_interface(rows, self.selection)) else {
            if self.baseline.take().is_some() {
                tracing::debug!(selection = %self.selection, "network target missing; baseline dropped");
            }
            return None;
        };

        let prev = match self.baseline {
            Some(prev) if prev.index == row.index => prev,
            _ => {
                tracing::debug!(index = row.index, name = %row.name, "network baseline captured");
                self.baseline = Some(Baseline::of(row));
                return None;
            }
        };

        // Wrapped or reset counters clamp to zero rather than underflow.
        let recv = row.recv_octets.saturating_sub(prev.recv);
        let sent = row.sent_octets.saturating_sub(prev.sent);
        self.baseline = Some(Baseline::of(row));

        Some(NetSample {
            recv_bytes_per_sec: recv as f64,
            sent_bytes_per_sec: sent as f64,
            link_speed_bps: row.link_speed_bps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: u32, speed: u64, recv: u64, sent: u64) -> InterfaceRow {
        InterfaceRow {
            index,
            name: format!("eth{index}"),
            operational: true,
            loopback: false,
            recv_octets: recv,
            sent_octets: sent,
            link_speed_bps: speed,
        }
    }

    fn tick(sampler: &mut NetSampler, rows: &[InterfaceRow]) -> Option<NetSample> {
        sampler.update(Some(rows))
    }

    #[test]
    fn auto_picks_fastest() {
        let rows = vec![
            row(1, 100_000_000, 0, 0),
            row(2, 1_000_000_000, 0, 0),
            row(3, 10_000_000, 0, 0),
        ];
        let picked = select_interface(&rows, NetSelection::Auto).unwrap();
        assert_eq!(picked.index, 2);
    }

    #[test]
    fn auto_tie_goes_to_first() {
        let rows = vec![row(4, 1_000, 0, 0), row(5, 1_000, 0, 0)];
        assert_eq!(select_interface(&rows, NetSelection::Auto).unwrap().index, 4);
    }

    #[test]
    fn loopback_and_down_interfaces_are_skipped() {
        let mut lo = row(1, u64::MAX, 0, 0);
        lo.loopback = true;
        let mut down = row(2, 10_000_000_000, 0, 0);
        down.operational = false;
        let rows = vec![lo, down, row(3, 10, 0, 0)];

        assert_eq!(select_interface(&rows, NetSelection::Auto).unwrap().index, 3);
        assert!(select_interface(&rows, NetSelection::Pinned(1)).is_none());
        assert!(select_interface(&rows, NetSelection::Pinned(2)).is_none());
        assert_eq!(selectable_interfaces(&rows).len(), 1);
    }

    #[test]
    fn pinned_matches_by_index() {
        let rows = vec![row(7, 1_000_000_000, 0, 0), row(9, 10, 0, 0)];
        let picked = select_interface(&rows, NetSelection::Pinned(9)).unwrap();
        assert_eq!(picked.index, 9);
    }

    #[test]
    fn first_tick_is_baseline_then_delta() {
        let mut sampler = NetSampler::default();
        assert!(tick(&mut sampler, &[row(1, 1_000, 1000, 500)]).is_none());

        let sample = tick(&mut sampler, &[row(1, 1_000, 1500, 800)]).unwrap();
        assert_eq!(sample.recv_bytes_per_sec, 500.0);
        assert_eq!(sample.sent_bytes_per_sec, 300.0);
        assert_eq!(sample.link_speed_bps, 1_000);
    }

    #[test]
    fn counter_reset_clamps_to_zero_and_rebases() {
        let mut sampler = NetSampler::default();
        tick(&mut sampler, &[row(1, 0, 10_000, 10_000)]);
        let sample = tick(&mut sampler, &[row(1, 0, 200, 10_100)]).unwrap();
        assert_eq!(sample.recv_bytes_per_sec, 0.0);
        assert_eq!(sample.sent_bytes_per_sec, 100.0);

        let sample = tick(&mut sampler, &[row(1, 0, 700, 10_100)]).unwrap();
        assert_eq!(sample.recv_bytes_per_sec, 500.0);
    }

    #[test]
    fn selection_change_forces_rebaseline() {
        let mut sampler = NetSampler::default();
        let rows = [row(1, 10, 0, 0), row(2, 5, 0, 0)];
        tick(&mut sampler, &rows);
        assert!(sampler.has_baseline());

        assert!(sampler.set_selection(NetSelection::Pinned(2)));
        assert!(!sampler.has_baseline());
        assert!(tick(&mut sampler, &rows).is_none());
        assert!(tick(&mut sampler, &rows).is_some());
    }

    #[test]
    fn same_selection_keeps_baseline() {
        let mut sampler = NetSampler::default();
        tick(&mut sampler, &[row(1, 10, 0, 0)]);
        assert!(!sampler.set_selection(NetSelection::Auto));
        assert!(sampler.has_baseline());
    }

    #[test]
    fn auto_switching_interfaces_never_spans_a_delta() {
        let mut sampler = NetSampler::default();
        tick(&mut sampler, &[row(1, 100, 5_000, 5_000)]);
        // A faster interface appears with unrelated counters.
        let rows = [row(1, 100, 6_000, 6_000), row(2, 1_000, 1, 1)];
        assert!(tick(&mut sampler, &rows).is_none());
        let rows = [row(1, 100, 7_000, 7_000), row(2, 1_000, 101, 51)];
        let sample = tick(&mut sampler, &rows).unwrap();
        assert_eq!(sample.recv_bytes_per_sec, 100.0);
        assert_eq!(sample.sent_bytes_per_sec, 50.0);
    }

    #[test]
    fn missing_interface_or_failed_enumeration_is_absent() {
        let mut sampler = NetSampler::default();
        assert!(sampler.update(None).is_none());
        assert!(tick(&mut sampler, &[]).is_none());
        assert!(!sampler.has_baseline());
    }

    #[test]
    fn interface_gap_rebaselines_on_return() {
        let mut sampler = NetSampler::default();
        sampler.set_selection(NetSelection::Pinned(4));
        tick(&mut sampler, &[row(4, 10, 100, 100)]);
        assert!(sampler.has_baseline());

        assert!(tick(&mut sampler, &[]).is_none());
        assert!(!sampler.has_baseline());

        // Traffic during the gap is never attributed to a single tick.
        assert!(tick(&mut sampler, &[row(4, 10, 9_000, 9_000)]).is_none());
        let sample = tick(&mut sampler, &[row(4, 10, 9_100, 9_000)]).unwrap();
        assert_eq!(sample.recv_bytes_per_sec, 100.0);
    }

    #[test]
    fn failed_enumeration_drops_baseline() {
        let mut sampler = NetSampler::default();
        tick(&mut sampler, &[row(1, 10, 0, 0)]);
        assert!(sampler.update(None).is_none());
        assert!(!sampler.has_baseline());
    }

    #[test]
    fn selection_config_strings() {
        assert_eq!(NetSelection::from_config_str("auto"), NetSelection::Auto);
        assert_eq!(NetSelection::from_config_str("-1"), NetSelection::Auto);
        assert_eq!(NetSelection::from_config_str(" 12 "), NetSelection::Pinned(12));
        assert_eq!(NetSelection::from_config_str("eth0"), NetSelection::Auto);
        assert_eq!(NetSelection::Pinned(3).to_config_string(), "3");
        assert_eq!(NetSelection::Auto.to_config_string(), "auto");
    }
}
