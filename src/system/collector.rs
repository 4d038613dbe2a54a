use super::cpu::CpuSampler;
use super::disk::DiskSampler;
use super::memory;
use super::network::{InterfaceChoice, NetSampler, NetSelection, selectable_interfaces};
use super::platform::{self, CounterSource, NativeSource};
use super::snapshot::MetricsSnapshot;

/// Stateful sampler turning cumulative OS counters into a [`MetricsSnapshot`].
///
/// Single-threaded: callers serialize `sample` and the setters. Dropping the
/// collector releases the disk query.
pub struct MetricsCollector<S: CounterSource = NativeSource> {
    source: S,
    cpu: CpuSampler,
    net: NetSampler,
    disk: DiskSampler,
}

impl Default for MetricsCollector<NativeSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector<NativeSource> {
    pub fn new() -> Self {
        Self::with_source(platform::native())
    }
}

impl<S: CounterSource> MetricsCollector<S> {
    pub fn with_source(source: S) -> Self {
        MetricsCollector {
            source,
            cpu: CpuSampler::default(),
            net: NetSampler::default(),
            disk: DiskSampler::default(),
        }
    }

    /// Best-effort open of the disk counters. Always succeeds; a failure only
    /// leaves `disk` absent from every snapshot.
    pub fn initialize(&mut self) -> bool {
        self.disk.open(&mut self.source);
        true
    }

    pub fn sample(&mut self) -> MetricsSnapshot {
        let _span = tracing::debug_span!("collector.sample").entered();

        let cpu = self.cpu.update(self.source.cpu_times());
        let memory = memory::usage_fraction(self.source.memory_status());
        let rows = self.source.interfaces();
        let net = self.net.update(rows.as_deref());
        let disk = self.disk.update();

        MetricsSnapshot {
            cpu,
            memory,
            net,
            disk,
        }
    }

    /// Changing the selection drops the network baseline, so the next
    /// sample reports no rate.
    pub fn set_selected_network_interface(&mut self, selection: NetSelection) {
        self.net.set_selection(selection);
    }

    pub fn selected_network_interface(&self) -> NetSelection {
        self.net.selection()
    }

    /// Interfaces a user may pin, filtered exactly as auto-select filters them.
    pub fn available_interfaces(&mut self) -> Vec<InterfaceChoice> {
        self.source
            .interfaces()
            .map(|rows| selectable_interfaces(&rows))
            .unwrap_or_default()
    }

    pub fn disk_available(&self) -> bool {
        self.disk.is_available()
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
