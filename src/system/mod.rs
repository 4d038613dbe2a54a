pub mod collector;
pub mod cpu;
pub mod disk;
pub mod history;
pub mod memory;
pub mod network;
pub mod platform;
pub mod snapshot;

pub use collector::MetricsCollector;
pub use platform::{CounterSource, CpuTimes, DiskQuery, InterfaceRow, MemoryStatus, NativeSource};
pub use snapshot::{DiskSample, MetricsSnapshot, NetSample};
