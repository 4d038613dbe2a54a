use std::collections::VecDeque;

use super::snapshot::MetricsSnapshot;

pub const DEFAULT_CAPACITY: usize = 60;

/// Rolling per-tick fractions for the sparklines, oldest first.
#[derive(Debug, Clone)]
pub struct MetricHistory {
    pub cpu: VecDeque<f32>,
    pub memory: VecDeque<f32>,
    pub net: VecDeque<f32>,
    capacity: usize,
}

impl MetricHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            cpu: VecDeque::with_capacity(capacity),
            memory: VecDeque::with_capacity(capacity),
            net: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.cpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty()
    }

    pub fn push(&mut self, cpu: f32, memory: f32, net: f32) {
        push_capped(&mut self.cpu, cpu, self.capacity);
        push_capped(&mut self.memory, memory, self.capacity);
        push_capped(&mut self.net, net, self.capacity);
    }

    pub fn record(&mut self, snapshot: &MetricsSnapshot) {
        let net = snapshot.net.map(|n| n.utilization()).unwrap_or(0.0);
        self.push(snapshot.cpu, snapshot.memory, net);
    }
}

impl Default for MetricHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

fn push_capped(series: &mut VecDeque<f32>, value: f32, capacity: usize) {
    if series.len() == capacity {
        series.pop_front();
    }
    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    series.push_back(value);
}
