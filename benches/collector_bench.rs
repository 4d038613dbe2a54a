use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::hint::black_box;
use wtop::app::App;
use wtop::config::Config;
use wtop::system::{CounterSource, CpuTimes, DiskQuery, InterfaceRow, MemoryStatus, MetricsCollector};
use wtop::ui;

/// Counters that advance on every read so each sample does real delta work.
struct Ticking {
    tick: u64,
    rows: Vec<InterfaceRow>,
}

impl Ticking {
    fn with_interfaces(n: usize) -> Self {
        let rows = (0..n)
            .map(|i| InterfaceRow {
                index: i as u32 + 1,
                name: format!("eth{i}"),
                operational: i % 3 != 0,
                loopback: i == 0,
                recv_octets: 0,
                sent_octets: 0,
                link_speed_bps: ((i % 7) as u64 + 1) * 100_000_000,
            })
            .collect();
        Ticking { tick: 0, rows }
    }
}

impl CounterSource for Ticking {
    fn cpu_times(&mut self) -> Option<CpuTimes> {
        self.tick += 1;
        Some(CpuTimes {
            idle: self.tick * 40,
            kernel: self.tick * 70,
            user: self.tick * 30,
        })
    }
    fn memory_status(&mut self) -> Option<MemoryStatus> {
        Some(MemoryStatus {
            total: 16 << 30,
            available: 6 << 30,
        })
    }
    fn interfaces(&mut self) -> Option<Vec<InterfaceRow>> {
        for row in &mut self.rows {
            row.recv_octets += 1_500;
            row.sent_octets += 600;
        }
        Some(self.rows.clone())
    }
    fn open_disk_query(&mut self) -> Option<Box<dyn DiskQuery>> {
        None
    }
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("collector_sample_4_32_256");

    for size in [4usize, 32, 256] {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut collector = MetricsCollector::with_source(Ticking::with_interfaces(size));
            collector.initialize();
            collector.sample();
            b.iter(|| black_box(collector.sample()))
        });
    }

    group.finish();
}

fn bench_overlay_render(c: &mut Criterion) {
    let mut app = App::new(
        Config::default(),
        None,
        MetricsCollector::with_source(Ticking::with_interfaces(8)),
    );
    for _ in 0..60 {
        app.refresh_data();
    }

    c.bench_function("overlay_render_120x8", |b| {
        b.iter(|| {
            let backend = TestBackend::new(120, 8);
            let mut terminal = Terminal::new(backend).expect("bench terminal init failed");
            terminal
                .draw(|frame| ui::draw(frame, black_box(&app)))
                .expect("bench draw failed");
            black_box(terminal.backend());
        })
    });
}

criterion_group!(benches, bench_sample, bench_overlay_render);
criterion_main!(benches);
