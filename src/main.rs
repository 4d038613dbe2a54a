use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use crossterm::event::KeyEventKind;

use wtop::app::App;
use wtop::config::{self, Config, load_config, load_config_from_path};
use wtop::event::{Event, EventHandler};
use wtop::format::overlay_line;
use wtop::logging;
use wtop::pacing::SampleClock;
use wtop::system::MetricsCollector;
use wtop::system::network::NetSelection;
use wtop::ui;

#[derive(Parser)]
#[command(
    name = "wtop",
    about = "Always-on-top CPU, memory, network and disk readout"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Network interface: `auto` or an OS interface index
    #[arg(long)]
    interface: Option<String>,

    /// Print readings to stdout instead of drawing the overlay.
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Number of readings to print in headless mode (0 runs until killed).
    #[arg(long, default_value_t = 5)]
    samples: usize,

    /// Emit headless readings as JSON lines.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Write tracing output to this file (JSON lines).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Tracing level for --log-file: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        let level = cli
            .log_level
            .parse::<tracing::Level>()
            .map_err(|e| eyre!("invalid --log-level `{}`: {e}", cli.log_level))?;
        logging::init_tracing_json(path, level)
            .wrap_err_with(|| format!("opening log file {}", path.display()))?;
    }

    let config = load_config_for_cli(&cli);
    if config.general.refresh_rate_ms == 0 {
        return Err(eyre!("refresh rate must be greater than 0"));
    }
    tracing::info!(
        refresh_rate_ms = config.general.refresh_rate_ms,
        interface = %config.network.interface,
        headless = cli.headless,
        "starting wtop"
    );

    if cli.headless {
        return run_headless(config, &cli).await;
    }

    let save_path = cli.config.clone().or_else(config::config_path);
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, config, save_path).await;
    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: Config,
    save_path: Option<PathBuf>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms);
    let mut app = App::new(config, save_path, MetricsCollector::new());
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        let should_draw = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = app.map_key(key);
                app.dispatch(action);
                true
            }
            Event::Key(_) => false,
            Event::Tick => {
                app.refresh_data();
                true
            }
            Event::Resize => true,
        };
        if should_draw {
            terminal.draw(|frame| ui::draw(frame, &app))?;
        }
    }

    tracing::info!("overlay closed");
    Ok(())
}

/// Samples on the configured cadence and prints one reading per tick.
async fn run_headless(config: Config, cli: &Cli) -> Result<()> {
    let mut collector = MetricsCollector::new();
    collector.initialize();
    collector.set_selected_network_interface(config.network.selection());
    if !collector.disk_available() {
        tracing::info!("disk counters unavailable; disk rates omitted");
    }

    // Baseline only; rates need two readings.
    let mut clock = SampleClock::default();
    clock.normalize(collector.sample(), Instant::now());

    let mut interval =
        tokio::time::interval(Duration::from_millis(config.general.refresh_rate_ms));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    interval.tick().await;

    let mut printed = 0usize;
    while cli.samples == 0 || printed < cli.samples {
        interval.tick().await;
        let snapshot = clock.normalize(collector.sample(), Instant::now());
        if cli.json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            println!("{}", overlay_line(&snapshot));
        }
        printed += 1;
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref interface) = cli.interface {
        config.network.interface = NetSelection::from_config_str(interface).to_config_string();
    }

    config
}
