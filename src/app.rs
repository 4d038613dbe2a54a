use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, Graph, PickerMove};
use crate::config::{Config, KeybindsConfig, parse_key, save_config_to_path};
use crate::pacing::SampleClock;
use crate::system::collector::MetricsCollector;
use crate::system::history::MetricHistory;
use crate::system::network::{InterfaceChoice, NetSelection};
use crate::system::platform::{CounterSource, NativeSource};
use crate::system::snapshot::MetricsSnapshot;
use crate::ui::theme::Theme;

const STATUS_TTL_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
    InterfacePicker,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub help: KeyCode,
    pub toggle_cpu: KeyCode,
    pub toggle_mem: KeyCode,
    pub toggle_net: KeyCode,
    pub pick_interface: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            toggle_cpu: parse_key(&kb.toggle_cpu).unwrap_or(KeyCode::Char('c')),
            toggle_mem: parse_key(&kb.toggle_mem).unwrap_or(KeyCode::Char('m')),
            toggle_net: parse_key(&kb.toggle_net).unwrap_or(KeyCode::Char('n')),
            pick_interface: parse_key(&kb.pick_interface).unwrap_or(KeyCode::Char('i')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.toggle_cpu), "Toggle CPU graph"),
            (key_label(self.toggle_mem), "Toggle memory graph"),
            (key_label(self.toggle_net), "Toggle network graph"),
            (key_label(self.pick_interface), "Choose network interface"),
            (key_label(self.refresh), "Redraw"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        _ => "?".to_string(),
    }
}

/// Owns everything the overlay needs between ticks: the collector, the
/// latest snapshot, rolling histories and the persisted display settings.
pub struct App<S: CounterSource = NativeSource> {
    pub running: bool,
    pub collector: MetricsCollector<S>,
    pub snapshot: MetricsSnapshot,
    pub history: MetricHistory,
    pub input_mode: InputMode,
    pub picker_entries: Vec<InterfaceChoice>,
    pub picker_index: usize,
    pub status_message: Option<(String, Instant)>,
    pub keybinds: ResolvedKeybinds,
    pub theme: Theme,
    clock: SampleClock,
    config: Config,
    config_path: Option<PathBuf>,
}

impl<S: CounterSource> App<S> {
    /// `config_path` is where display settings are written back; `None`
    /// keeps changes in memory only.
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        mut collector: MetricsCollector<S>,
    ) -> Self {
        collector.initialize();
        collector.set_selected_network_interface(config.network.selection());

        let mut clock = SampleClock::default();
        let mut history = MetricHistory::new(config.general.history_length);
        let snapshot = clock.normalize(collector.sample(), Instant::now());
        history.record(&snapshot);

        App {
            running: true,
            collector,
            snapshot,
            history,
            input_mode: InputMode::Normal,
            picker_entries: Vec::new(),
            picker_index: 0,
            status_message: None,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            theme: Theme::default(),
            clock,
            config,
            config_path,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// One sampling tick. Only the tick timer should call this; network
    /// rates are scaled by the time since the previous call.
    pub fn refresh_data(&mut self) {
        self.refresh_data_at(Instant::now());
    }

    pub fn refresh_data_at(&mut self, at: Instant) {
        self.snapshot = self.clock.normalize(self.collector.sample(), at);
        self.history.record(&self.snapshot);
        self.expire_status(at);
    }

    fn expire_status(&mut self, now: Instant) {
        if let Some((_, created)) = &self.status_message
            && now.saturating_duration_since(*created).as_secs() >= STATUS_TTL_SECS
        {
            self.status_message = None;
        }
    }

    pub fn is_visible(&self, graph: Graph) -> bool {
        let graphs = &self.config.graphs;
        match graph {
            Graph::Cpu => graphs.show_cpu,
            Graph::Memory => graphs.show_mem,
            Graph::Network => graphs.show_net,
        }
    }

    pub fn visible_graphs(&self) -> Vec<Graph> {
        [Graph::Cpu, Graph::Memory, Graph::Network]
            .into_iter()
            .filter(|g| self.is_visible(*g))
            .collect()
    }

    pub fn selection(&self) -> NetSelection {
        self.collector.selected_network_interface()
    }

    /// Human label for the current selection, resolved against the last
    /// known interface list when pinned.
    pub fn selection_label(&self) -> String {
        match self.selection() {
            NetSelection::Auto => "auto".to_string(),
            NetSelection::Pinned(index) => self
                .picker_entries
                .iter()
                .find(|c| c.index == index)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("interface #{index}")),
        }
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn show_picker(&self) -> bool {
        self.input_mode == InputMode::InterfacePicker
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Help => self.map_key_help(key),
            InputMode::InterfacePicker => self.map_key_picker(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.toggle_cpu {
            return Action::ToggleGraph(Graph::Cpu);
        }
        if code == kb.toggle_mem {
            return Action::ToggleGraph(Graph::Memory);
        }
        if code == kb.toggle_net {
            return Action::ToggleGraph(Graph::Network);
        }
        if code == kb.pick_interface {
            return Action::OpenInterfacePicker;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_picker(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Action::MovePicker(PickerMove::Up),
            KeyCode::Down | KeyCode::Char('j') => Action::MovePicker(PickerMove::Down),
            KeyCode::Enter => Action::ApplyPicker,
            KeyCode::Esc => Action::ClosePicker,
            code if code == self.keybinds.pick_interface => Action::ClosePicker,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleGraph(graph) => {
                let graphs = &mut self.config.graphs;
                let flag = match graph {
                    Graph::Cpu => &mut graphs.show_cpu,
                    Graph::Memory => &mut graphs.show_mem,
                    Graph::Network => &mut graphs.show_net,
                };
                *flag = !*flag;
                self.persist();
            }
            Action::OpenInterfacePicker => self.open_picker(),
            Action::MovePicker(direction) => {
                let last = self.picker_entries.len();
                self.picker_index = match direction {
                    PickerMove::Up => self.picker_index.saturating_sub(1),
                    PickerMove::Down => (self.picker_index + 1).min(last),
                };
            }
            Action::ApplyPicker => self.apply_picker(),
            Action::ClosePicker => self.input_mode = InputMode::Normal,
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            // Redraw only: sampling off the tick would shorten the interval.
            Action::Refresh => self.expire_status(Instant::now()),
            Action::None => {}
        }
    }

    /// Picker rows: index 0 is auto-select, then one row per interface.
    pub fn picker_labels(&self) -> Vec<(String, bool)> {
        let selection = self.selection();
        let mut labels = vec![(
            "Auto-select fastest".to_string(),
            selection == NetSelection::Auto,
        )];
        labels.extend(self.picker_entries.iter().map(|choice| {
            (
                choice.name.clone(),
                selection == NetSelection::Pinned(choice.index),
            )
        }));
        labels
    }

    fn open_picker(&mut self) {
        self.picker_entries = self.collector.available_interfaces();
        self.picker_index = match self.selection() {
            NetSelection::Auto => 0,
            NetSelection::Pinned(index) => self
                .picker_entries
                .iter()
                .position(|c| c.index == index)
                .map(|pos| pos + 1)
                .unwrap_or(0),
        };
        self.input_mode = InputMode::InterfacePicker;
    }

    fn apply_picker(&mut self) {
        let selection = match self.picker_index {
            0 => NetSelection::Auto,
            i => match self.picker_entries.get(i - 1) {
                Some(choice) => NetSelection::Pinned(choice.index),
                None => NetSelection::Auto,
            },
        };
        self.collector.set_selected_network_interface(selection);
        self.config.network.interface = selection.to_config_string();
        self.input_mode = InputMode::Normal;
        self.set_status(format!("Network: {}", self.selection_label()));
        self.persist();
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    fn persist(&mut self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(err) = save_config_to_path(&self.config, path) {
            tracing::warn!(error = %err, path = %path.display(), "failed to save settings");
            self.set_status(format!("Could not save settings: {err}"));
        }
    }
}
