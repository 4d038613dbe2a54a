use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::system::network::NetSelection;

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub network: NetworkConfig,
    pub graphs: GraphsConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub history_length: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 1000,
            history_length: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// `"auto"` or an OS interface index.
    pub interface: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            interface: "auto".to_string(),
        }
    }
}

impl NetworkConfig {
    pub fn selection(&self) -> NetSelection {
        NetSelection::from_config_str(&self.interface)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphsConfig {
    pub show_cpu: bool,
    pub show_mem: bool,
    pub show_net: bool,
}

impl Default for GraphsConfig {
    fn default() -> Self {
        GraphsConfig {
            show_cpu: true,
            show_mem: true,
            show_net: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub help: String,
    pub toggle_cpu: String,
    pub toggle_mem: String,
    pub toggle_net: String,
    pub pick_interface: String,
    pub refresh: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            help: "?".to_string(),
            toggle_cpu: "c".to_string(),
            toggle_mem: "m".to_string(),
            toggle_net: "n".to_string(),
            pick_interface: "i".to_string(),
            refresh: "r".to_string(),
        }
    }
}

/// Parse a keybind string such as `"q"`, `"Enter"` or `"Space"`.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    match s {
        "Enter" | "enter" => Some(KeyCode::Enter),
        "Escape" | "Esc" | "escape" | "esc" => Some(KeyCode::Esc),
        "Tab" | "tab" => Some(KeyCode::Tab),
        "Backspace" | "backspace" => Some(KeyCode::Backspace),
        "Space" | "space" => Some(KeyCode::Char(' ')),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wtop").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

pub fn save_config_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config).wrap_err("serializing config")?;
    std::fs::write(path, contents).wrap_err_with(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.refresh_rate_ms, 1000);
        assert_eq!(config.general.history_length, 60);
        assert_eq!(config.network.selection(), NetSelection::Auto);
        assert!(config.graphs.show_cpu && config.graphs.show_mem && config.graphs.show_net);
        assert_eq!(config.keybinds.quit, "q");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[network]
interface = "7"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.network.selection(), NetSelection::Pinned(7));
        assert_eq!(config.general.refresh_rate_ms, 1000);
        assert!(config.graphs.show_net);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
refresh_rate_ms = 500
history_length = 120

[network]
interface = "auto"

[graphs]
show_cpu = true
show_mem = false
show_net = false

[keybinds]
quit = "x"
pick_interface = "Tab"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.refresh_rate_ms, 500);
        assert_eq!(config.general.history_length, 120);
        assert!(!config.graphs.show_mem);
        assert!(!config.graphs.show_net);
        assert_eq!(config.keybinds.quit, "x");
        assert_eq!(parse_key(&config.keybinds.pick_interface), Some(KeyCode::Tab));
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("wtop_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.general.refresh_rate_ms, 1000);
        let _ = std::fs::remove_file(&temp);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = std::env::temp_dir().join(format!("wtop_cfg_{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let mut config = Config::default();
        config.network.interface = NetSelection::Pinned(4).to_config_string();
        config.graphs.show_cpu = false;
        save_config_to_path(&config, &path).unwrap();

        let loaded = load_config_from_path(&path);
        assert_eq!(loaded, config);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn parse_key_variants() {
        assert_eq!(parse_key("q"), Some(KeyCode::Char('q')));
        assert_eq!(parse_key("Esc"), Some(KeyCode::Esc));
        assert_eq!(parse_key("Space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("ctrl+q"), None);
    }
}
