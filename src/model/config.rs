use serde::{Deserialize, Serialize};

use super::column::ColumnLayout;

/// Configuration from config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Color theme name (gruvbox, nord, dracula, midnight)
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Seconds between automatic refreshes while the task table has focus
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// Taskwarrior rc file, exported to the backend as TASKRC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taskrc: Option<String>,
    /// Backend executable
    #[serde(default = "default_task_bin")]
    pub task_bin: String,
    /// Column order and visibility. Must stay last: TOML tables follow values.
    #[serde(default)]
    pub columns: ColumnLayout,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            theme: default_theme(),
            refresh_secs: default_refresh_secs(),
            taskrc: None,
            task_bin: default_task_bin(),
            columns: ColumnLayout::default(),
        }
    }
}

fn default_theme() -> String {
    "gruvbox".to_string()
}

fn default_refresh_secs() -> u64 {
    1
}

fn default_task_bin() -> String {
    "task".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_columns_are_reconciled() {
        let config: Config = toml::from_str(
            r#"theme = "nord"

[[columns]]
name = "uuid"
visible = true

[[columns]]
name = "retired_column"
visible = true
"#,
        )
        .unwrap();
        assert_eq!(config.theme, "nord");
        assert_eq!(config.columns.definitions()[0].column.name(), "uuid");
        assert_eq!(config.columns.len(), 9);
        assert_eq!(config.columns.visible_columns().count(), 1);
    }

    #[test]
    fn serialized_default_parses_back() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!text.contains("taskrc"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, Config::default());
    }
}
