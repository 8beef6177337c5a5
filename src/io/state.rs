use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::ViewState;

/// Persisted TUI state (written to state.json next to the config)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Expanded project paths
    #[serde(default)]
    pub expanded: BTreeSet<String>,
    #[serde(default)]
    pub project_filter: String,
    #[serde(default)]
    pub tag_filter: BTreeSet<String>,
}

impl UiState {
    pub fn capture(state: &ViewState) -> Self {
        UiState {
            expanded: state.expanded.clone(),
            project_filter: state.project_filter.clone(),
            tag_filter: state.tag_filter.clone(),
        }
    }

    pub fn apply(self, state: &mut ViewState) {
        state.expanded = self.expanded;
        state.project_filter = self.project_filter;
        state.tag_filter = self.tag_filter;
    }
}

/// state.json lives beside the config file
pub fn state_path(config_path: &Path) -> PathBuf {
    config_path.with_file_name("state.json")
}

/// Read state.json; missing or malformed files yield None
pub fn read_ui_state(path: &Path) -> Option<UiState> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("ignoring malformed {}: {}", path.display(), e);
            None
        }
    }
}

pub fn write_ui_state(path: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    super::config_io::atomic_write(path, content.as_bytes())
}
