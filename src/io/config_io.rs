use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::column::ColumnLayout;
use crate::model::config::Config;

/// Error type for config file operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("could not edit config: {0}")]
    EditError(#[from] toml_edit::TomlError),
}

/// Config directory, respecting XDG_CONFIG_HOME
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("taskaway")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Expand a leading `~/` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None if path == "~" => home_dir(),
        None => PathBuf::from(path),
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Load the config at `path`.
///
/// A missing file is created with defaults. A file that does not parse is
/// backed up as `<name>.bak` and replaced with defaults; this is logged but
/// not treated as an error. When the backup cannot be made the file is left
/// untouched and defaults are used for this run only.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("no config at {}, writing defaults", path.display());
            let config = Config::default();
            write_config(path, &config)?;
            return Ok(config);
        }
        Err(source) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    match toml::from_str::<Config>(&text) {
        Ok(config) => Ok(config),
        Err(e) => {
            let bak = backup_path(path);
            if let Err(copy_err) = fs::copy(path, &bak) {
                // Keep the only copy of the user's file; run on defaults
                log::warn!(
                    "could not parse {} ({}) and could not back it up as {}: {}",
                    path.display(),
                    e,
                    bak.display(),
                    copy_err
                );
                return Ok(Config::default());
            }
            log::warn!(
                "could not parse {} (backed up as {}): {}",
                path.display(),
                bak.display(),
                e
            );
            let config = Config::default();
            write_config(path, &config)?;
            Ok(config)
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

/// Write the whole config, replacing whatever is on disk
pub fn write_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config)?;
    atomic_write(path, text.as_bytes()).map_err(|source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the config document for round-trip-safe editing (empty if missing)
fn read_document(path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.parse::<toml_edit::DocumentMut>()?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(toml_edit::DocumentMut::new()),
        Err(source) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn update_document(
    path: &Path,
    edit: impl FnOnce(&mut toml_edit::DocumentMut),
) -> Result<(), ConfigError> {
    let mut doc = read_document(path)?;
    edit(&mut doc);
    atomic_write(path, doc.to_string().as_bytes()).map_err(|source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the `[[columns]]` tables, keeping the rest of the file intact
pub fn save_column_layout(path: &Path, layout: &ColumnLayout) -> Result<(), ConfigError> {
    update_document(path, |doc| set_column_layout(doc, layout))
}

/// Update the `theme` key, keeping the rest of the file intact
pub fn save_theme(path: &Path, theme: &str) -> Result<(), ConfigError> {
    update_document(path, |doc| {
        doc["theme"] = toml_edit::value(theme);
    })
}

fn set_column_layout(doc: &mut toml_edit::DocumentMut, layout: &ColumnLayout) {
    let mut columns = toml_edit::ArrayOfTables::new();
    for (name, visible) in layout.entries() {
        let mut table = toml_edit::Table::new();
        table["name"] = toml_edit::value(name);
        table["visible"] = toml_edit::value(visible);
        columns.push(table);
    }
    doc["columns"] = toml_edit::Item::ArrayOfTables(columns);
}
