use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};

/// Workbook filename used when neither the CLI flag nor the settings file
/// names one.
pub const DEFAULT_WORKBOOK: &str = "data.xlsx";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Workbook remembered by `shelfwatch load`.
    #[serde(default)]
    pub workbook_path: Option<String>,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("shelfwatch")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ShelfError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn save_workbook_path(path: &str) -> Result<()> {
    let mut settings = load_settings();
    settings.workbook_path = Some(path.to_string());
    save_settings(&settings)
}

/// Pick the workbook to read: the CLI flag wins, then the settings file,
/// then `data.xlsx` in the working directory.
pub fn resolve_workbook(flag: Option<&str>) -> PathBuf {
    if let Some(path) = flag {
        return PathBuf::from(shellexpand_path(path));
    }
    if let Some(saved) = load_settings().workbook_path {
        if !saved.is_empty() {
            return PathBuf::from(shellexpand_path(&saved));
        }
    }
    PathBuf::from(DEFAULT_WORKBOOK)
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
