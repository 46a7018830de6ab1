use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PassbookError, Result};
use crate::paginate::{PageLayout, DEFAULT_MARGIN};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub company_name: String,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default = "default_page_margin")]
    pub page_margin_mm: f64,
    #[serde(default = "default_raster_dpi")]
    pub raster_dpi: f64,
}

fn default_export_dir() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("passbook")
        .join("exports")
        .to_string_lossy()
        .to_string()
}

fn default_page_margin() -> f64 {
    DEFAULT_MARGIN
}

fn default_raster_dpi() -> f64 {
    300.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            export_dir: default_export_dir(),
            page_margin_mm: default_page_margin(),
            raster_dpi: default_raster_dpi(),
        }
    }
}

impl Settings {
    pub fn layout(&self) -> PageLayout {
        PageLayout::a4(self.page_margin_mm)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout()
            .validate()
            .map_err(|e| PassbookError::Settings(e.to_string()))?;
        if !self.raster_dpi.is_finite() || self.raster_dpi <= 0.0 {
            return Err(PassbookError::Settings(format!(
                "raster_dpi must be positive, got {}",
                self.raster_dpi
            )));
        }
        Ok(())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("passbook")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing or unreadable files fall back to defaults; missing keys are filled in.
pub fn load_settings_from(path: &std::path::Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("ignoring unreadable settings at {}: {e}", path.display());
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &std::path::Path) -> Result<()> {
    settings.validate()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| PassbookError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn get_export_dir() -> PathBuf {
    PathBuf::from(shellexpand_path(&load_settings().export_dir))
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            company_name: "Shree Traders".to_string(),
            export_dir: "/tmp/exports".to_string(),
            page_margin_mm: 12.5,
            raster_dpi: 150.0,
        };
        save_settings_to(&settings, &path).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.company_name, "Shree Traders");
        assert_eq!(loaded.export_dir, "/tmp/exports");
        assert_eq!(loaded.page_margin_mm, 12.5);
        assert_eq!(loaded.raster_dpi, 150.0);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("absent.json"));
        assert!(s.company_name.is_empty());
        assert_eq!(s.page_margin_mm, 10.0);
        assert_eq!(s.raster_dpi, 300.0);
        assert!(!s.export_dir.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"company_name": "Acme"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.company_name, "Acme");
        assert_eq!(s.page_margin_mm, 10.0);
        assert!(s.export_dir.ends_with("exports"));
    }

    #[test]
    fn test_load_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        let s = load_settings_from(&path);
        assert_eq!(s.raster_dpi, 300.0);
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        save_settings_to(&Settings::default(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_rejects_oversized_margin() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            page_margin_mm: 150.0,
            ..Settings::default()
        };
        let err = save_settings_to(&settings, &dir.path().join("s.json")).unwrap_err();
        assert!(matches!(err, PassbookError::Settings(_)));
    }

    #[test]
    fn test_shellexpand_leaves_plain_paths() {
        assert_eq!(shellexpand_path("/var/tmp"), "/var/tmp");
    }
}
