//! Configuration management
//!
//! settings.json format:
//! ```json
//! {
//!   "api": { "url": "https://project.supabase.co", "anonKey": "..." },
//!   "app": { "demoMode": false },
//!   "display": { "usdToIdr": 15000 }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    display: DisplaySettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    anon_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplaySettings {
    #[serde(default)]
    usd_to_idr: Option<Decimal>,
}

fn default_usd_to_idr() -> Decimal {
    Decimal::new(15_000, 0)
}

/// Coinpurse configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub demo_mode: bool,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub usd_to_idr: Decimal,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_mode: false,
            api_url: None,
            api_key: None,
            usd_to_idr: default_usd_to_idr(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the coinpurse directory
    ///
    /// Environment variables override the file:
    /// - `COINPURSE_DEMO_MODE` (truthy/falsy strings)
    /// - `COINPURSE_API_URL`, `COINPURSE_API_KEY`
    /// - `COINPURSE_USD_TO_IDR`
    pub fn load(coinpurse_dir: &Path) -> Result<Self> {
        let settings_path = coinpurse_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let demo_mode = match std::env::var("COINPURSE_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        let api_url = std::env::var("COINPURSE_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| raw.api.url.clone());
        let api_key = std::env::var("COINPURSE_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| raw.api.anon_key.clone());

        let usd_to_idr = std::env::var("COINPURSE_USD_TO_IDR")
            .ok()
            .and_then(|v| v.parse::<Decimal>().ok())
            .filter(|rate| *rate > Decimal::ZERO)
            .or(raw.display.usd_to_idr)
            .filter(|rate| *rate > Decimal::ZERO)
            .unwrap_or_else(default_usd_to_idr);

        Ok(Self {
            demo_mode,
            api_url,
            api_key,
            usd_to_idr,
            _raw_settings: raw,
        })
    }

    /// Save config to the coinpurse directory
    ///
    /// Preserves settings the CLI doesn't manage.
    pub fn save(&self, coinpurse_dir: &Path) -> Result<()> {
        let settings_path = coinpurse_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.demo_mode = self.demo_mode;
        settings.api.url = self.api_url.clone();
        settings.api.anon_key = self.api_key.clone();
        settings.display.usd_to_idr = Some(self.usd_to_idr);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.api_url.is_none());
        assert_eq!(config.usd_to_idr, default_usd_to_idr());
    }

    #[test]
    fn test_load_reads_settings_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{
                "api": { "url": "https://project.supabase.co", "anonKey": "anon" },
                "app": { "demoMode": true },
                "display": { "usdToIdr": 16000 }
            }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(
            config.api_url.as_deref(),
            Some("https://project.supabase.co")
        );
        assert_eq!(config.api_key.as_deref(), Some("anon"));
        assert!(config.demo_mode);
        assert_eq!(config.usd_to_idr, Decimal::new(16_000, 0));
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(!config.demo_mode);
    }

    #[test]
    fn test_save_preserves_unmanaged_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "app": { "demoMode": false, "theme": "dark" } }"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.enable_demo_mode();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(content.contains("\"theme\""));

        let reloaded = Config::load(dir.path()).unwrap();
        assert!(reloaded.demo_mode);
    }
}
