//! Process settings.
//!
//! Precedence, lowest first: built-in defaults, `garden.toml` (from the data
//! dir, or `--config`), `GARDEN_*` environment variables, CLI flags.

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{Context, Result, bail};
use garden_core::DecayConfig;
use serde::Deserialize;

const CONFIG_FILE: &str = "garden.toml";
const DATABASE_FILE: &str = "garden.db";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub service_name: String,
    /// Explicit database path. Defaults to `<data dir>/garden.db`.
    pub database: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub cors: CorsSettings,
    pub decay: DecayConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_name: "relationship-garden".to_string(),
            database: None,
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors: CorsSettings::default(),
            decay: DecayConfig::default(),
        }
    }
}

/// Allowed browser origins. Empty means any origin.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

/// Base directory for the database and config file.
/// Priority: GARDEN_DATA_DIR > ~/.relationship-garden
pub fn data_dir() -> PathBuf {
    env::var("GARDEN_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            env::var("HOME")
                .or_else(|_| env::var("USERPROFILE"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".relationship-garden")
        })
}

impl Settings {
    /// Load from an explicit file (which must exist), or from `garden.toml`
    /// in the data dir when present, then apply environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut settings = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = data_dir().join(CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        settings.apply_env(|key| env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let settings = Self::from_toml_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `GARDEN_DB`, `GARDEN_HOST` and `GARDEN_PORT` overrides.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(db) = lookup("GARDEN_DB").filter(|v| !v.is_empty()) {
            self.database = Some(PathBuf::from(db));
        }
        if let Some(host) = lookup("GARDEN_HOST").filter(|v| !v.is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup("GARDEN_PORT").filter(|v| !v.is_empty()) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("GARDEN_PORT is not a port number: {port:?}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(e) = self.decay.validate() {
            bail!("invalid [decay] settings: {e}");
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| data_dir().join(DATABASE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.port, 8000);
        assert_eq!(s.decay, DecayConfig::default());
        assert!(s.cors.allowed_origins.is_empty());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_full_toml() {
        let s = Settings::from_toml_str(
            r#"
            service_name = "garden-test"
            database = "/tmp/garden-test.db"
            port = 9100

            [cors]
            allowed_origins = ["http://localhost:8081"]

            [decay.rates]
            orchid = 0.06

            [decay.thresholds]
            healthy = 0.75
            "#,
        )
        .unwrap();
        assert_eq!(s.service_name, "garden-test");
        assert_eq!(s.database, Some(PathBuf::from("/tmp/garden-test.db")));
        assert_eq!(s.port, 9100);
        assert_eq!(s.host, "127.0.0.1");
        assert_eq!(s.cors.allowed_origins, vec!["http://localhost:8081"]);
        assert_eq!(s.decay.rates.orchid, 0.06);
        assert_eq!(s.decay.rates.fern, 0.0231);
        assert_eq!(s.decay.thresholds.healthy, 0.75);
        assert_eq!(s.database_path(), PathBuf::from("/tmp/garden-test.db"));
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(Settings::from_toml_str("port = \"eighty\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut s = Settings::default();
        s.apply_env(env_of(&[
            ("GARDEN_DB", "/data/g.db"),
            ("GARDEN_HOST", "0.0.0.0"),
            ("GARDEN_PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(s.database, Some(PathBuf::from("/data/g.db")));
        assert_eq!(s.host, "0.0.0.0");
        assert_eq!(s.port, 8080);
    }

    #[test]
    fn test_empty_env_ignored() {
        let mut s = Settings::default();
        s.apply_env(env_of(&[("GARDEN_HOST", ""), ("GARDEN_PORT", "")]))
            .unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_bad_port_env() {
        let mut s = Settings::default();
        let err = s
            .apply_env(env_of(&[("GARDEN_PORT", "99999")]))
            .unwrap_err();
        assert!(err.to_string().contains("GARDEN_PORT"));
    }

    #[test]
    fn test_invalid_thresholds_fail_validation() {
        let s = Settings::from_toml_str(
            r#"
            [decay.thresholds]
            healthy = 0.3
            cooling = 0.5
            "#,
        )
        .unwrap();
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("[decay]"));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(Settings::from_file(&dir.path().join("nope.toml")).is_err());
    }
}
