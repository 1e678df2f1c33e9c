// Configuration: where the API key, endpoint and timeout come from.
//
// Values are layered: command-line flag or environment variable first,
// then the JSON config file, then the built-in defaults below.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default OCR endpoint.
pub const API_URL: &str = "https://api.apiverve.com/v1/imagetotext";

/// Placeholder shipped in sample configs. Treated the same as no key.
pub const PLACEHOLDER_KEY: &str = "your-api-key-here";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// On-disk shape of `config.json`. Every field is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line (or through their env fallbacks).
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings used to build the HTTP client.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            api_url: API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// `<config dir>/ocr-scanner/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ocr-scanner").join("config.json"))
    }

    /// Merge overrides on top of the file config.
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Config {
        let api_key = usable_key(overrides.api_key).or_else(|| usable_key(file.api_key));
        let api_url = overrides
            .api_url
            .or(file.api_url)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| API_URL.to_string());
        let secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Config {
            api_key,
            api_url,
            timeout: Duration::from_secs(secs),
        }
    }

    /// Load the config file and resolve it against `overrides`.
    ///
    /// An explicit `path` must exist. The default location is optional and
    /// silently skipped when absent.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Config> {
        let file = match path {
            Some(p) => read_file_config(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => read_file_config(&p)?,
                _ => FileConfig::default(),
            },
        };
        Ok(Self::resolve(overrides, file))
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Read and parse a JSON config file.
pub fn read_file_config(path: &Path) -> Result<FileConfig> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let cfg: FileConfig = serde_json::from_str(&data)
        .with_context(|| format!("Parsing config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(cfg)
}

fn usable_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_any_source() {
        let cfg = Config::resolve(Overrides::default(), FileConfig::default());
        assert!(!cfg.has_api_key());
        assert_eq!(cfg.api_url, API_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn placeholder_and_blank_keys_are_unset() {
        let file = FileConfig {
            api_key: Some(PLACEHOLDER_KEY.into()),
            ..Default::default()
        };
        let overrides = Overrides {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert!(!Config::resolve(overrides, file).has_api_key());
    }

    #[test]
    fn overrides_win_over_file() {
        let file = FileConfig {
            api_key: Some("from-file".into()),
            api_url: Some("http://file.example/ocr".into()),
            timeout_secs: Some(5),
        };
        let overrides = Overrides {
            api_key: Some("from-flag".into()),
            api_url: None,
            timeout_secs: Some(90),
        };
        let cfg = Config::resolve(overrides, file);
        assert_eq!(cfg.api_key.as_deref(), Some("from-flag"));
        assert_eq!(cfg.api_url, "http://file.example/ocr");
        assert_eq!(cfg.timeout, Duration::from_secs(90));
    }

    #[test]
    fn file_key_used_when_override_is_placeholder() {
        let file = FileConfig {
            api_key: Some("real-key".into()),
            ..Default::default()
        };
        let overrides = Overrides {
            api_key: Some(PLACEHOLDER_KEY.into()),
            ..Default::default()
        };
        assert_eq!(
            Config::resolve(overrides, file).api_key.as_deref(),
            Some("real-key")
        );
    }

    #[test]
    fn load_reads_explicit_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"api_key": "abc123", "timeout_secs": 12}}"#).unwrap();
        let cfg = Config::load(Some(f.path()), Overrides::default()).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("abc123"));
        assert_eq!(cfg.timeout, Duration::from_secs(12));
        assert_eq!(cfg.api_url, API_URL);
    }

    #[test]
    fn load_rejects_malformed_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "api_key = nope").unwrap();
        let err = Config::load(Some(f.path()), Overrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Parsing config file"));
    }

    #[test]
    fn load_requires_explicit_file_to_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(Config::load(Some(&missing), Overrides::default()).is_err());
    }
}
