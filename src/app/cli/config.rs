//! TOML configuration file loading and settings resolution
//!
//! Precedence is defaults < configuration file < command line. The default
//! file lives at `<config dir>/Teamscan/teamscan.toml` and is optional; a file
//! named with `--config-file` must exist.

use super::args::Args;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "ATTENDANCE";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("Error reading configuration file {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Error parsing configuration file {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("No attendance endpoint configured; pass --endpoint or set 'endpoint' in the configuration file")]
    MissingEndpoint,
}

/// Optional settings from one layer (file or command line).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer {
    pub endpoint: Option<String>,
    pub title: Option<String>,
    pub source: Option<PathBuf>,
    pub request_timeout: Option<u64>,
    pub auto_reset: Option<u64>,
    pub color: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    /// `Some(None)` means file logging was explicitly disabled.
    pub log_file: Option<Option<PathBuf>>,
}

/// Fully resolved scanner settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerConfig {
    pub endpoint: Url,
    pub title: String,
    pub source: Option<PathBuf>,
    pub request_timeout: Option<Duration>,
    pub auto_reset: Option<Duration>,
    pub color: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
}

fn log_file_value(raw: &Path) -> Option<PathBuf> {
    let text = raw.to_string_lossy();
    if text.eq_ignore_ascii_case("none") || text == "-" {
        None
    } else {
        Some(raw.to_path_buf())
    }
}

fn one_of(key: &str, value: &str, allowed: &[&str]) -> Result<String, ConfigError> {
    if allowed.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("'{}' is not one of {}", value, allowed.join(", ")),
        })
    }
}

fn seconds(key: &str, value: &toml::Value) -> Result<u64, ConfigError> {
    value
        .as_integer()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: "expected a non-negative number of seconds".to_string(),
        })
}

fn boolean(key: &str, value: &toml::Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: "expected true or false".to_string(),
    })
}

fn string(key: &str, value: &toml::Value) -> Result<String, ConfigError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: "expected a string".to_string(),
        })
}

impl ConfigLayer {
    pub fn from_args(args: &Args) -> Self {
        Self {
            endpoint: args.endpoint.clone(),
            title: args.title.clone(),
            source: args.source.clone(),
            request_timeout: args.request_timeout,
            auto_reset: args.auto_reset,
            color: args.color_choice(),
            log_level: args.log_level.clone(),
            log_format: args.log_format.clone(),
            log_file: args.log_file.as_deref().map(log_file_value),
        }
    }

    /// Read recognised keys from a parsed TOML table. Unknown keys are ignored.
    pub fn from_toml(config: &toml::Table) -> Result<Self, ConfigError> {
        let mut layer = Self::default();

        if let Some(v) = config.get("endpoint") {
            layer.endpoint = Some(string("endpoint", v)?);
        }
        if let Some(v) = config.get("title") {
            layer.title = Some(string("title", v)?);
        }
        if let Some(v) = config.get("source") {
            layer.source = Some(PathBuf::from(string("source", v)?));
        }
        if let Some(v) = config.get("request-timeout") {
            layer.request_timeout = Some(seconds("request-timeout", v)?);
        }
        if let Some(v) = config.get("auto-reset") {
            layer.auto_reset = Some(seconds("auto-reset", v)?);
        }
        if let Some(v) = config.get("color") {
            layer.color = Some(boolean("color", v)?);
        }
        if let Some(v) = config.get("no-color") {
            layer.color = Some(!boolean("no-color", v)?);
        }
        if let Some(v) = config.get("log-level") {
            let level = string("log-level", v)?;
            layer.log_level = Some(one_of(
                "log-level",
                &level,
                &["trace", "debug", "info", "warn", "error", "off"],
            )?);
        }
        if let Some(v) = config.get("log-format") {
            let format = string("log-format", v)?;
            layer.log_format = Some(one_of("log-format", &format, &["text", "ext", "json"])?);
        }
        if let Some(v) = config.get("log-file") {
            layer.log_file = Some(log_file_value(Path::new(&string("log-file", v)?)));
        }

        Ok(layer)
    }

    /// Fields set in `self` win over `base`.
    pub fn over(self, base: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            endpoint: self.endpoint.or(base.endpoint),
            title: self.title.or(base.title),
            source: self.source.or(base.source),
            request_timeout: self.request_timeout.or(base.request_timeout),
            auto_reset: self.auto_reset.or(base.auto_reset),
            color: self.color.or(base.color),
            log_level: self.log_level.or(base.log_level),
            log_format: self.log_format.or(base.log_format),
            log_file: self.log_file.or(base.log_file),
        }
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: "endpoint".to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(format!("'{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!(
            "scheme '{}' is not supported, use http or https",
            other
        ))),
    }
}

impl ScannerConfig {
    pub fn resolve(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let endpoint = layer.endpoint.ok_or(ConfigError::MissingEndpoint)?;
        let title = layer
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Ok(Self {
            endpoint: parse_endpoint(&endpoint)?,
            title,
            source: layer.source,
            request_timeout: layer
                .request_timeout
                .filter(|s| *s > 0)
                .map(Duration::from_secs),
            auto_reset: layer.auto_reset.filter(|s| *s > 0).map(Duration::from_secs),
            color: layer.color,
            log_level: layer.log_level,
            log_format: layer.log_format,
            log_file: layer.log_file.flatten(),
        })
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Teamscan").join("teamscan.toml"))
}

/// Load the configuration table, if any.
///
/// An explicit path must exist; the default path is used only when present.
pub async fn load_config_file(
    config_file: Option<&Path>,
) -> Result<Option<toml::Table>, ConfigError> {
    let path = match config_file {
        Some(path) if !path.exists() => {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    log::debug!("Loading configuration from {}", path.display());
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    toml::from_str::<toml::Table>(&contents)
        .map(Some)
        .map_err(|e| ConfigError::Parse {
            path,
            reason: e.to_string(),
        })
}

/// Resolve all layers for the given command line.
pub async fn resolve_settings(args: &Args) -> Result<ScannerConfig, ConfigError> {
    let file_layer = match load_config_file(args.config_file.as_deref()).await? {
        Some(table) => ConfigLayer::from_toml(&table)?,
        None => ConfigLayer::default(),
    };
    ScannerConfig::resolve(ConfigLayer::from_args(args).over(file_layer))
}

/// Decide whether to emit ANSI colour: an explicit choice wins, otherwise
/// colour is on for a terminal unless `NO_COLOR` is set.
pub fn use_color(explicit: Option<bool>, is_terminal: bool) -> bool {
    match explicit {
        Some(choice) => choice,
        None => is_terminal && std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty()),
    }
}
