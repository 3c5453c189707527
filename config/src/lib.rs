//! Configuration for ticketwall.
//!
//! Loaded from `~/.ticketwall/config.toml` (or the path in `TICKETWALL_CONFIG`).
//! Every field is optional; a missing file yields the defaults.
//!
//! ```toml
//! [api]
//! url = "https://tickets.example.com/buscarchamado"
//! poll_interval_ms = 5000
//! timeout_secs = 10
//! max_retries = 2
//! token = "${TICKETWALL_TOKEN}"
//!
//! [app]
//! title = "Support queue"
//! high_contrast = false
//! ascii_only = false
//! reduced_motion = false
//!
//! [display]
//! highlight_ms = 2000
//! scroll_step_ms = 400
//! ```

use serde::Deserialize;
use std::{env, fmt, fs, io, path::Path, path::PathBuf, time::Duration};
use thiserror::Error;

use ticketwall_types::ui::UiOptions;

pub const DEFAULT_API_URL: &str = "http://api-tomticket.hasarbrasil.com.br/buscarchamado";
pub const DEFAULT_TITLE: &str = "Support tickets";

/// Env var naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "TICKETWALL_CONFIG";
pub const API_URL_ENV: &str = "TICKETWALL_API_URL";
pub const POLL_INTERVAL_ENV: &str = "TICKETWALL_POLL_INTERVAL_MS";

const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
const MIN_POLL_INTERVAL_MS: u64 = 500;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_HIGHLIGHT_MS: u64 = 2_000;
const DEFAULT_SCROLL_STEP_MS: u64 = 400;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Header text.
    pub title: String,
    /// Use ASCII-only glyphs for borders and markers.
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    pub high_contrast: bool,
    /// Disable blinking highlights and auto-scroll.
    pub reduced_motion: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            ascii_only: false,
            high_contrast: false,
            reduced_motion: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Sent as a bearer token when present.
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            token: None,
        }
    }
}

// Manual Debug impl to prevent leaking the token in logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field(
                "token",
                &if self.token.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .finish()
    }
}

impl ApiConfig {
    /// Poll period, floored so a typo cannot hammer the API.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How long a category tile blinks after its count grows.
    pub highlight_ms: u64,
    /// Time per row of open-ticket auto-scroll.
    pub scroll_step_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            highlight_ms: DEFAULT_HIGHLIGHT_MS,
            scroll_step_ms: DEFAULT_SCROLL_STEP_MS,
        }
    }
}

impl DisplayConfig {
    #[must_use]
    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    #[must_use]
    pub fn scroll_step(&self) -> Duration {
        Duration::from_millis(self.scroll_step_ms.max(1))
    }
}

/// Replace `${VAR}` references using `lookup`. Unknown variables expand to "".
pub fn expand_vars_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + end_rel];
        if !var.is_empty() {
            out.push_str(&lookup(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }

    out.push_str(rest);
    out
}

impl DashboardConfig {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|name| env::var(name).ok())
    }

    /// [`DashboardConfig::load`] with environment reads going through `lookup`.
    ///
    /// A config file that does not exist yields defaults; env overrides still apply.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path(&lookup) {
            Some(path) if path.exists() => Self::load_from(&path)?,
            Some(path) => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env(lookup);
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {}: {}", path.display(), source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {}: {}", path.display(), source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Apply env overrides and expand `${VAR}` references in `url` and `token`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.url = url;
        }
        if let Some(raw) = lookup(POLL_INTERVAL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.api.poll_interval_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid {POLL_INTERVAL_ENV}: {raw}"),
            }
        }

        self.api.url = expand_vars_with(&self.api.url, &lookup).trim().to_string();
        self.api.token = self
            .api
            .token
            .as_deref()
            .map(|t| expand_vars_with(t, &lookup).trim().to_string())
            .filter(|t| !t.is_empty());
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        UiOptions {
            ascii_only: self.app.ascii_only,
            high_contrast: self.app.high_contrast,
            reduced_motion: self.app.reduced_motion,
        }
    }
}

/// `$TICKETWALL_CONFIG`, else `~/.ticketwall/config.toml`.
fn config_path<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    config_dir().map(|dir| dir.join("config.toml"))
}

/// `~/.ticketwall`, home of the config file and logs.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ticketwall"))
}
