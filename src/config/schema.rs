use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::payload::fields;
use crate::payload::FormFields;
use crate::preview::{EccLevel, FillStyle};
use crate::upload::UploadRules;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub uploads: UploadRules,
}

impl Config {
    /// Load config from `path`, or from the user config dir when none is
    /// given. A missing file yields the defaults.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path,
            None => default_config_path(),
        };
        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str(&contents)
                .map_err(|error| ConfigError::Load(format!("{}: {error}", path.display())))?
        } else {
            Self::default()
        };
        config.config_path = path;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load(Some(path.to_path_buf()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.service.base_url).map_err(|error| {
            ConfigError::Validation(format!(
                "invalid base_url {}: {error}",
                self.service.base_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "base_url must be http(s), got {}",
                url.scheme()
            )));
        }
        if !(64..=4096).contains(&self.preview.size_px) {
            return Err(ConfigError::Validation(format!(
                "preview.size_px {} out of range (64-4096)",
                self.preview.size_px
            )));
        }
        for (kind, rules) in [
            ("pdf", &self.uploads.pdf),
            ("mp3", &self.uploads.mp3),
            ("image", &self.uploads.image),
            ("logo", &self.uploads.logo),
        ] {
            if rules.mime_types.is_empty() && rules.extensions.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "uploads.{kind} accepts nothing: both allow-lists are empty"
                )));
            }
        }
        Ok(())
    }
}

// ── Rendering service ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the rendering service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

// ── Preview pipeline ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Quiet window before a render request fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_preview_size_px")]
    pub size_px: u32,

    #[serde(default)]
    pub ecc: EccLevel,

    #[serde(default)]
    pub fill_style: FillStyle,

    #[serde(default = "default_fill_color")]
    pub fill_color: String,

    #[serde(default = "default_back_color")]
    pub back_color: String,

    #[serde(default = "default_fill_color2")]
    pub fill_color2: String,
}

impl PreviewConfig {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Seed a fresh form with these render settings, the way the page
    /// arrives pre-filled.
    #[must_use]
    pub fn seed_form(&self) -> FormFields {
        let mut form = FormFields::new();
        form.set_text(fields::SIZE_PX, self.size_px.to_string());
        form.set_text(fields::ECC, self.ecc.to_string());
        form.set_text(fields::FILL_STYLE, self.fill_style.to_string());
        form.set_text(fields::FILL_COLOR, &self.fill_color);
        form.set_text(fields::BACK_COLOR, &self.back_color);
        form.set_text(fields::FILL_COLOR2, &self.fill_color2);
        form
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            size_px: default_preview_size_px(),
            ecc: EccLevel::default(),
            fill_style: FillStyle::default(),
            fill_color: default_fill_color(),
            back_color: default_back_color(),
            fill_color2: default_fill_color2(),
        }
    }
}

// ── Defaults ──────────────────────────────────────────────────────

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_owned()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_preview_size_px() -> u32 {
    512
}

fn default_fill_color() -> String {
    "#000".to_owned()
}

fn default_back_color() -> String {
    "#fff".to_owned()
}

fn default_fill_color2() -> String {
    "#000000".to_owned()
}

fn default_config_path() -> PathBuf {
    ProjectDirs::from("", "", "qrstudio")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("qrstudio.toml"))
}
