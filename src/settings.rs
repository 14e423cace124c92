//! User settings, stored as JSON under the platform config directory.

use crate::constants::{
    API_URL_ENV, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_BRUSH_SIZE,
    DEFAULT_STROKE_COLOR,
};
use crate::error::SettingsError;
use crate::types::{Brush, BrushKind};
use crate::wire::IdPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Location of the settings file, if the platform has a config directory.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("notecanvas").join("settings.json"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    pub color: String,
    pub width: f32,
    pub kind: String,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: DEFAULT_STROKE_COLOR.to_string(),
            width: DEFAULT_BRUSH_SIZE,
            kind: BrushKind::Pen.as_str().to_string(),
        }
    }
}

impl BrushSettings {
    pub fn to_brush(&self) -> Brush {
        Brush {
            color: self.color.clone(),
            width: if self.width > 0.0 {
                self.width
            } else {
                DEFAULT_BRUSH_SIZE
            },
            kind: BrushKind::from_name(&self.kind),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub id_policy: IdPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub brush: BrushSettings,
    pub canvas: CanvasSettings,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            brush: BrushSettings::default(),
            canvas: CanvasSettings::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load from the default location, falling back to defaults, then apply
    /// environment overrides.
    pub fn load() -> Self {
        let mut settings = match default_settings_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable settings");
                Self::default()
            }),
            _ => Self::default(),
        };
        settings.apply_env_overrides();
        settings
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        match default_settings_path() {
            Some(path) => self.save_to(&path),
            None => Err(SettingsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no config directory on this platform",
            ))),
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_api_url_override(std::env::var(API_URL_ENV).ok());
    }

    fn apply_api_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }
}
