use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::normalize_url;

pub const DEFAULT_API_URL: &str = "https://bookingenginebackend.onrender.com/api/bookings";
pub const API_URL_ENV: &str = "BOOKING_ADMIN_API_URL";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("no configuration directory available")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The booking collection resource, e.g. `https://host/api/bookings`.
    pub api_url: String,
    /// Overrides the default `{api_url}/login`.
    pub login_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            login_url: None,
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        let proj = ProjectDirs::from("com", "example", "BookingAdmin")?;
        Some(proj.config_dir().join("settings.toml"))
    }

    /// Reads the settings file, falling back to defaults when it is missing or
    /// broken, then applies the environment override.
    pub fn load() -> Self {
        let mut settings = match Self::default_path() {
            Some(path) => Self::read(&path).unwrap_or_else(|e| {
                log::warn!("using default settings: {}", e);
                Self::default()
            }),
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            settings.api_url = url;
        }
        settings.normalized()
    }

    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::default_path().ok_or(SettingsError::NoConfigDir)?;
        self.write(&path)
    }

    pub fn write(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(io_err)
    }

    pub fn normalized(self) -> Self {
        Self {
            api_url: normalize_url(&self.api_url),
            login_url: self
                .login_url
                .map(|url| normalize_url(&url))
                .filter(|url| !url.is_empty()),
        }
    }
}
