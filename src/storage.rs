use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SESSION_FILE: &str = "session.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    auth_token: Option<String>,
}

/// Keeps the admin's bearer token across restarts, under the `auth_token` key
/// of a small TOML file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/session.toml`, or `None` when the platform has no home.
    pub fn default_location() -> Option<Self> {
        let proj = ProjectDirs::from("com", "example", "BookingAdmin")?;
        Some(Self::new(proj.data_dir().join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<String> {
        let text = fs::read_to_string(&self.path).ok()?;
        match toml::from_str::<SessionFile>(&text) {
            Ok(file) => file.auth_token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("ignoring unreadable session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, token: &str) -> io::Result<()> {
        self.write(&SessionFile {
            auth_token: Some(token.to_string()),
        })
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn write(&self, file: &SessionFile) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(file)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)
    }
}
