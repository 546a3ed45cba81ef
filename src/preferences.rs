use crate::config::Server;
use crate::error::AppError;
use crate::view::RoleFilter;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Last role and server picked in `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub role: RoleFilter,
    pub server: Server,
}

// Stored as raw strings so a hand-edited or outdated file still loads.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    server: Option<String>,
}

impl From<StoredPreferences> for Preferences {
    fn from(stored: StoredPreferences) -> Self {
        Preferences {
            role: stored
                .role
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            server: stored
                .server
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
        }
    }
}

pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PreferenceStore { path: path.into() }
    }

    pub fn default_location() -> Self {
        let dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".crown_meta");
        Self::new(dir.join("preferences.json"))
    }

    /// Never fails: unreadable files and unknown values fall back to defaults.
    pub fn load(&self) -> Preferences {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Preferences::default(),
        };

        match serde_json::from_str::<StoredPreferences>(&content) {
            Ok(stored) => stored.into(),
            Err(e) => {
                warn!("ignoring unreadable preferences {}: {}", self.path.display(), e);
                Preferences::default()
            }
        }
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::ConfigError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let stored = StoredPreferences {
            role: Some(preferences.role.to_string()),
            server: Some(preferences.server.to_string()),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| AppError::JsonError(format!("Failed to serialize preferences: {}", e)))?;

        fs::write(&self.path, json).map_err(|e| {
            AppError::ConfigError(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}
