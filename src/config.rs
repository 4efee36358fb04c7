//! Configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the settings file.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("failed to parse settings: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Locations of the three flat-file stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePaths {
    /// Customers store.
    pub customers: PathBuf,
    /// Rooms store.
    pub rooms: PathBuf,
    /// Bookings store.
    pub bookings: PathBuf,
}

impl StorePaths {
    /// Conventional store file names inside the given data directory.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        StorePaths {
            customers: dir.join("customers.txt"),
            rooms: dir.join("rooms.txt"),
            bookings: dir.join("bookings.txt"),
        }
    }
}

impl Default for StorePaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

/// Administrator credentials for the admin menu.
///
/// A placeholder, not a security boundary: the pair is compared in plain
/// text, exactly like customer passwords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    /// Admin login identifier.
    pub identifier: String,
    /// Admin password.
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        AdminCredentials {
            identifier: "admin".to_string(),
            password: "adminpass".to_string(),
        }
    }
}

impl AdminCredentials {
    /// Check a submitted credential pair against this one.
    #[must_use]
    pub fn matches(&self, identifier: &str, password: &str) -> bool {
        self.identifier == identifier && self.password == password
    }
}

/// Full application settings: store locations plus admin credentials.
///
/// Constructed once at startup and passed into the session; there is no
/// ambient global state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Flat-file store locations.
    pub stores: StorePaths,
    /// Admin menu credentials.
    pub admin: AdminCredentials,
}

impl Settings {
    /// Load settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Ok(serde_norway::from_str(&contents)?)
    }
}
