use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The name of the configuration file, relative to the root directory.
pub const CONFIG_FILE: &str = "shortages.toml";

/// Configuration for the shortage tool.
///
/// The file is optional; when it is absent every setting takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Path of the data file, relative to the root directory.
    data_file: PathBuf,

    /// The user name that is granted admin rights.
    ///
    /// Compared case-insensitively against the acting user.
    admin_user: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            admin_user: default_admin_user(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration from `root`, using the defaults only when
    /// there is no configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(root: &Path) -> Result<Self, String> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the data file path, relative to the root directory.
    #[must_use]
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Returns the name of the admin user.
    #[must_use]
    pub fn admin_user(&self) -> &str {
        &self.admin_user
    }

    /// Sets the data file path.
    pub fn set_data_file(&mut self, path: PathBuf) {
        self.data_file = path;
    }

    /// Sets the name of the admin user.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank.
    pub fn set_admin_user(&mut self, name: &str) -> Result<(), String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("admin user must not be empty".to_string());
        }
        name.clone_into(&mut self.admin_user);
        Ok(())
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("shortages.json")
}

fn default_admin_user() -> String {
    "admin".to_string()
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_data_file")]
        data_file: PathBuf,

        #[serde(default = "default_admin_user")]
        admin_user: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                data_file,
                admin_user,
            } => Self {
                data_file,
                admin_user,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            data_file: config.data_file,
            admin_user: config.admin_user,
        }
    }
}
