use std::path::{Path, PathBuf};

use shortages::{Config, domain::CONFIG_FILE};
use tracing::instrument;

use crate::cli::terminal::Tone;

#[derive(Debug, clap::Parser)]
/// Show or modify configuration
///
/// Configuration is stored in shortages.toml in the root directory.
///
/// Available configuration keys:
///   `data_file`   Data file path, relative to the root (default:
/// shortages.json)
///   `admin_user`  User name granted admin rights (default: admin)
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show all configuration values
    Show,

    /// Get a specific configuration value
    Get {
        /// Configuration key to retrieve
        key: Key,
    },

    /// Set a configuration value
    ///
    /// Examples:
    ///   shortages config set `admin_user` office-manager
    ///   shortages config set `data_file` data/requests.json
    Set {
        /// Configuration key to set
        key: Key,

        /// Value to set
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
enum Key {
    DataFile,
    AdminUser,
}

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);
        let mut config = Config::load_or_default(root).map_err(|e| anyhow::anyhow!("{e}"))?;

        match self.command {
            ConfigCommand::Show => {
                println!("Configuration:");
                println!("  data_file: {}", config.data_file().display());
                println!("  admin_user: {}", config.admin_user());
                if !config_path.exists() {
                    println!("{}", Tone::Muted.paint("  (defaults, no shortages.toml found)"));
                }
            }
            ConfigCommand::Get { key } => println!("{}", value_of(&config, key)),
            ConfigCommand::Set { key, value } => {
                set(&mut config, key, &value)?;
                config.save(&config_path).map_err(|e| anyhow::anyhow!("{e}"))?;
                println!(
                    "{}",
                    Tone::Success.paint(&format!(
                        "Set {} to {}",
                        key_name(key),
                        value_of(&config, key)
                    ))
                );
            }
        }
        Ok(())
    }
}

const fn key_name(key: Key) -> &'static str {
    match key {
        Key::DataFile => "data_file",
        Key::AdminUser => "admin_user",
    }
}

fn value_of(config: &Config, key: Key) -> String {
    match key {
        Key::DataFile => config.data_file().display().to_string(),
        Key::AdminUser => config.admin_user().to_string(),
    }
}

fn set(config: &mut Config, key: Key, value: &str) -> anyhow::Result<()> {
    match key {
        Key::DataFile => {
            let value = value.trim();
            if value.is_empty() {
                anyhow::bail!("data_file must not be empty");
            }
            config.set_data_file(PathBuf::from(value));
        }
        Key::AdminUser => config
            .set_admin_user(value)
            .map_err(|e| anyhow::anyhow!("{e}"))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn set_writes_config_file() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();

        Command {
            command: ConfigCommand::Set {
                key: Key::AdminUser,
                value: "manager".to_string(),
            },
        }
        .run(root)
        .unwrap();

        let config = Config::load(&root.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.admin_user(), "manager");
        assert_eq!(config.data_file(), Path::new("shortages.json"));
    }

    #[test]
    fn set_rejects_blank_values() {
        let mut config = Config::default();
        assert!(set(&mut config, Key::DataFile, " ").is_err());
        assert!(set(&mut config, Key::AdminUser, "").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn show_without_file_uses_defaults() {
        let tmp = tempdir().unwrap();
        Command {
            command: ConfigCommand::Show,
        }
        .run(tmp.path())
        .unwrap();
        assert!(!tmp.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn malformed_file_is_not_overwritten() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        let original = "_version = \"1\"\nadmin_user = \"boss\"\ntypo = [\n";
        std::fs::write(&path, original).unwrap();

        let result = Command {
            command: ConfigCommand::Set {
                key: Key::DataFile,
                value: "office.json".to_string(),
            },
        }
        .run(tmp.path());

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn value_of_reads_each_key() {
        let config = Config::default();
        assert_eq!(value_of(&config, Key::DataFile), "shortages.json");
        assert_eq!(value_of(&config, Key::AdminUser), "admin");
    }
}
