//! Configuration management for gigtask.
//!
//! Settings are stored as pretty-printed JSON in the per-user data directory
//! and edited through an interactive wizard (`gigtask init`).
//!
//! ## Configuration Structure
//!
//! - **Display**: whether lists show the Completed section and which filter
//!   `gigtask list` starts from
//! - **Storage**: optional override of the SQLite database location
//!
//! Both sections are optional; an absent section means defaults.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use gigtask::libs::config::Config;
//!
//! let config = Config::read()?;
//! let filter = config.default_filter();
//! let db_path = config.database_path()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use super::filter::{Filter, PriorityFilter, StatusFilter};
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_FILE_NAME: &str = "gigtask.db";

/// Entry in the module picker of the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// How task lists are presented.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    /// Show the Completed section when the status filter allows it.
    pub show_completed: bool,

    /// Filter applied by `gigtask list` when no flag overrides it.
    #[serde(default)]
    pub default_filter: Filter,
}

/// Where tasks and accounts are persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct StorageConfig {
    /// Database file; the data directory is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            show_completed: true,
            default_filter: Filter::default(),
        }
    }
}

impl Config {
    /// Loads the configuration, or the default one when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn display(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }

    pub fn default_filter(&self) -> Filter {
        self.display().default_filter
    }

    /// Resolved database location.
    pub fn database_path(&self) -> Result<PathBuf> {
        match self.storage.as_ref().and_then(|s| s.database.clone()) {
            Some(path) => Ok(path),
            None => DataStorage::new().get_path(DB_FILE_NAME),
        }
    }

    /// Interactive setup wizard, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "display".to_string(),
                name: "Display".to_string(),
            },
            ConfigModule {
                key: "storage".to_string(),
                name: "Storage".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "display" => {
                    let default = config.display();
                    msg_print!(Message::ConfigModuleDisplay);
                    config.display = Some(DisplayConfig {
                        show_completed: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptShowCompleted.to_string())
                            .default(default.show_completed)
                            .interact()?,
                        default_filter: Filter::new(
                            Input::<PriorityFilter>::with_theme(&ColorfulTheme::default())
                                .with_prompt(Message::PromptDefaultPriority.to_string())
                                .default(default.default_filter.priority)
                                .interact_text()?,
                            Input::<StatusFilter>::with_theme(&ColorfulTheme::default())
                                .with_prompt(Message::PromptDefaultStatus.to_string())
                                .default(default.default_filter.status)
                                .interact_text()?,
                        ),
                    });
                }
                "storage" => {
                    let default = config.storage.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleStorage);
                    let database: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptDatabasePath.to_string())
                        .default(default.database.map(|p| p.display().to_string()).unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    config.storage = Some(StorageConfig {
                        database: Some(database.trim()).filter(|p| !p.is_empty()).map(PathBuf::from),
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
