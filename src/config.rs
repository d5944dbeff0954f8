//! User configuration loaded from vidcat.toml

use colored::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Override for the directory holding the session store
    pub data_dir: Option<PathBuf>,
    /// Default title for exported reports
    pub export_title: Option<String>,
}

impl Config {
    /// Load configuration, falling back to defaults when the file is
    /// missing or unparsable. A bad config file never blocks the CLI.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Config::default();
        };
        match fs::read_to_string(&path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!(
                        "{} ignoring invalid config {}: {}",
                        "Warning:".yellow(),
                        path.display(),
                        err
                    );
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "vidcat").map(|dirs| dirs.config_dir().join("vidcat.toml"))
    }

    /// Session store location: `VIDCAT_DATA_DIR`, then the config
    /// override, then the platform data directory.
    pub fn sessions_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var("VIDCAT_DATA_DIR") {
            return PathBuf::from(dir).join("sessions");
        }
        if let Some(dir) = &self.data_dir {
            return dir.join("sessions");
        }
        ProjectDirs::from("", "", "vidcat")
            .map(|dirs| dirs.data_dir().join("sessions"))
            .unwrap_or_else(|| PathBuf::from("sessions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            data_dir = "/tmp/vidcat-data"
            export_title = "My Library"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/vidcat-data")));
        assert_eq!(config.export_title.as_deref(), Some("My Library"));
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.data_dir.is_none());
        assert!(config.export_title.is_none());
    }

    #[test]
    fn test_sessions_dir_honours_data_dir_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/vidcat-data")),
            export_title: None,
        };
        // Env override takes precedence in sessions_dir, so only assert
        // when the variable is not set in this environment.
        if std::env::var("VIDCAT_DATA_DIR").is_err() {
            assert_eq!(
                config.sessions_dir(),
                PathBuf::from("/tmp/vidcat-data/sessions")
            );
        }
    }
}
