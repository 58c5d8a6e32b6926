use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};

use crate::catalog::ExclusionSet;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Source playlist URIs or ids that are never migrated
    #[serde(default)]
    excluded_playlists: Vec<String>,
    pub tidal: TidalConfig,
    pub spotify: SpotifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidalConfig {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub refresh_token: String,
    /// Overrides the country reported by the session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .context(format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("playlist-migrator").join("config.toml"))
    }

    /// Load config from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path().ok_or(eyre!("Config file not found"))?;

        Self::from_file(&config_path)
    }

    /// Write a template config to the default path, unless one already exists.
    /// Returns the path that was written.
    pub fn create_default() -> Result<PathBuf> {
        let config_path = Self::config_path().ok_or(eyre!("No config directory available"))?;
        Self::write_template(&config_path)?;
        Ok(config_path)
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(eyre!("Config file already exists: {}", path.display()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(&Self::template())
            .context("Failed to serialize default config")?;
        std::fs::write(path, contents)
            .context(format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    fn template() -> Self {
        Self {
            excluded_playlists: Vec::new(),
            tidal: TidalConfig {
                client_id: String::new(),
                client_secret: None,
                refresh_token: String::new(),
                country_code: None,
            },
            spotify: SpotifyConfig {
                client_id: String::new(),
                client_secret: String::new(),
                refresh_token: String::new(),
            },
        }
    }

    /// Source playlist ids to skip, with any `service:kind:` prefix removed
    pub fn exclusion_set(&self) -> ExclusionSet {
        ExclusionSet::from_entries(&self.excluded_playlists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
excluded_playlists = ["tidal:playlist:0f1e2d3c-aaaa", "spotify:playlist:37i9dQZF1", "plain"]

[tidal]
client_id = "tidal-client"
refresh_token = "tidal-refresh"
country_code = "NO"

[spotify]
client_id = "spotify-client"
client_secret = "spotify-secret"
refresh_token = "spotify-refresh"
"#;

    #[test]
    fn test_parses_sample() {
        let config = Config::from_toml(SAMPLE).unwrap();

        assert_eq!(config.tidal.client_id, "tidal-client");
        assert!(config.tidal.client_secret.is_none());
        assert_eq!(config.tidal.country_code.as_deref(), Some("NO"));
        assert_eq!(config.spotify.client_secret, "spotify-secret");
    }

    #[test]
    fn test_exclusion_set_from_config() {
        let config = Config::from_toml(SAMPLE).unwrap();
        let exclusions = config.exclusion_set();

        assert_eq!(exclusions.len(), 3);
        assert!(exclusions.contains("0f1e2d3c-aaaa"));
        assert!(exclusions.contains("37i9dQZF1"));
        assert!(exclusions.contains("plain"));
    }

    #[test]
    fn test_excluded_playlists_is_optional() {
        let without_exclusions = SAMPLE
            .lines()
            .filter(|line| !line.starts_with("excluded_playlists"))
            .collect::<Vec<_>>()
            .join("\n");
        let config = Config::from_toml(&without_exclusions).unwrap();

        assert!(config.exclusion_set().is_empty());
    }

    #[test]
    fn test_missing_section_is_an_error() {
        let result = Config::from_toml("[tidal]\nclient_id = \"x\"\nrefresh_token = \"y\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let error = Config::from_file(&path).unwrap_err();
        assert!(format!("{:?}", error).contains("missing.toml"));
    }

    #[test]
    fn test_write_template_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::write_template(&path).unwrap();
        let config = Config::from_file(&path).unwrap();

        assert!(config.exclusion_set().is_empty());
        assert!(Config::write_template(&path).is_err());
    }
}
