use crate::models::{Catalog, CatalogConfig, UserConfig};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;

/// Configuration manager for loading and saving YAML configuration files.
///
/// Manages two files under the data directory:
/// - User config (`HashPilot Settings.yaml`): hashcat executable, last-used
///   form values
/// - Catalog config (`HashPilot Catalog.yaml`): hash type and attack mode
///   combo catalogs
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    user_config_path: Utf8PathBuf,
    catalog_config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager rooted at the given directory, creating
    /// the directory when missing.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            user_config_path: config_dir.join("HashPilot Settings.yaml"),
            catalog_config_path: config_dir.join("HashPilot Catalog.yaml"),
            config_dir,
        })
    }

    /// Load the user configuration file, or defaults if it doesn't exist.
    pub fn load_user_config(&self) -> Result<UserConfig> {
        if !self.user_config_path.exists() {
            tracing::warn!(
                "User config file not found at {}, using defaults",
                self.user_config_path
            );
            return Ok(UserConfig::default());
        }

        let file_contents = fs::read_to_string(&self.user_config_path)
            .with_context(|| format!("Failed to read user config: {}", self.user_config_path))?;

        let config: UserConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse user config: {}", self.user_config_path))?;

        tracing::info!("Loaded user config from {}", self.user_config_path);
        Ok(config)
    }

    /// Save the user configuration file.
    pub fn save_user_config(&self, config: &UserConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize user config to YAML")?;

        fs::write(&self.user_config_path, yaml_string)
            .with_context(|| format!("Failed to write user config: {}", self.user_config_path))?;

        tracing::info!("Saved user config to {}", self.user_config_path);
        Ok(())
    }

    /// Load the catalog configuration file, or the built-in default catalog
    /// if it doesn't exist.
    pub fn load_catalog_config(&self) -> Result<CatalogConfig> {
        if !self.catalog_config_path.exists() {
            tracing::warn!(
                "Catalog config file not found at {}, using defaults",
                self.catalog_config_path
            );
            return Ok(Self::default_catalog_config());
        }

        let file_contents = fs::read_to_string(&self.catalog_config_path).with_context(|| {
            format!("Failed to read catalog config: {}", self.catalog_config_path)
        })?;

        let config: CatalogConfig = serde_yaml_ng::from_str(&file_contents).with_context(|| {
            format!("Failed to parse catalog config: {}", self.catalog_config_path)
        })?;

        tracing::info!("Loaded catalog config from {}", self.catalog_config_path);
        Ok(config)
    }

    /// Save the catalog configuration file.
    pub fn save_catalog_config(&self, config: &CatalogConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(config)
            .context("Failed to serialize catalog config to YAML")?;

        fs::write(&self.catalog_config_path, yaml_string).with_context(|| {
            format!("Failed to write catalog config: {}", self.catalog_config_path)
        })?;

        tracing::info!("Saved catalog config to {}", self.catalog_config_path);
        Ok(())
    }

    /// Built-in combo catalogs: the classic small option sets, in display
    /// order. Hash type codes are hashcat's own identifiers.
    pub fn default_catalog_config() -> CatalogConfig {
        let mut hash_types = IndexMap::new();
        hash_types.insert(0, "MD5".to_string());
        hash_types.insert(100, "SHA1".to_string());
        hash_types.insert(2500, "WPA/WPA2".to_string());
        hash_types.insert(1400, "SHA256".to_string());
        hash_types.insert(1800, "SHA512".to_string());

        let mut attack_modes = IndexMap::new();
        attack_modes.insert(0, "Straight (Dictionary)".to_string());
        attack_modes.insert(3, "Brute Force".to_string());
        attack_modes.insert(6, "Hybrid (Dict + Mask)".to_string());

        CatalogConfig {
            catalog: Catalog {
                hash_types,
                attack_modes,
            },
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
