use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{ConfigError, Result};

/// Site layout configuration. All paths are relative to `site_root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_site_root")]
    pub site_root: PathBuf,

    #[serde(default = "default_catalog_file")]
    pub catalog_file: PathBuf,

    #[serde(default = "default_feed_file")]
    pub feed_file: PathBuf,

    #[serde(default = "default_articles_dir")]
    pub articles_dir: PathBuf,

    #[serde(default = "default_index_page")]
    pub index_page: PathBuf,

    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::NotFound(path.as_ref().display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load the config at `path` if given, otherwise the default config file
    /// if it exists, otherwise built-in defaults rooted at the current dir.
    pub fn resolve(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => {
                let default_path = Self::config_dir()?.join("config.toml");
                if default_path.exists() {
                    Self::load_with_env(default_path)
                } else {
                    let mut config = Self::default();
                    config.apply_env_overrides();
                    Ok(config)
                }
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("SITE_FEED_ROOT") {
            self.site_root = PathBuf::from(root);
        }
        if let Ok(locale) = std::env::var("SITE_FEED_LOCALE") {
            self.locale = locale;
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.site_root.join(&self.catalog_file)
    }

    pub fn feed_path(&self) -> PathBuf {
        self.site_root.join(&self.feed_file)
    }

    pub fn articles_path(&self) -> PathBuf {
        self.site_root.join(&self.articles_dir)
    }

    pub fn index_path(&self) -> PathBuf {
        self.site_root.join(&self.index_page)
    }

    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("site-feed"))
            .ok_or_else(|| ConfigError::Invalid("Could not determine config directory".to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_root: default_site_root(),
            catalog_file: default_catalog_file(),
            feed_file: default_feed_file(),
            articles_dir: default_articles_dir(),
            index_page: default_index_page(),
            locale: default_locale(),
        }
    }
}

fn default_site_root() -> PathBuf { PathBuf::from(".") }
fn default_catalog_file() -> PathBuf { PathBuf::from("articles/metadata.json") }
fn default_feed_file() -> PathBuf { PathBuf::from("rss.xml") }
fn default_articles_dir() -> PathBuf { PathBuf::from("articles") }
fn default_index_page() -> PathBuf { PathBuf::from("index.html") }
fn default_locale() -> String { "en".to_string() }
