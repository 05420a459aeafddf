//! # Configuration
//!
//! Client configuration is a [`confique`] struct layered from, in priority
//! order:
//! 1. **Environment variables**: `BLOG_API_URL`, `BLOG_PAGE_SIZE`, ...
//! 2. **Config file**: `blog.toml` in the OS config directory, or the file
//!    named by `BLOG_CONFIG`.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `api_url` | `http://localhost:8080/api` | Base URL of the blog API |
//! | `page_size` | `6` | Posts per page on the home listing |
//! | `admin_page_size` | `10` | Posts per page in the admin panel |
//! | `excerpt_chars` | `150` | Plain-text excerpt length in listings |
//!
//! ## Paths
//!
//! Client state lives in the OS data directory (via the `directories` crate)
//! unless `BLOG_DATA_DIR` points elsewhere. See [`BlogPaths::resolve`].

use crate::error::{BlogError, Result};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const CONFIG_FILE: &str = "blog.toml";

/// Configuration for the blog client, stored in `blog.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BlogConfig {
    /// Base URL of the blog API.
    #[config(env = "BLOG_API_URL", default = "http://localhost:8080/api")]
    pub api_url: String,

    /// Posts per page on the home listing.
    #[config(env = "BLOG_PAGE_SIZE", default = 6)]
    pub page_size: u32,

    /// Posts per page in the admin panel.
    #[config(env = "BLOG_ADMIN_PAGE_SIZE", default = 10)]
    pub admin_page_size: u32,

    /// Characters of plain text shown per post in listings.
    #[config(default = 150)]
    pub excerpt_chars: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 6,
            admin_page_size: 10,
            excerpt_chars: 150,
        }
    }
}

impl BlogConfig {
    /// Loads environment and file layers over the defaults. A missing file is
    /// not an error.
    pub fn load(file: &Path) -> Result<Self> {
        let config = BlogConfig::builder()
            .env()
            .file(file)
            .load()
            .map_err(|e| BlogError::Config(e.to_string()))?;
        config.validated()
    }

    /// The API base without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    fn validated(self) -> Result<Self> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(BlogError::Config(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.page_size == 0 || self.admin_page_size == 0 {
            return Err(BlogError::Config("page sizes must be positive".into()));
        }
        Ok(self)
    }
}

/// Where the client keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPaths {
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
}

impl BlogPaths {
    /// Resolution order for each path: explicit override, environment
    /// variable (`BLOG_DATA_DIR`, `BLOG_CONFIG`), OS default.
    pub fn resolve(data_override: Option<PathBuf>, config_override: Option<PathBuf>) -> Result<Self> {
        let env_path = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        let data_dir = data_override.or_else(|| env_path("BLOG_DATA_DIR"));
        let config_file = config_override.or_else(|| env_path("BLOG_CONFIG"));

        if let (Some(data_dir), Some(config_file)) = (&data_dir, &config_file) {
            return Ok(Self {
                data_dir: data_dir.clone(),
                config_file: config_file.clone(),
            });
        }

        let dirs = ProjectDirs::from("com", "blog", "blog")
            .ok_or_else(|| BlogError::Config("could not determine home directory".into()))?;
        Ok(Self {
            data_dir: data_dir.unwrap_or_else(|| dirs.data_dir().to_path_buf()),
            config_file: config_file.unwrap_or_else(|| dirs.config_dir().join(CONFIG_FILE)),
        })
    }

    /// Everything under one directory; used by tests and `--data`.
    pub fn under(root: &Path) -> Self {
        Self {
            data_dir: root.to_path_buf(),
            config_file: root.join(CONFIG_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.page_size, 6);
        assert_eq!(config.admin_page_size, 10);
        assert_eq!(config.excerpt_chars, 150);
    }

    #[test]
    fn test_api_base_trims_slash() {
        let config = BlogConfig {
            api_url: "https://blog.example.com/api/".into(),
            ..Default::default()
        };
        assert_eq!(config.api_base(), "https://blog.example.com/api");
    }

    #[test]
    fn test_file_layer() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(CONFIG_FILE);
        std::fs::write(&file, "page_size = 3\nexcerpt_chars = 80\n").unwrap();

        let config = BlogConfig::load(&file).unwrap();
        assert_eq!(config.page_size, 3);
        assert_eq!(config.excerpt_chars, 80);
        assert_eq!(config.admin_page_size, 10);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(CONFIG_FILE);
        std::fs::write(&file, "page_size = 0\n").unwrap();
        assert!(matches!(BlogConfig::load(&file), Err(BlogError::Config(_))));
    }

    #[test]
    fn test_bad_url_rejected() {
        let config = BlogConfig {
            api_url: "localhost:8080".into(),
            ..Default::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_paths_under() {
        let paths = BlogPaths::under(Path::new("/tmp/blog"));
        assert_eq!(paths.config_file, PathBuf::from("/tmp/blog/blog.toml"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let paths = BlogPaths::resolve(
            Some(PathBuf::from("/data")),
            Some(PathBuf::from("/etc/blog.toml")),
        )
        .unwrap();
        assert_eq!(paths.data_dir, PathBuf::from("/data"));
        assert_eq!(paths.config_file, PathBuf::from("/etc/blog.toml"));
    }
}
