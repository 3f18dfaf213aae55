use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5555;
pub const SCREENSHOTS_DIR_NAME: &str = "screenshots";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DEV_PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("SITE_ROOT {path:?} is not usable: {source}")]
    SiteRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct DevConfig {
    pub port: u16,
    /// Canonical path of the directory the site is served from.
    pub site_root: PathBuf,
    pub screenshots_dir: PathBuf,
}

impl DevConfig {
    pub fn new(port: u16, site_root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let site_root = site_root.as_ref();
        let site_root = site_root.canonicalize().map_err(|source| ConfigError::SiteRoot {
            path: site_root.to_path_buf(),
            source,
        })?;
        let screenshots_dir = site_root.join(SCREENSHOTS_DIR_NAME);
        Ok(Self {
            port,
            site_root,
            screenshots_dir,
        })
    }

    /// `DEV_PORT` defaults to 5555 and `SITE_ROOT` to the working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::var("DEV_PORT").ok(), std::env::var("SITE_ROOT").ok())
    }

    pub fn from_vars(port: Option<String>, site_root: Option<String>) -> Result<Self, ConfigError> {
        let port = match port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };
        let site_root = site_root
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(port, site_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_port_5555() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            DevConfig::from_vars(None, Some(dir.path().to_string_lossy().into_owned())).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.site_root, dir.path().canonicalize().unwrap());
        assert_eq!(config.screenshots_dir, config.site_root.join("screenshots"));
    }

    #[test]
    fn reads_port_override() {
        let dir = tempfile::tempdir().unwrap();
        let config = DevConfig::from_vars(
            Some("8080".to_string()),
            Some(dir.path().to_string_lossy().into_owned()),
        )
        .unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn rejects_bad_port() {
        let err = DevConfig::from_vars(Some("fifty".to_string()), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(raw) if raw == "fifty"));
    }

    #[test]
    fn rejects_missing_site_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = DevConfig::new(DEFAULT_PORT, &missing).unwrap_err();
        assert!(matches!(err, ConfigError::SiteRoot { .. }));
    }
}
