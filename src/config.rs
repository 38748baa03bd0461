use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::upload::DEFAULT_CONFIDENCE;

pub const DEFAULT_BACKEND_ORIGIN: &str = "http://localhost:8000";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin the detection service is served from, e.g. `http://localhost:8000`
    pub origin: String,
    /// Off by default: a stalled request stays in flight until the server answers.
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_BACKEND_ORIGIN.to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub default_confidence: f32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            default_confidence: DEFAULT_CONFIDENCE,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("parse config toml")?;
        config.origin()?;
        Ok(config)
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.backend.origin = origin.into();
        self
    }

    pub fn origin(&self) -> Result<Url> {
        let url = Url::parse(&self.backend.origin)
            .with_context(|| format!("invalid backend origin {:?}", self.backend.origin))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("backend origin must use http or https, got {}", url.scheme());
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.backend.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.backend.origin, DEFAULT_BACKEND_ORIGIN);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.upload.default_confidence, 0.5);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
            [backend]
            origin = "http://10.0.0.5:9000"
            request_timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.origin().unwrap().port(), Some(9000));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.upload.default_confidence, 0.5);
    }

    #[test]
    fn test_rejects_non_http_origin() {
        let result = Config::from_toml(
            r#"
            [backend]
            origin = "ftp://example.com"
            "#,
        );
        assert!(result.is_err());
    }
}
