use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{PlaqueError, PlaqueResult};

/// Path of the document generation endpoint, relative to [`PipelineConfig::base_url`].
pub const GENERATE_PATH: &str = "/pdf/generate";

pub const ENV_BASE_URL: &str = "PHOTOPLAQUE_ENDPOINT";
pub const ENV_TIMEOUT_MS: &str = "PHOTOPLAQUE_TIMEOUT_MS";
pub const ENV_LOCALE: &str = "PHOTOPLAQUE_LOCALE";
pub const ENV_FONTS_DIR: &str = "PHOTOPLAQUE_FONTS_DIR";

/// Session-wide settings for the capture and upload flow.
///
/// Values come from (lowest to highest precedence) [`Default`], an optional JSON file, the
/// `PHOTOPLAQUE_*` environment variables, and finally CLI flags applied by the binary.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Scheme + host (+ optional prefix) of the generation service.
    pub base_url: String,
    /// Whole-request timeout for the generation call.
    pub request_timeout_ms: u64,
    /// Initial locale code.
    pub locale: String,
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` fonts used by the text overlay.
    pub fonts_dir: Option<PathBuf>,
    /// Directory generated documents are delivered into.
    pub download_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            request_timeout_ms: 30_000,
            locale: "en".to_string(),
            fonts_dir: None,
            download_dir: PathBuf::from("."),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file; missing keys keep their defaults.
    pub fn from_path(path: &Path) -> PlaqueResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `PHOTOPLAQUE_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_lookup(|k| std::env::var(k).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable or empty values are ignored.
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = v.trim().to_string();
        }
        if let Some(v) = lookup(ENV_TIMEOUT_MS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.request_timeout_ms = v;
        }
        if let Some(v) = lookup(ENV_LOCALE).filter(|v| !v.trim().is_empty()) {
            self.locale = v.trim().to_string();
        }
        if let Some(v) = lookup(ENV_FONTS_DIR).filter(|v| !v.trim().is_empty()) {
            self.fonts_dir = Some(PathBuf::from(v));
        }
        self
    }

    pub fn validate(&self) -> PlaqueResult<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(PlaqueError::validation(
                "base_url must start with http:// or https://",
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(PlaqueError::validation("request_timeout_ms must be > 0"));
        }
        Ok(())
    }

    /// Full URL of the generation endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{GENERATE_PATH}", self.base_url.trim().trim_end_matches('/'))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
