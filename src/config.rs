//! Session settings.
//!
//! Loaded from a TOML file, optionally overridden from the environment:
//!
//! ```toml
//! ai_model = "gpt-4"
//! credential = "sk-..."
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::StudioResult;

/// Model used for script drafting when none is configured.
pub const DEFAULT_AI_MODEL: &str = "gpt-4";

/// Environment variable overriding `ai_model`.
pub const ENV_AI_MODEL: &str = "STUDIO_AI_MODEL";

/// Environment variable overriding `credential`.
pub const ENV_CREDENTIAL: &str = "STUDIO_CREDENTIAL";

/// Recognized session options.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selects the generator model variant.
    pub ai_model: String,
    /// Required before video rendering is dispatched. Empty means unset.
    #[serde(skip_serializing)]
    pub credential: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai_model: DEFAULT_AI_MODEL.to_string(),
            credential: String::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set model.
    pub fn with_ai_model(mut self, model: impl Into<String>) -> Self {
        self.ai_model = model.into();
        self
    }

    /// Builder: Set credential.
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = credential.into();
        self
    }

    /// True once a non-blank credential is configured.
    pub fn has_credential(&self) -> bool {
        !self.credential.trim().is_empty()
    }

    /// Parses settings from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> StudioResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads settings from `path`. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> StudioResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "settings file absent, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Applies `STUDIO_AI_MODEL` / `STUDIO_CREDENTIAL` when set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(model) = lookup(ENV_AI_MODEL).filter(|v| !v.trim().is_empty()) {
            self.ai_model = model;
        }
        if let Some(credential) = lookup(ENV_CREDENTIAL).filter(|v| !v.trim().is_empty()) {
            self.credential = credential;
        }
        self
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("ai_model", &self.ai_model)
            .field(
                "credential",
                &if self.has_credential() { "<redacted>" } else { "<unset>" },
            )
            .finish()
    }
}
