use std::path::Path;

use serde::{Deserialize, Serialize};

use hush_types::SurfaceId;

use crate::error::{RelayError, RelayResult};

/// Startup configuration of the relay.
///
/// Everything here is only the initial value: admin commands change the
/// live state, and nothing is written back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Whether submissions are accepted at startup.
    pub active: bool,
    /// Confessions allowed per identity until the next reset.
    pub max_allowed: u32,
    /// Channel confessions are posted to, if known at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_surface: Option<SurfaceId>,
    /// Longest accepted confession, in characters.
    pub max_text_len: usize,
    /// How published confessions look.
    pub render: RenderConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            active: true,
            max_allowed: 2,
            target_surface: None,
            max_text_len: 4000,
            render: RenderConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> RelayResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| RelayError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> RelayResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> RelayResult<String> {
        toml::to_string_pretty(self).map_err(|e| RelayError::Config(e.to_string()))
    }

    pub fn validate(&self) -> RelayResult<()> {
        if self.max_allowed == 0 {
            return Err(RelayError::Config("max_allowed must be at least 1".into()));
        }
        if self.max_text_len == 0 {
            return Err(RelayError::Config("max_text_len must be at least 1".into()));
        }
        Ok(())
    }
}

/// Presentation of published confessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Embed title prefix; the confession number is appended.
    pub title_prefix: String,
    /// Label of the button inviting the next confession.
    pub button_label: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title_prefix: "Confession".into(),
            button_label: "Submit a confession!".into(),
        }
    }
}
