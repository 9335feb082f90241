use serde::Deserialize;
use thiserror::Error;

use crate::math::pool_size;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snowfall options. Every field is optional in JSON form.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    /// Fraction of `max_flakes` to allocate, conceptually 0..1.
    pub intensity: f32,
    /// Upper bound on the pool and basis for the intensity scaling.
    pub max_flakes: i32,
    /// Hard on/off switch.
    pub enabled: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            intensity: 0.55,
            max_flakes: 140,
            enabled: true,
        }
    }
}

impl FieldConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of flakes a sizing pass allocates for this config.
    pub fn pool_size(&self) -> usize {
        pool_size(self.max_flakes, self.intensity)
    }
}

/// Typewriter timing and display options.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypewriterConfig {
    #[serde(alias = "typingMs")]
    pub typing_delay_ms: u32,
    #[serde(alias = "deletingMs")]
    pub deleting_delay_ms: u32,
    pub pause_after_typed_ms: u32,
    pub pause_after_deleted_ms: u32,
    #[serde(alias = "cursor")]
    pub show_cursor: bool,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: 60,
            deleting_delay_ms: 28,
            pause_after_typed_ms: 1200,
            pause_after_deleted_ms: 400,
            show_cursor: true,
        }
    }
}

impl TypewriterConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
