//! Component configuration parameters.
//!
//! Fixed at construction time.  Mailbox capacities are compile-time
//! constants on the component types; everything tunable lives here.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of FACTOR_UPDATED events delivered before throttling.
pub const FACTOR_UPDATED_THROTTLE: u32 = 3;

/// Value FACTOR takes while its validity is `Default`.
pub const FACTOR_DEFAULT: f32 = 1.0;

/// Evaluator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// FACTOR_UPDATED deliveries allowed before the throttle engages.
    pub factor_updated_throttle: u32,
    /// Compiled-in FACTOR default.
    pub factor_default: f32,
    /// Parameter store namespace (max 15 chars, NVS-compatible).
    pub param_namespace: heapless::String<15>,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        let mut param_namespace = heapless::String::new();
        let _ = param_namespace.push_str("mathrecv");
        Self {
            factor_updated_throttle: FACTOR_UPDATED_THROTTLE,
            factor_default: FACTOR_DEFAULT,
            param_namespace,
        }
    }
}

impl ComponentConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.factor_updated_throttle == 0 {
            return Err(ConfigError::ValidationFailed(
                "factor_updated_throttle must be at least 1",
            ));
        }
        if !self.factor_default.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "factor_default must be finite",
            ));
        }
        if self.param_namespace.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "param_namespace must not be empty",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self =
            serde_json::from_str(text).context("component config is not valid JSON")?;
        config.validate().context("component config rejected")?;
        Ok(config)
    }
}
