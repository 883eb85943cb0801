//! Engine configuration combining limits and fees.

use serde::{Deserialize, Serialize};

use crate::fees::{Fixed8, ONE_GAS};
use crate::{ConfigError, ConfigResult, FeeSchedule, VmLimits};

/// Configuration injected into the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Resource limits.
    pub limits: VmLimits,
    /// Fee schedule.
    pub fees: FeeSchedule,
    /// Gas granted to every invocation on top of the gas attached to it.
    pub free_gas: Fixed8,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            limits: VmLimits::default(),
            fees: FeeSchedule::default(),
            free_gas: 10 * ONE_GAS,
        }
    }
}

impl VmConfig {
    /// Parses a TOML document. Missing sections and fields keep their defaults.
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let config: VmConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot operate with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.limits.max_stack_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_stack_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.limits.max_invocation_stack_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_invocation_stack_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.fees.one < 0 || self.free_gas < 0 {
            return Err(ConfigError::InvalidValue {
                field: "fees",
                reason: "gas amounts cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}
