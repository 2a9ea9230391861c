//! Immutable engine configuration: per-tier decay rates and status thresholds.
//!
//! Built once at process start (usually deserialized from the `[decay]`
//! table of a TOML file) and passed by reference into the engine. Nothing
//! here is global or mutable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DECAY_RATE_BONSAI, DECAY_RATE_FERN, DECAY_RATE_ORCHID, DECAY_RATE_SUCCULENT, THRESHOLD_COOLING,
    THRESHOLD_DORMANT, THRESHOLD_HEALTHY,
};
use crate::status::{Status, classify_status};
use crate::tier::Tier;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ThresholdOutOfRange { name: &'static str, value: f64 },
    ThresholdsOutOfOrder(Thresholds),
    InvalidRate { tier: Tier, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ThresholdOutOfRange { name, value } => {
                write!(f, "threshold_{name} must be within [0, 1], got {value}")
            }
            ConfigError::ThresholdsOutOfOrder(t) => write!(
                f,
                "thresholds must satisfy healthy >= cooling >= dormant, got {} / {} / {}",
                t.healthy, t.cooling, t.dormant
            ),
            ConfigError::InvalidRate { tier, value } => {
                write!(f, "decay rate for {tier} must be finite, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Default λ per tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierRates {
    pub succulent: f64,
    pub fern: f64,
    pub orchid: f64,
    pub bonsai: f64,
}

impl Default for TierRates {
    fn default() -> Self {
        Self {
            succulent: DECAY_RATE_SUCCULENT,
            fern: DECAY_RATE_FERN,
            orchid: DECAY_RATE_ORCHID,
            bonsai: DECAY_RATE_BONSAI,
        }
    }
}

impl TierRates {
    pub fn rate(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Succulent => self.succulent,
            Tier::Fern => self.fern,
            Tier::Orchid => self.orchid,
            Tier::Bonsai => self.bonsai,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for tier in Tier::ALL {
            let value = self.rate(tier);
            if !value.is_finite() {
                return Err(ConfigError::InvalidRate { tier, value });
            }
        }
        Ok(())
    }
}

/// Lower bounds of the thriving, cooling and at-risk buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub healthy: f64,
    pub cooling: f64,
    pub dormant: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            healthy: THRESHOLD_HEALTHY,
            cooling: THRESHOLD_COOLING,
            dormant: THRESHOLD_DORMANT,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("healthy", self.healthy),
            ("cooling", self.cooling),
            ("dormant", self.dormant),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.healthy < self.cooling || self.cooling < self.dormant {
            return Err(ConfigError::ThresholdsOutOfOrder(*self));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    pub rates: TierRates,
    pub thresholds: Thresholds,
}

impl DecayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rates.validate()?;
        self.thresholds.validate()
    }

    pub fn classify(&self, health_score: f64) -> Status {
        classify_status(health_score, &self.thresholds)
    }

    /// Lenient tier lookup; see [`crate::tier::default_decay_rate`].
    pub fn default_decay_rate(&self, tier: &str) -> f64 {
        crate::tier::default_decay_rate(tier, &self.rates)
    }
}
