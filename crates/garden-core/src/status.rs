//! Ordinal relationship status.
//!
//! Status is what users see. The raw score is never shown as a percentage,
//! so the buckets carry no more precision than the model actually has.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Thriving,
    Cooling,
    AtRisk,
    Dormant,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Thriving => "thriving",
            Status::Cooling => "cooling",
            Status::AtRisk => "at_risk",
            Status::Dormant => "dormant",
        }
    }

    /// At-risk and dormant plants are the ones a user should water soon.
    pub fn needs_attention(self) -> bool {
        matches!(self, Status::AtRisk | Status::Dormant)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a health score, checking thresholds from healthiest down.
///
/// A score exactly on a threshold lands in the healthier bucket.
pub fn classify_status(health_score: f64, thresholds: &Thresholds) -> Status {
    if health_score >= thresholds.healthy {
        Status::Thriving
    } else if health_score >= thresholds.cooling {
        Status::Cooling
    } else if health_score >= thresholds.dormant {
        Status::AtRisk
    } else {
        Status::Dormant
    }
}
