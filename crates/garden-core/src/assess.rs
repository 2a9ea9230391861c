use serde::Serialize;

use crate::config::DecayConfig;
use crate::decay::{HealthSample, days_until_threshold};
use crate::status::Status;

/// Everything the garden view shows about one plant's health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthAssessment {
    pub health_score: f64,
    pub status: Status,
    /// Days until the plant drops to the cooling threshold, if it ever will.
    pub days_until_cooling: Option<f64>,
}

pub fn assess(sample: &HealthSample, config: &DecayConfig) -> HealthAssessment {
    let health_score = sample.health();
    HealthAssessment {
        health_score,
        status: config.classify(health_score),
        days_until_cooling: days_until_threshold(
            health_score,
            sample.decay_rate,
            config.thresholds.cooling,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_fresh_plant() {
        let now = Utc::now();
        let a = assess(&HealthSample::new(now, 0.0231, now), &DecayConfig::default());
        assert_eq!(a.health_score, 1.0);
        assert_eq!(a.status, Status::Thriving);
        // ln(1/0.4)/0.0231 ≈ 39.7 days
        let days = a.days_until_cooling.unwrap();
        assert!((days - 39.7).abs() < 0.2, "got {days}");
    }

    #[test]
    fn test_neglected_plant_has_no_prediction() {
        let now = Utc::now();
        let sample = HealthSample::new(now - Duration::days(60), 0.0231, now);
        let a = assess(&sample, &DecayConfig::default());
        assert_eq!(a.status, Status::AtRisk);
        assert!(a.days_until_cooling.is_none());
    }
}
