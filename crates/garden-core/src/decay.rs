//! Exponential health decay: `N(t) = N₀ · e^(−λ · t)`.
//!
//! - `N₀` is the health right after the last interaction (1.0 after watering)
//! - `λ` is the per-contact daily decay rate
//! - `t` is the elapsed time in fractional days
//!
//! Everything here is a pure function of its arguments. The clock is an
//! argument too, so callers decide what "now" means.

use chrono::{DateTime, Utc};

use crate::constants::{FULL_HEALTH, SECONDS_PER_DAY};

/// Inputs to a single health computation. Never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthSample {
    pub last_interaction_at: DateTime<Utc>,
    pub decay_rate: f64,
    pub now: DateTime<Utc>,
    pub initial_health: f64,
}

impl HealthSample {
    /// Sample starting from full health.
    pub fn new(last_interaction_at: DateTime<Utc>, decay_rate: f64, now: DateTime<Utc>) -> Self {
        Self {
            last_interaction_at,
            decay_rate,
            now,
            initial_health: FULL_HEALTH,
        }
    }

    pub fn with_initial_health(mut self, initial_health: f64) -> Self {
        self.initial_health = initial_health;
        self
    }

    /// Days since the last interaction, floored at zero.
    pub fn elapsed_days(&self) -> f64 {
        elapsed_days(self.last_interaction_at, self.now)
    }

    pub fn health(&self) -> f64 {
        calculate_health(
            self.last_interaction_at,
            self.decay_rate,
            self.now,
            self.initial_health,
        )
    }
}

/// Fractional days from `from` to `to`. A `from` in the future (clock skew)
/// yields 0.0, never a negative value.
pub fn elapsed_days(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds();
    (millis as f64 / 1000.0 / SECONDS_PER_DAY).max(0.0)
}

/// Current health score in [0.0, 1.0].
///
/// No inputs are rejected. A non-positive `decay_rate` keeps health at or
/// above `initial_health` (capped at 1.0), extreme elapsed times bottom out
/// at 0.0, and a NaN intermediate is reported as 0.0.
pub fn calculate_health(
    last_interaction_at: DateTime<Utc>,
    decay_rate: f64,
    now: DateTime<Utc>,
    initial_health: f64,
) -> f64 {
    let days = elapsed_days(last_interaction_at, now);

    // Zero elapsed time must return initial_health exactly, even for
    // infinite rates where λ·0 would be NaN.
    let exponent = if days > 0.0 { -decay_rate * days } else { 0.0 };
    let health = initial_health * exponent.exp();

    if health.is_nan() {
        return 0.0;
    }
    health.clamp(0.0, 1.0)
}

/// Days until `current_health` decays down to `threshold`.
///
/// Solves `threshold = current · e^(−λt)` for `t`, rounded to one decimal.
/// Returns `None` when there is no future crossing: the score is already at
/// or below the threshold, the rate is non-positive, or the threshold can
/// never be reached (zero or negative).
pub fn days_until_threshold(current_health: f64, decay_rate: f64, threshold: f64) -> Option<f64> {
    if current_health <= threshold {
        return None;
    }
    if decay_rate <= 0.0 {
        return None;
    }

    let t = -(threshold / current_health).ln() / decay_rate;
    if !t.is_finite() || t < 0.0 {
        return None;
    }
    Some((t * 10.0).round() / 10.0)
}

/// Round a score to the 4-decimal precision used for storage and reports.
pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}
