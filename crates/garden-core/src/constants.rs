/// Seconds in one day; elapsed time is measured in fractional days.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Health right after a watering interaction.
pub const FULL_HEALTH: f64 = 1.0;

/// Default target for `days_until_threshold` predictions.
pub const DEFAULT_PREDICTION_THRESHOLD: f64 = 0.5;

/// Succulent λ: ~90-day half-life (t½ = ln 2 / λ).
pub const DECAY_RATE_SUCCULENT: f64 = 0.0077;

/// Fern λ: ~30-day half-life. Also the fallback for unknown tiers.
pub const DECAY_RATE_FERN: f64 = 0.0231;

/// Orchid λ: ~14-day half-life.
pub const DECAY_RATE_ORCHID: f64 = 0.0495;

/// Bonsai λ: ~60-day half-life.
pub const DECAY_RATE_BONSAI: f64 = 0.0116;

/// At or above this score a plant is thriving.
pub const THRESHOLD_HEALTHY: f64 = 0.7;

/// At or above this score (and below healthy) a plant is cooling.
pub const THRESHOLD_COOLING: f64 = 0.4;

/// Below this score a plant is dormant; between this and cooling it is at risk.
pub const THRESHOLD_DORMANT: f64 = 0.1;

/// Interaction counts at which a plant reaches each growth stage.
pub const STAGE_SPROUT_AT: u32 = 3;
pub const STAGE_SAPLING_AT: u32 = 10;
pub const STAGE_MATURE_AT: u32 = 25;
pub const STAGE_ANCIENT_AT: u32 = 50;
