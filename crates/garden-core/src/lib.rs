//! Relationship Garden decay engine.
//!
//! Every contact is a plant whose health fades exponentially from the last
//! interaction. The engine turns `(last_interaction_at, decay_rate, now)`
//! into a score in [0, 1], buckets scores into an ordinal status, predicts
//! when a score will cross a threshold, and maps tiers to default rates.
//!
//! Zero I/O: no clock reads inside the math, no storage, no transport.
//! Configuration is an immutable [`DecayConfig`] passed in by the caller.

pub mod assess;
pub mod config;
pub mod constants;
pub mod decay;
pub mod plant;
pub mod status;
pub mod tier;
pub mod time;

pub use assess::{HealthAssessment, assess};
pub use config::{ConfigError, DecayConfig, Thresholds, TierRates};
pub use constants::{DEFAULT_PREDICTION_THRESHOLD, FULL_HEALTH};
pub use decay::{HealthSample, calculate_health, days_until_threshold, elapsed_days, round_score};
pub use plant::{GrowthStage, InteractionKind};
pub use status::{Status, classify_status};
pub use tier::{Tier, UnknownTier, default_decay_rate};
pub use time::{now_utc, parse_timestamp, to_iso8601};
