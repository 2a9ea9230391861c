use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TierRates;

/// How much tending a relationship needs. Each tier carries a default λ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Low-touch, slow decay.
    Succulent,
    /// Medium-touch, standard decay.
    #[default]
    Fern,
    /// High-touch, fast decay.
    Orchid,
    /// Professional cadence, moderate decay.
    Bonsai,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Succulent, Tier::Fern, Tier::Orchid, Tier::Bonsai];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Succulent => "succulent",
            Tier::Fern => "fern",
            Tier::Orchid => "orchid",
            Tier::Bonsai => "bonsai",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTier(pub String);

impl fmt::Display for UnknownTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tier: {:?}", self.0)
    }
}

impl std::error::Error for UnknownTier {}

/// Strict parsing. Unknown names are an error here; use
/// [`default_decay_rate`] for the lenient lookup.
impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTier(s.to_string()))
    }
}

/// Default λ for a tier name. Unknown names get the fern rate.
pub fn default_decay_rate(tier: &str, rates: &TierRates) -> f64 {
    let tier = tier.parse().unwrap_or(Tier::Fern);
    rates.rate(tier)
}
