//! Garden operations on top of the store: live view, batch refresh, watering.
//!
//! Shared by the HTTP handlers and the CLI subcommands. `now` is always
//! passed in so callers (and tests) own the clock.

use std::fmt;

use chrono::{DateTime, Utc};
use garden_core::{
    DecayConfig, GrowthStage, HealthSample, InteractionKind, Status, Tier, assess,
    calculate_health, parse_timestamp, round_score,
};
use garden_store::{NewInteraction, Store, StoreError};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug)]
pub enum GardenError {
    NotFound { contact_id: Uuid },
    Store(StoreError),
}

impl fmt::Display for GardenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GardenError::NotFound { contact_id } => write!(f, "contact not found: {contact_id}"),
            GardenError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GardenError {}

impl From<StoreError> for GardenError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { contact_id } => GardenError::NotFound { contact_id },
            other => GardenError::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, GardenError>;

// --- Response and request types ---

/// A single contact rendered as a plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantHealth {
    pub id: Uuid,
    pub name: String,
    pub tier: Tier,
    pub growth_stage: GrowthStage,
    pub health_score: f64,
    pub status: Status,
    pub days_until_cooling: Option<f64>,
    pub last_interaction_at: DateTime<Utc>,
    pub total_interactions: u32,
    pub is_favorite: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GardenResponse {
    pub user_id: String,
    pub total_plants: usize,
    pub avg_health: f64,
    /// At-risk plus dormant plants.
    pub needs_attention: usize,
    pub plants: Vec<PlantHealth>,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshResult {
    pub user_id: String,
    pub contacts_updated: usize,
    pub avg_health: f64,
    pub refreshed_at: DateTime<Utc>,
}

/// Log an interaction ("water" a plant).
#[derive(Debug, Clone, Deserialize)]
pub struct WaterRequest {
    pub user_id: String,
    #[serde(default, rename = "type")]
    pub kind: InteractionKind,
    #[serde(default)]
    pub notes: Option<String>,
    /// Defaults to now. A timestamp without an offset is taken as UTC.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub happened_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterResponse {
    pub contact_id: Uuid,
    pub new_health: f64,
    pub new_stage: GrowthStage,
    pub status: Status,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s:?}"))),
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        round_score(total / count as f64)
    }
}

// --- Operations ---

/// Every active plant with health computed live from `now`, not read from
/// the stored snapshot. Plants come back weakest first.
pub fn garden_view(
    store: &Store,
    config: &DecayConfig,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<GardenResponse> {
    let contacts = store.list_active_contacts(user_id)?;

    let mut plants = Vec::with_capacity(contacts.len());
    let mut total_health = 0.0;
    let mut needs_attention = 0;

    for contact in contacts {
        let sample = HealthSample::new(contact.last_interaction_at, contact.decay_rate, now);
        let assessment = assess(&sample, config);

        if assessment.status.needs_attention() {
            needs_attention += 1;
        }
        total_health += assessment.health_score;

        plants.push(PlantHealth {
            id: contact.id,
            name: contact.name,
            tier: contact.tier,
            growth_stage: contact.growth_stage,
            health_score: round_score(assessment.health_score),
            status: assessment.status,
            days_until_cooling: assessment.days_until_cooling,
            last_interaction_at: contact.last_interaction_at,
            total_interactions: contact.total_interactions,
            is_favorite: contact.is_favorite,
            tags: contact.tags,
        });
    }

    plants.sort_by(|a, b| a.health_score.total_cmp(&b.health_score));

    let total_plants = plants.len();
    Ok(GardenResponse {
        user_id: user_id.to_string(),
        total_plants,
        avg_health: average(total_health, total_plants),
        needs_attention,
        plants,
        refreshed_at: now,
    })
}

/// Recompute every active plant's score and persist the rounded values so
/// the stored column can be sorted and filtered without the engine.
pub fn refresh_garden(
    store: &Store,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<RefreshResult> {
    let contacts = store.list_active_contacts(user_id)?;

    let scores: Vec<(Uuid, f64)> = contacts
        .iter()
        .map(|c| {
            let health = calculate_health(c.last_interaction_at, c.decay_rate, now, 1.0);
            (c.id, round_score(health))
        })
        .collect();
    let total_health: f64 = scores.iter().map(|(_, h)| h).sum();

    let updated = store.update_health_scores(&scores)?;
    tracing::info!("refreshed {updated} plants for user {user_id}");

    Ok(RefreshResult {
        user_id: user_id.to_string(),
        contacts_updated: updated,
        avg_health: average(total_health, updated),
        refreshed_at: now,
    })
}

/// Log an interaction and reset the plant to full health.
pub fn water_plant(
    store: &Store,
    config: &DecayConfig,
    contact_id: Uuid,
    req: &WaterRequest,
    now: DateTime<Utc>,
) -> Result<WaterResponse> {
    let interaction = NewInteraction::manual(
        contact_id,
        &req.user_id,
        req.kind,
        req.happened_at.unwrap_or(now),
    )
    .with_notes(req.notes.clone());

    let contact = store.record_interaction(&interaction)?;
    tracing::info!(
        "watered {} ({}) via {}; stage {}",
        contact.name,
        contact.id,
        req.kind,
        contact.growth_stage
    );

    Ok(WaterResponse {
        contact_id: contact.id,
        new_health: contact.health_score,
        new_stage: contact.growth_stage,
        status: config.classify(contact.health_score),
    })
}
