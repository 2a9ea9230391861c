use chrono::{DateTime, Utc};
use garden_core::{GrowthStage, InteractionKind, Tier};
use serde::Serialize;
use uuid::Uuid;

/// A contact as stored. `health_score` is the last persisted snapshot; the
/// live value is always recomputed from `last_interaction_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub tier: Tier,
    pub growth_stage: GrowthStage,
    pub tags: Vec<String>,
    pub last_interaction_at: DateTime<Utc>,
    pub health_score: f64,
    pub decay_rate: f64,
    pub total_interactions: u32,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub tier: Tier,
    pub growth_stage: GrowthStage,
    pub tags: Vec<String>,
    pub last_interaction_at: DateTime<Utc>,
    pub health_score: f64,
    pub decay_rate: f64,
    pub total_interactions: u32,
    pub is_favorite: bool,
    pub is_archived: bool,
}

impl NewContact {
    /// A just-met contact: full health, tier-default λ, no history.
    pub fn new(
        user_id: &str,
        name: &str,
        tier: Tier,
        decay_rate: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: name.to_string(),
            email: None,
            company: None,
            title: None,
            tier,
            growth_stage: GrowthStage::Seed,
            tags: Vec::new(),
            last_interaction_at: now,
            health_score: 1.0,
            decay_rate,
            total_interactions: 0,
            is_favorite: false,
            is_archived: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub user_id: String,
    pub kind: InteractionKind,
    pub source: String,
    pub notes: Option<String>,
    pub happened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub contact_id: Uuid,
    pub user_id: String,
    pub kind: InteractionKind,
    pub source: String,
    pub notes: Option<String>,
    pub happened_at: DateTime<Utc>,
}

impl NewInteraction {
    /// A manually logged interaction with no notes.
    pub fn manual(
        contact_id: Uuid,
        user_id: &str,
        kind: InteractionKind,
        happened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            contact_id,
            user_id: user_id.to_string(),
            kind,
            source: "manual".to_string(),
            notes: None,
            happened_at,
        }
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}
