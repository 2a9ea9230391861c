//! Demo data: a 50-contact garden in assorted states of decay.

use chrono::{DateTime, Duration, Utc};
use garden_core::{
    DecayConfig, GrowthStage, InteractionKind, Status, Tier, calculate_health, round_score,
};
use garden_store::{Contact, NewContact, NewInteraction, Store};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;
use uuid::Uuid;
use Tier::{Bonsai, Fern, Orchid, Succulent};

const FAVORITE_HEAD: usize = 5;
const FAVORITE_CHANCE: f64 = 0.1;
const RATE_JITTER: f64 = 0.2;
const MAX_HISTORY: u32 = 3;
const BAR_WIDTH: usize = 20;

struct Seedling {
    name: &'static str,
    tier: Tier,
    company: Option<&'static str>,
    title: Option<&'static str>,
    tags: &'static [&'static str],
}

const fn s(
    name: &'static str,
    tier: Tier,
    company: Option<&'static str>,
    title: Option<&'static str>,
    tags: &'static [&'static str],
) -> Seedling {
    Seedling {
        name,
        tier,
        company,
        title,
        tags,
    }
}

const ROSTER: [Seedling; 50] = [
    s("Sarah Chen", Orchid, Some("Deloitte"), Some("Partner"), &["mentor", "consulting"]),
    s("Mom", Orchid, None, None, &["family"]),
    s("Dad", Orchid, None, None, &["family"]),
    s("Priya Sharma", Orchid, Some("Jane Street"), Some("Quant Researcher"), &["mentor", "quant"]),
    s("James Liu", Orchid, Some("UCSD"), Some("Professor, ECE"), &["mentor", "academic"]),
    s("Maya Rodriguez", Orchid, None, None, &["partner", "personal"]),
    s("David Kim", Orchid, Some("Citadel"), Some("VP"), &["mentor", "quant"]),
    s("Aisha Patel", Orchid, Some("McKinsey"), Some("Associate"), &["mentor", "consulting"]),
    s("Alex Thompson", Fern, Some("Google"), Some("SWE L5"), &["friend", "tech"]),
    s("Emily Wang", Fern, Some("UCSD"), Some("PhD Student"), &["friend", "academic"]),
    s("Carlos Mendez", Fern, Some("Tesla"), Some("ML Engineer"), &["friend", "ml"]),
    s("Rachel Green", Fern, Some("Stripe"), Some("PM"), &["friend", "tech"]),
    s("Kevin Park", Fern, None, None, &["friend", "ucsd"]),
    s("Sophia Lee", Fern, Some("NVIDIA"), Some("Research Scientist"), &["peer", "ml"]),
    s("Nathan Wright", Fern, Some("Meta"), Some("MLE"), &["peer", "tech"]),
    s("Isabella Martinez", Fern, Some("Apple"), Some("Design Lead"), &["friend", "design"]),
    s("Ryan O'Connor", Fern, Some("Palantir"), Some("Forward Deployed Engineer"), &["friend", "tech"]),
    s("Lily Tanaka", Fern, Some("UCSD"), Some("TA, CSE 151B"), &["peer", "academic"]),
    s("Omar Hassan", Fern, Some("Two Sigma"), Some("SWE"), &["friend", "quant"]),
    s("Grace Liu", Fern, Some("Notion"), Some("Product Designer"), &["friend", "startup"]),
    s("Ethan Brooks", Fern, Some("UCSD"), Some("MBA Student"), &["friend", "business"]),
    s("Nadia Volkov", Fern, Some("Anthropic"), Some("Research Engineer"), &["peer", "ai"]),
    s("Michael Zhang", Bonsai, Some("a16z"), Some("Partner"), &["investor", "vc"]),
    s("Jennifer Wu", Bonsai, Some("LinkedIn"), Some("Recruiter"), &["recruiter", "tech"]),
    s("Robert Taylor", Bonsai, Some("Sequoia"), Some("Associate"), &["investor", "vc"]),
    s("Amanda Foster", Bonsai, Some("Bain"), Some("Senior Associate"), &["consulting", "professional"]),
    s("Daniel Park", Bonsai, Some("Goldman Sachs"), Some("VP, Tech"), &["professional", "finance"]),
    s("Christine Lee", Bonsai, Some("Y Combinator"), Some("Partner"), &["investor", "startup"]),
    s("Andrew Nguyen", Bonsai, Some("Scale AI"), Some("CTO"), &["founder", "ai"]),
    s("Michelle Santos", Bonsai, Some("UCSD Career Center"), Some("Director"), &["professional", "academic"]),
    s("Thomas Moore", Bonsai, Some("BCG"), Some("Consultant"), &["consulting", "professional"]),
    s("Lisa Chang", Bonsai, Some("OpenAI"), Some("Recruiter"), &["recruiter", "ai"]),
    s("Brian Miller", Succulent, Some("Amazon"), Some("SDE II"), &["acquaintance", "tech"]),
    s("Jessica Huang", Succulent, Some("Netflix"), Some("Data Scientist"), &["acquaintance", "tech"]),
    s("Marcus Johnson", Succulent, None, None, &["gym_buddy", "personal"]),
    s("Samantha Reed", Succulent, Some("Microsoft"), Some("PM"), &["acquaintance", "tech"]),
    s("Tyler Chen", Succulent, Some("UCSD"), Some("Undergrad"), &["classmate", "academic"]),
    s("Olivia Brown", Succulent, Some("Airbnb"), Some("SWE"), &["acquaintance", "tech"]),
    s("Jake Williams", Succulent, None, None, &["high_school", "personal"]),
    s("Hannah Kim", Succulent, Some("Uber"), Some("ML Engineer"), &["acquaintance", "ml"]),
    s("Chris Evans", Succulent, Some("SpaceX"), Some("Engineer"), &["acquaintance", "aerospace"]),
    s("Angela Davis", Succulent, Some("Adobe"), Some("UX Researcher"), &["acquaintance", "design"]),
    s("Sean Murphy", Succulent, None, None, &["army", "personal"]),
    s("Diana Torres", Succulent, Some("Salesforce"), Some("SWE"), &["acquaintance", "tech"]),
    s("Paul Anderson", Succulent, Some("UCSD"), Some("Alumni"), &["alumni", "academic"]),
    s("Megan White", Succulent, Some("Snapchat"), Some("iOS Engineer"), &["acquaintance", "tech"]),
    s("Victor Reyes", Succulent, Some("AMD"), Some("Hardware Engineer"), &["classmate", "ee"]),
    s("Zoe Mitchell", Succulent, Some("Pinterest"), Some("Data Analyst"), &["acquaintance", "tech"]),
    s("Nick Petrov", Succulent, None, None, &["travel", "personal"]),
    s("Laura Kim", Succulent, Some("Databricks"), Some("Solutions Architect"), &["acquaintance", "data"]),
];

const HISTORY_KINDS: [InteractionKind; 6] = [
    InteractionKind::Text,
    InteractionKind::Call,
    InteractionKind::Email,
    InteractionKind::Meeting,
    InteractionKind::Coffee,
    InteractionKind::VideoCall,
];

const SAMPLE_NOTES: [Option<&str>; 8] = [
    Some("Quick catch-up, all good."),
    Some("Discussed career plans."),
    Some("Shared some interesting links."),
    Some("Met for coffee near campus."),
    Some("Had a great video call."),
    Some("They mentioned a new project."),
    Some("Talked about upcoming conference."),
    None,
];

/// Days since the last interaction, per tier.
fn days_ago_range(tier: Tier) -> (f64, f64) {
    match tier {
        Tier::Orchid => (0.0, 45.0),
        Tier::Fern => (0.0, 90.0),
        Tier::Bonsai => (5.0, 120.0),
        Tier::Succulent => (10.0, 200.0),
    }
}

fn interaction_range(tier: Tier) -> (u32, u32) {
    match tier {
        Tier::Orchid => (5, 60),
        Tier::Fern => (2, 30),
        Tier::Bonsai => (1, 20),
        Tier::Succulent => (0, 10),
    }
}

/// Relative weights over `HISTORY_KINDS`.
fn kind_weights(tier: Tier) -> [f64; 6] {
    match tier {
        Tier::Orchid => [0.3, 0.3, 0.1, 0.1, 0.1, 0.1],
        Tier::Fern => [0.4, 0.1, 0.2, 0.1, 0.1, 0.1],
        Tier::Bonsai => [0.1, 0.1, 0.4, 0.2, 0.1, 0.1],
        Tier::Succulent => [0.5, 0.1, 0.1, 0.1, 0.1, 0.1],
    }
}

fn days_before(now: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    now - Duration::milliseconds((days * 86_400_000.0) as i64)
}

fn email_for(name: &str) -> String {
    format!("{}@example.com", name.to_lowercase().replace(' ', "."))
}

#[derive(Debug, Clone)]
pub struct SeededPlant {
    pub contact: Contact,
    pub status: Status,
    pub history: usize,
}

pub fn roster_len() -> usize {
    ROSTER.len()
}

/// Replace `user_id`'s garden with the demo roster. The old garden is only
/// removed if the whole roster is written.
pub fn seed_garden<R: Rng>(
    store: &Store,
    config: &DecayConfig,
    user_id: &str,
    rng: &mut R,
    now: DateTime<Utc>,
) -> garden_store::Result<Vec<SeededPlant>> {
    let mut plantings = Vec::with_capacity(ROSTER.len());
    for (i, seedling) in ROSTER.iter().enumerate() {
        let tier = seedling.tier;
        let jitter = rng.random_range(1.0 - RATE_JITTER..=1.0 + RATE_JITTER);
        let decay_rate = round_score(config.rates.rate(tier) * jitter);

        let (min_days, max_days) = days_ago_range(tier);
        let days_ago = rng.random_range(min_days..=max_days);
        let last_interaction_at = days_before(now, days_ago);
        let health = round_score(calculate_health(last_interaction_at, decay_rate, now, 1.0));

        let (min_count, max_count) = interaction_range(tier);
        let total_interactions = rng.random_range(min_count..=max_count);

        let mut new = NewContact::new(user_id, seedling.name, tier, decay_rate, last_interaction_at);
        new.email = Some(email_for(seedling.name));
        new.company = seedling.company.map(str::to_string);
        new.title = seedling.title.map(str::to_string);
        new.tags = seedling.tags.iter().map(|t| t.to_string()).collect();
        new.growth_stage = GrowthStage::from_interactions(total_interactions);
        new.health_score = health;
        new.total_interactions = total_interactions;
        new.is_favorite = i < FAVORITE_HEAD || rng.random_bool(FAVORITE_CHANCE);

        // Older history behind the last interaction. The store attaches it to
        // the new contact.
        let history_len = total_interactions.min(MAX_HISTORY);
        let mut history = Vec::with_capacity(history_len as usize);
        if history_len > 0 {
            let kinds = WeightedIndex::new(kind_weights(tier))
                .map_err(|e| garden_store::StoreError::InvalidData(format!("kind weights: {e}")))?;
            for j in 0..history_len {
                let back = days_ago + rng.random_range(0.0..30.0) * f64::from(j + 1);
                let kind = HISTORY_KINDS[kinds.sample(rng)];
                let notes = SAMPLE_NOTES.choose(rng).copied().flatten().map(str::to_string);
                history.push(
                    NewInteraction::manual(Uuid::nil(), user_id, kind, days_before(now, back))
                        .with_notes(notes),
                );
            }
        }

        plantings.push((new, history));
    }

    let (cleared, contacts) = store.replace_user_garden(user_id, &plantings)?;
    if cleared > 0 {
        tracing::info!("cleared {cleared} existing contacts for user {user_id}");
    }

    let planted: Vec<SeededPlant> = contacts
        .into_iter()
        .zip(&plantings)
        .map(|(contact, (_, history))| SeededPlant {
            status: config.classify(contact.health_score),
            history: history.len(),
            contact,
        })
        .collect();

    tracing::info!("seeded {} contacts for user {user_id}", planted.len());
    Ok(planted)
}

/// `[████░░░░]`-style gauge, `BAR_WIDTH` cells.
pub fn render_bar(health: f64) -> String {
    let filled = ((health.clamp(0.0, 1.0) * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn render_line(plant: &SeededPlant) -> String {
    let c = &plant.contact;
    format!(
        "  [{}] {:.2} {:<10} {:<25} ({})",
        render_bar(c.health_score),
        c.health_score,
        plant.status.as_str(),
        c.name,
        c.tier
    )
}
