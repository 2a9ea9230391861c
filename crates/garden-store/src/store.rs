use std::path::Path;

use chrono::{DateTime, SubsecRound, Utc};
use garden_core::{FULL_HEALTH, GrowthStage, InteractionKind, Tier, parse_timestamp, to_iso8601};
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::model::{Contact, Interaction, NewContact, NewInteraction};
use crate::schema;

const CONTACT_COLUMNS: &str = "id, user_id, name, email, company, title, tier, growth_stage, tags, \
     last_interaction_at, health_score, decay_rate, total_interactions, is_favorite, is_archived, \
     created_at";

const INTERACTION_COLUMNS: &str = "id, contact_id, user_id, kind, source, notes, happened_at";

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        tracing::debug!("opened store at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Flush the WAL into the main database file.
    pub fn checkpoint_truncate(&self) -> Result<()> {
        self.conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).optional()?;
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Contacts ---

    /// Timestamps are stored with millisecond precision; the returned
    /// contact is truncated the same way so it compares equal after a reload.
    pub fn insert_contact(&self, new: &NewContact) -> Result<Contact> {
        insert_contact_on(&self.conn, new)
    }

    /// Replace `user_id`'s garden in one transaction: remove every existing
    /// contact and interaction, then insert `plants` with their backfilled
    /// history. History is logged without the watering reset and is attached
    /// to the contact it is paired with, whatever its `contact_id` says.
    /// Returns the number of contacts removed and the inserted contacts.
    pub fn replace_user_garden(
        &self,
        user_id: &str,
        plants: &[(NewContact, Vec<NewInteraction>)],
    ) -> Result<(usize, Vec<Contact>)> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = clear_user_on(&tx, user_id)?;

        let mut contacts = Vec::with_capacity(plants.len());
        for (new, history) in plants {
            let contact = insert_contact_on(&tx, new)?;
            for interaction in history {
                insert_interaction_on(
                    &tx,
                    &NewInteraction {
                        contact_id: contact.id,
                        ..interaction.clone()
                    },
                )?;
            }
            contacts.push(contact);
        }
        tx.commit()?;

        tracing::debug!(
            "replaced garden for {user_id}: removed {removed}, planted {}",
            contacts.len()
        );
        Ok((removed, contacts))
    }

    /// Look up one contact owned by `user_id`. Archived contacts are included.
    pub fn get_contact(&self, user_id: &str, contact_id: Uuid) -> Result<Option<Contact>> {
        get_contact_on(&self.conn, user_id, contact_id)
    }

    /// Non-archived contacts for a user, lowest stored health first.
    pub fn list_active_contacts(&self, user_id: &str) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE user_id = ?1 AND is_archived = 0
             ORDER BY health_score ASC, name ASC"
        ))?;

        let rows: Vec<ContactRow> = stmt
            .query_map([user_id], read_contact_row)?
            .collect::<std::result::Result<_, _>>()?;

        rows.into_iter().map(ContactRow::into_contact).collect()
    }

    /// Persist a batch of recomputed scores in one transaction.
    /// Returns how many contacts were updated.
    pub fn update_health_scores(&self, scores: &[(Uuid, f64)]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut updated = 0;
        {
            let mut stmt = tx.prepare("UPDATE contacts SET health_score = ?1 WHERE id = ?2")?;
            for (id, score) in scores {
                updated += stmt.execute(params![score, id.to_string()])?;
            }
        }
        tx.commit()?;
        Ok(updated)
    }

    pub fn set_archived(&self, user_id: &str, contact_id: Uuid, archived: bool) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE contacts SET is_archived = ?1 WHERE id = ?2 AND user_id = ?3",
            params![archived, contact_id.to_string(), user_id],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound { contact_id });
        }
        Ok(())
    }

    // --- Interactions ---

    /// Water a plant: log the interaction, reset health to full, bump the
    /// interaction count and growth stage. All-or-nothing.
    ///
    /// `last_interaction_at` only moves forward; a backdated interaction is
    /// logged but does not rewind the clock.
    pub fn record_interaction(&self, interaction: &NewInteraction) -> Result<Contact> {
        let tx = self.conn.unchecked_transaction()?;

        let contact = get_contact_on(&tx, &interaction.user_id, interaction.contact_id)?.ok_or(
            StoreError::NotFound {
                contact_id: interaction.contact_id,
            },
        )?;

        insert_interaction_on(&tx, interaction)?;

        let total_interactions = contact.total_interactions.saturating_add(1);
        let growth_stage = GrowthStage::from_interactions(total_interactions);
        let last_interaction_at = contact
            .last_interaction_at
            .max(interaction.happened_at.trunc_subsecs(3));

        tx.execute(
            "UPDATE contacts
             SET health_score = ?1, last_interaction_at = ?2, total_interactions = ?3,
                 growth_stage = ?4
             WHERE id = ?5",
            params![
                FULL_HEALTH,
                to_iso8601(last_interaction_at),
                total_interactions,
                growth_stage.as_str(),
                contact.id.to_string(),
            ],
        )?;
        tx.commit()?;

        tracing::debug!(
            "watered {} ({}): {} interactions, stage {}",
            contact.name,
            contact.id,
            total_interactions,
            growth_stage
        );

        Ok(Contact {
            health_score: FULL_HEALTH,
            last_interaction_at,
            total_interactions,
            growth_stage,
            ..contact
        })
    }

    /// Log an interaction without touching the contact's health, count, or
    /// stage. Used for backfilling history.
    pub fn insert_interaction(&self, interaction: &NewInteraction) -> Result<Interaction> {
        if get_contact_on(&self.conn, &interaction.user_id, interaction.contact_id)?.is_none() {
            return Err(StoreError::NotFound {
                contact_id: interaction.contact_id,
            });
        }
        insert_interaction_on(&self.conn, interaction)
    }

    /// Interactions for a contact, newest first.
    pub fn list_interactions(&self, contact_id: Uuid) -> Result<Vec<Interaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {INTERACTION_COLUMNS} FROM interactions
             WHERE contact_id = ?1 ORDER BY happened_at DESC, rowid DESC"
        ))?;

        let rows: Vec<InteractionRow> = stmt
            .query_map([contact_id.to_string()], |row| {
                Ok(InteractionRow {
                    id: row.get(0)?,
                    contact_id: row.get(1)?,
                    user_id: row.get(2)?,
                    kind: row.get(3)?,
                    source: row.get(4)?,
                    notes: row.get(5)?,
                    happened_at: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<_, _>>()?;

        rows.into_iter().map(InteractionRow::into_interaction).collect()
    }

    // --- Housekeeping ---

    /// Delete every contact and interaction owned by `user_id`.
    /// Returns the number of contacts removed.
    pub fn clear_user(&self, user_id: &str) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = clear_user_on(&tx, user_id)?;
        tx.commit()?;
        Ok(removed)
    }

    pub fn count_contacts(&self, user_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM contacts WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn get_contact_on(conn: &Connection, user_id: &str, contact_id: Uuid) -> Result<Option<Contact>> {
    let row = conn
        .query_row(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1 AND user_id = ?2"),
            params![contact_id.to_string(), user_id],
            read_contact_row,
        )
        .optional()?;
    row.map(ContactRow::into_contact).transpose()
}

fn insert_contact_on(conn: &Connection, new: &NewContact) -> Result<Contact> {
    let contact = Contact {
        id: Uuid::new_v4(),
        user_id: new.user_id.clone(),
        name: new.name.clone(),
        email: new.email.clone(),
        company: new.company.clone(),
        title: new.title.clone(),
        tier: new.tier,
        growth_stage: new.growth_stage,
        tags: new.tags.clone(),
        last_interaction_at: new.last_interaction_at.trunc_subsecs(3),
        health_score: new.health_score,
        decay_rate: new.decay_rate,
        total_interactions: new.total_interactions,
        is_favorite: new.is_favorite,
        is_archived: new.is_archived,
        created_at: Utc::now().trunc_subsecs(3),
    };

    let tags = serde_json::to_string(&contact.tags)
        .map_err(|e| StoreError::InvalidData(format!("tags: {e}")))?;

    conn.execute(
        &format!(
            "INSERT INTO contacts ({CONTACT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
        ),
        params![
            contact.id.to_string(),
            contact.user_id,
            contact.name,
            contact.email,
            contact.company,
            contact.title,
            contact.tier.as_str(),
            contact.growth_stage.as_str(),
            tags,
            to_iso8601(contact.last_interaction_at),
            contact.health_score,
            contact.decay_rate,
            contact.total_interactions,
            contact.is_favorite,
            contact.is_archived,
            to_iso8601(contact.created_at),
        ],
    )?;

    Ok(contact)
}

fn clear_user_on(conn: &Connection, user_id: &str) -> Result<usize> {
    conn.execute("DELETE FROM interactions WHERE user_id = ?1", [user_id])?;
    Ok(conn.execute("DELETE FROM contacts WHERE user_id = ?1", [user_id])?)
}

fn insert_interaction_on(conn: &Connection, new: &NewInteraction) -> Result<Interaction> {
    let interaction = Interaction {
        id: Uuid::new_v4(),
        contact_id: new.contact_id,
        user_id: new.user_id.clone(),
        kind: new.kind,
        source: new.source.clone(),
        notes: new.notes.clone(),
        happened_at: new.happened_at.trunc_subsecs(3),
    };
    conn.execute(
        &format!("INSERT INTO interactions ({INTERACTION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        params![
            interaction.id.to_string(),
            interaction.contact_id.to_string(),
            interaction.user_id,
            interaction.kind.as_str(),
            interaction.source,
            interaction.notes,
            to_iso8601(interaction.happened_at),
        ],
    )?;
    Ok(interaction)
}

/// Raw column values, converted to domain types outside the rusqlite closure
/// so conversion failures surface as `StoreError::InvalidData`.
struct ContactRow {
    id: String,
    user_id: String,
    name: String,
    email: Option<String>,
    company: Option<String>,
    title: Option<String>,
    tier: String,
    growth_stage: String,
    tags: String,
    last_interaction_at: String,
    health_score: f64,
    decay_rate: f64,
    total_interactions: u32,
    is_favorite: bool,
    is_archived: bool,
    created_at: String,
}

fn read_contact_row(row: &Row<'_>) -> rusqlite::Result<ContactRow> {
    Ok(ContactRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        company: row.get(4)?,
        title: row.get(5)?,
        tier: row.get(6)?,
        growth_stage: row.get(7)?,
        tags: row.get(8)?,
        last_interaction_at: row.get(9)?,
        health_score: row.get(10)?,
        decay_rate: row.get(11)?,
        total_interactions: row.get(12)?,
        is_favorite: row.get(13)?,
        is_archived: row.get(14)?,
        created_at: row.get(15)?,
    })
}

impl ContactRow {
    fn into_contact(self) -> Result<Contact> {
        Ok(Contact {
            id: parse_uuid(&self.id)?,
            tier: self
                .tier
                .parse::<Tier>()
                .map_err(|e| StoreError::InvalidData(e.to_string()))?,
            growth_stage: self
                .growth_stage
                .parse::<GrowthStage>()
                .map_err(StoreError::InvalidData)?,
            tags: serde_json::from_str(&self.tags)
                .map_err(|e| StoreError::InvalidData(format!("tags '{}': {e}", self.tags)))?,
            last_interaction_at: parse_ts(&self.last_interaction_at)?,
            created_at: parse_ts(&self.created_at)?,
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            company: self.company,
            title: self.title,
            health_score: self.health_score,
            decay_rate: self.decay_rate,
            total_interactions: self.total_interactions,
            is_favorite: self.is_favorite,
            is_archived: self.is_archived,
        })
    }
}

struct InteractionRow {
    id: String,
    contact_id: String,
    user_id: String,
    kind: String,
    source: String,
    notes: Option<String>,
    happened_at: String,
}

impl InteractionRow {
    fn into_interaction(self) -> Result<Interaction> {
        Ok(Interaction {
            id: parse_uuid(&self.id)?,
            contact_id: parse_uuid(&self.contact_id)?,
            kind: self
                .kind
                .parse::<InteractionKind>()
                .map_err(StoreError::InvalidData)?,
            happened_at: parse_ts(&self.happened_at)?,
            user_id: self.user_id,
            source: self.source,
            notes: self.notes,
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| StoreError::InvalidData(format!("invalid UUID '{s}': {e}")))
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(s).ok_or_else(|| StoreError::InvalidData(format!("invalid timestamp '{s}'")))
}
