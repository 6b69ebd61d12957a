use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ASSIGNMENT_STATUSES: &[&str] = &["assigned", "accepted", "done"];

/// Work assignment linking a ticket to the stakeholder handling it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub assigned_to: Uuid,
    pub assigned_by: Uuid,
    pub notes: Option<String>,
    pub status: String,
    pub assigned_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
