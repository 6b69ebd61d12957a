use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A person or company attached to the association: admins, board members,
/// owners, residents, vendors. Doubles as the login identity for the
/// organization's tenant database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Stakeholder {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub stakeholder_type: String,
    /// bcrypt hash; never serialized into API responses
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
