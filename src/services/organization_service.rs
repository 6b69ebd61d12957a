use tracing::info;

use crate::config;
use crate::database::models::Organization;
use crate::database::registry::DatabaseError;
use crate::database::{PoolHandle, PoolRegistry};

#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Pool registry error: {0}")]
    Registry(#[from] DatabaseError),
    #[error("Organization already exists: {0}")]
    AlreadyExists(String),
    #[error("Template database not found: {0}")]
    TemplateNotFound(String),
    #[error("Invalid organization name: {0}")]
    InvalidName(String),
}

/// Organization lifecycle against the master database: each organization
/// owns a dedicated tenant database cloned from the template at creation.
pub struct OrganizationService {
    master_pool: PoolHandle,
}

impl OrganizationService {
    pub async fn new() -> Result<Self, OrganizationError> {
        let master_pool = PoolRegistry::master_connection().await?;
        Ok(Self { master_pool })
    }

    /// Provision a new organization:
    /// (a) derive the tenant database name from the organization name,
    /// (b) clone the template database,
    /// (c) register the organization in the master registry.
    pub async fn create_organization(&self, name: &str) -> Result<Organization, OrganizationError> {
        Self::validate_name(name)?;

        let database_name = Self::database_name_for(name);
        let template_db = config::config().database.template_db.clone();

        if self.organization_exists(name, &database_name).await? {
            return Err(OrganizationError::AlreadyExists(name.to_string()));
        }

        if !self.template_exists(&template_db).await? {
            return Err(OrganizationError::TemplateNotFound(template_db));
        }

        self.clone_database(&template_db, &database_name).await?;

        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, database_name, active)
            VALUES ($1, $2, true)
            RETURNING id, name, database_name, active, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(&database_name)
        .fetch_one(self.master_pool.as_ref())
        .await?;

        info!("Provisioned organization '{}' on {}", name, database_name);
        Ok(organization)
    }

    /// Get organization info by name
    pub async fn get_organization(&self, name: &str) -> Result<Option<Organization>, OrganizationError> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, database_name, active, created_at, updated_at
            FROM organizations
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(self.master_pool.as_ref())
        .await?;

        Ok(organization)
    }

    /// List all registered organizations
    pub async fn list_organizations(&self) -> Result<Vec<Organization>, OrganizationError> {
        let organizations = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, database_name, active, created_at, updated_at
            FROM organizations
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.master_pool.as_ref())
        .await?;

        Ok(organizations)
    }

    /// Deactivate an organization. Its tenant database is left in place;
    /// requests for it are rejected by the organization middleware.
    pub async fn deactivate_organization(&self, name: &str) -> Result<Option<Organization>, OrganizationError> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations
            SET active = false, updated_at = now()
            WHERE name = $1
            RETURNING id, name, database_name, active, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_optional(self.master_pool.as_ref())
        .await?;

        Ok(organization)
    }

    /// Connection pool for a named organization's tenant database
    pub async fn organization_pool(&self, name: &str) -> Result<PoolHandle, OrganizationError> {
        let organization = self
            .get_organization(name)
            .await?
            .ok_or_else(|| OrganizationError::InvalidName(format!("Organization not found: {}", name)))?;

        let pool = PoolRegistry::client_connection(&organization.database_name).await?;
        Ok(pool)
    }

    /// Tenant database name derived from the organization name:
    /// lowercased, non-alphanumerics folded to underscores.
    fn database_name_for(name: &str) -> String {
        let slug: String = name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();

        format!("hoa_nexus_{}", slug)
    }

    /// Validate organization name follows rules
    fn validate_name(name: &str) -> Result<(), OrganizationError> {
        if name.len() < 2 {
            return Err(OrganizationError::InvalidName(
                "Organization name must be at least 2 characters".to_string(),
            ));
        }

        if name.len() > 100 {
            return Err(OrganizationError::InvalidName(
                "Organization name must be less than 100 characters".to_string(),
            ));
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(OrganizationError::InvalidName(
                "Organization name can only contain letters, numbers, hyphens, and underscores".to_string(),
            ));
        }

        Ok(())
    }

    /// Check if the organization is already registered, by name or by the
    /// database its name would map to
    async fn organization_exists(&self, name: &str, database_name: &str) -> Result<bool, OrganizationError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM organizations WHERE name = $1 OR database_name = $2",
        )
        .bind(name)
        .bind(database_name)
        .fetch_one(self.master_pool.as_ref())
        .await?;

        Ok(count.0 > 0)
    }

    /// Check if the template database exists
    async fn template_exists(&self, template_db: &str) -> Result<bool, OrganizationError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pg_database WHERE datname = $1")
            .bind(template_db)
            .fetch_one(self.master_pool.as_ref())
            .await?;

        Ok(count.0 > 0)
    }

    /// Clone the template database into the new tenant database.
    /// CREATE DATABASE cannot be parameterized, so both identifiers are
    /// quoted; they come from validated input only.
    async fn clone_database(&self, source_db: &str, target_db: &str) -> Result<(), OrganizationError> {
        let admin_pool = PoolRegistry::client_connection("postgres").await?;

        let query = format!(
            "CREATE DATABASE {} WITH TEMPLATE {}",
            Self::quote_identifier(target_db),
            Self::quote_identifier(source_db)
        );

        sqlx::query(&query).execute(admin_pool.as_ref()).await?;

        info!("Cloned database {} -> {}", source_db, target_db);
        Ok(())
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_database_names() {
        assert_eq!(
            OrganizationService::database_name_for("Oakridge"),
            "hoa_nexus_oakridge"
        );
        assert_eq!(
            OrganizationService::database_name_for("lake-view_12"),
            "hoa_nexus_lake_view_12"
        );
    }

    #[test]
    fn validates_organization_names() {
        assert!(OrganizationService::validate_name("oakridge").is_ok());
        assert!(OrganizationService::validate_name("lake-view_12").is_ok());
        assert!(OrganizationService::validate_name("a").is_err());
        assert!(OrganizationService::validate_name("bad name").is_err());
        assert!(OrganizationService::validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(
            OrganizationService::quote_identifier("hoa_nexus_oakridge"),
            "\"hoa_nexus_oakridge\""
        );
        assert_eq!(
            OrganizationService::quote_identifier("we\"ird"),
            "\"we\"\"ird\""
        );
    }
}
