use axum::{extract::Request, middleware::Next, response::Response};

use crate::config;
use crate::database::models::Organization;
use crate::database::{PoolRegistry, TenantContext};
use crate::error::ApiError;

use super::auth::AuthStakeholder;

/// Organization record validated against the master database for this
/// request, injected for handlers that need it (e.g. whoami).
#[derive(Clone, Debug)]
pub struct ValidatedOrganization(pub Organization);

/// Middleware that checks the tenant database claimed by the JWT against
/// the master organizations registry. The organization must exist and be
/// active; otherwise the request is rejected before any handler touches the
/// tenant database.
pub async fn validate_organization_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = request
        .extensions()
        .get::<AuthStakeholder>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before organization validation"))?;

    let context = request
        .extensions()
        .get::<TenantContext>()
        .cloned()
        .unwrap_or_default();

    let database = context
        .database()
        .unwrap_or(config::config().database.default_db.as_str())
        .to_string();

    let master_pool = PoolRegistry::master_connection().await?;

    let organization = sqlx::query_as::<_, Organization>(
        r#"
        SELECT id, name, database_name, active, created_at, updated_at
        FROM organizations
        WHERE database_name = $1
        AND active = true
        "#,
    )
    .bind(&database)
    .fetch_optional(master_pool.as_ref())
    .await
    .map_err(|e| {
        tracing::error!("Database error validating organization: {}", e);
        ApiError::from(e)
    })?
    .ok_or_else(|| {
        tracing::warn!(
            "Organization validation failed: database '{}' not registered or inactive",
            database
        );
        ApiError::forbidden(format!(
            "Organization '{}' is not active or does not exist",
            auth.organization
        ))
    })?;

    tracing::debug!(
        "Organization validation successful: {} ({})",
        organization.name,
        organization.database_name
    );

    request.extensions_mut().insert(ValidatedOrganization(organization));

    Ok(next.run(request).await)
}
