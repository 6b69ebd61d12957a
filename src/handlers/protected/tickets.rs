use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Permission;
use crate::database::models::ticket::{Ticket, TICKET_PRIORITIES, TICKET_STATUSES};
use crate::database::{PoolRegistry, TenantContext};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthStakeholder};

#[derive(Debug, Deserialize)]
pub struct TicketQuery {
    pub property_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTicket {
    pub property_id: Uuid,
    pub subject: String,
    pub description: String,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicket {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

fn validate_status(status: &str) -> Result<(), ApiError> {
    if TICKET_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Unknown ticket status '{}', expected one of: {}",
            status,
            TICKET_STATUSES.join(", ")
        )))
    }
}

fn validate_priority(priority: &str) -> Result<(), ApiError> {
    if TICKET_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Unknown ticket priority '{}', expected one of: {}",
            priority,
            TICKET_PRIORITIES.join(", ")
        )))
    }
}

/// GET /api/tickets[?property_id=&status=]
pub async fn list(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Query(query): Query<TicketQuery>,
) -> ApiResult<Vec<Ticket>> {
    auth.require(Permission::TicketRead)?;

    if let Some(status) = query.status.as_deref() {
        validate_status(status)?;
    }

    let pool = PoolRegistry::connection(&context).await?;

    // Both filters are optional; $1/$2 arrive as NULL when absent
    let tickets = sqlx::query_as::<_, Ticket>(
        r#"
        SELECT id, property_id, opened_by, subject, description, status, priority,
               created_at, updated_at, closed_at
        FROM tickets
        WHERE ($1::uuid IS NULL OR property_id = $1)
        AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(query.property_id)
    .bind(&query.status)
    .fetch_all(pool.as_ref())
    .await?;

    Ok(ApiResponse::success(tickets))
}

/// GET /api/tickets/:id
pub async fn get(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Ticket> {
    auth.require(Permission::TicketRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let ticket = sqlx::query_as::<_, Ticket>(
        r#"
        SELECT id, property_id, opened_by, subject, description, status, priority,
               created_at, updated_at, closed_at
        FROM tickets
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Ticket {} not found", id)))?;

    Ok(ApiResponse::success(ticket))
}

/// POST /api/tickets - open a ticket as the authenticated stakeholder
pub async fn create(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Json(payload): Json<CreateTicket>,
) -> ApiResult<Ticket> {
    auth.require(Permission::TicketCreate)?;

    let priority = payload.priority.as_deref().unwrap_or("normal");
    validate_priority(priority)?;

    if payload.subject.trim().is_empty() {
        return Err(ApiError::bad_request("Ticket subject cannot be empty"));
    }

    let pool = PoolRegistry::connection(&context).await?;

    let ticket = sqlx::query_as::<_, Ticket>(
        r#"
        INSERT INTO tickets (property_id, opened_by, subject, description, status, priority)
        VALUES ($1, $2, $3, $4, 'open', $5)
        RETURNING id, property_id, opened_by, subject, description, status, priority,
                  created_at, updated_at, closed_at
        "#,
    )
    .bind(payload.property_id)
    .bind(auth.id)
    .bind(&payload.subject)
    .bind(&payload.description)
    .bind(priority)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(ApiResponse::created(ticket))
}

/// PUT /api/tickets/:id - resolving or closing a ticket stamps closed_at
pub async fn update(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTicket>,
) -> ApiResult<Ticket> {
    auth.require(Permission::TicketManage)?;

    if let Some(status) = payload.status.as_deref() {
        validate_status(status)?;
    }
    if let Some(priority) = payload.priority.as_deref() {
        validate_priority(priority)?;
    }

    let pool = PoolRegistry::connection(&context).await?;

    let ticket = sqlx::query_as::<_, Ticket>(
        r#"
        UPDATE tickets
        SET subject = COALESCE($2, subject),
            description = COALESCE($3, description),
            status = COALESCE($4, status),
            priority = COALESCE($5, priority),
            closed_at = CASE
                WHEN COALESCE($4, status) IN ('resolved', 'closed') THEN COALESCE(closed_at, now())
                ELSE NULL
            END,
            updated_at = now()
        WHERE id = $1
        RETURNING id, property_id, opened_by, subject, description, status, priority,
                  created_at, updated_at, closed_at
        "#,
    )
    .bind(id)
    .bind(&payload.subject)
    .bind(&payload.description)
    .bind(&payload.status)
    .bind(&payload.priority)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Ticket {} not found", id)))?;

    Ok(ApiResponse::success(ticket))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_status_and_priority_values() {
        assert!(validate_status("open").is_ok());
        assert!(validate_status("in_progress").is_ok());
        assert!(validate_status("paused").is_err());

        assert!(validate_priority("urgent").is_ok());
        assert!(validate_priority("whenever").is_err());
    }
}
