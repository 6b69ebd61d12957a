use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Permission;
use crate::database::models::assignment::{Assignment, ASSIGNMENT_STATUSES};
use crate::database::{PoolRegistry, TenantContext};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthStakeholder};

#[derive(Debug, Deserialize)]
pub struct AssignmentQuery {
    pub ticket_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignment {
    pub ticket_id: Uuid,
    pub assigned_to: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssignment {
    pub status: Option<String>,
    pub notes: Option<String>,
}

fn validate_status(status: &str) -> Result<(), ApiError> {
    if ASSIGNMENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Unknown assignment status '{}', expected one of: {}",
            status,
            ASSIGNMENT_STATUSES.join(", ")
        )))
    }
}

/// GET /api/assignments[?ticket_id=&assigned_to=]
pub async fn list(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Query(query): Query<AssignmentQuery>,
) -> ApiResult<Vec<Assignment>> {
    auth.require(Permission::AssignmentRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let assignments = sqlx::query_as::<_, Assignment>(
        r#"
        SELECT id, ticket_id, assigned_to, assigned_by, notes, status,
               assigned_at, completed_at
        FROM assignments
        WHERE ($1::uuid IS NULL OR ticket_id = $1)
        AND ($2::uuid IS NULL OR assigned_to = $2)
        ORDER BY assigned_at DESC
        "#,
    )
    .bind(query.ticket_id)
    .bind(query.assigned_to)
    .fetch_all(pool.as_ref())
    .await?;

    Ok(ApiResponse::success(assignments))
}

/// GET /api/assignments/:id
pub async fn get(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Assignment> {
    auth.require(Permission::AssignmentRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let assignment = sqlx::query_as::<_, Assignment>(
        r#"
        SELECT id, ticket_id, assigned_to, assigned_by, notes, status,
               assigned_at, completed_at
        FROM assignments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Assignment {} not found", id)))?;

    Ok(ApiResponse::success(assignment))
}

/// POST /api/assignments - assign a ticket to a stakeholder
pub async fn create(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Json(payload): Json<CreateAssignment>,
) -> ApiResult<Assignment> {
    auth.require(Permission::AssignmentManage)?;
    let pool = PoolRegistry::connection(&context).await?;

    let assignment = sqlx::query_as::<_, Assignment>(
        r#"
        INSERT INTO assignments (ticket_id, assigned_to, assigned_by, notes, status)
        VALUES ($1, $2, $3, $4, 'assigned')
        RETURNING id, ticket_id, assigned_to, assigned_by, notes, status,
                  assigned_at, completed_at
        "#,
    )
    .bind(payload.ticket_id)
    .bind(payload.assigned_to)
    .bind(auth.id)
    .bind(&payload.notes)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(ApiResponse::created(assignment))
}

/// PUT /api/assignments/:id - a 'done' status stamps completed_at
pub async fn update(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssignment>,
) -> ApiResult<Assignment> {
    auth.require(Permission::AssignmentManage)?;

    if let Some(status) = payload.status.as_deref() {
        validate_status(status)?;
    }

    let pool = PoolRegistry::connection(&context).await?;

    let assignment = sqlx::query_as::<_, Assignment>(
        r#"
        UPDATE assignments
        SET status = COALESCE($2, status),
            notes = COALESCE($3, notes),
            completed_at = CASE
                WHEN COALESCE($2, status) = 'done' THEN COALESCE(completed_at, now())
                ELSE NULL
            END
        WHERE id = $1
        RETURNING id, ticket_id, assigned_to, assigned_by, notes, status,
                  assigned_at, completed_at
        "#,
    )
    .bind(id)
    .bind(&payload.status)
    .bind(&payload.notes)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Assignment {} not found", id)))?;

    Ok(ApiResponse::success(assignment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_assignment_status() {
        assert!(validate_status("assigned").is_ok());
        assert!(validate_status("done").is_ok());
        assert!(validate_status("cancelled").is_err());
    }
}
