use axum::extract::{Extension, Path};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::auth::{password, Permission, StakeholderType};
use crate::database::models::Stakeholder;
use crate::database::{PoolRegistry, TenantContext};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthStakeholder};

#[derive(Debug, Deserialize)]
pub struct CreateStakeholder {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub stakeholder_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStakeholder {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub stakeholder_type: Option<String>,
    pub active: Option<bool>,
}

/// Creation response: the generated temporary password is returned exactly
/// once; only its hash is stored.
#[derive(Debug, Serialize)]
pub struct CreatedStakeholder {
    pub stakeholder: Stakeholder,
    pub temporary_password: String,
}

fn parse_stakeholder_type(value: &str) -> Result<StakeholderType, ApiError> {
    StakeholderType::from_str(value)
        .map_err(|_| ApiError::bad_request(format!("Unknown stakeholder type: {}", value)))
}

/// GET /api/stakeholders
pub async fn list(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
) -> ApiResult<Vec<Stakeholder>> {
    auth.require(Permission::StakeholderRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let stakeholders = sqlx::query_as::<_, Stakeholder>(
        r#"
        SELECT id, first_name, last_name, email, phone, stakeholder_type,
               password_hash, active, created_at, updated_at, deleted_at
        FROM stakeholders
        WHERE deleted_at IS NULL
        ORDER BY last_name, first_name
        "#,
    )
    .fetch_all(pool.as_ref())
    .await?;

    Ok(ApiResponse::success(stakeholders))
}

/// GET /api/stakeholders/:id
pub async fn get(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Stakeholder> {
    auth.require(Permission::StakeholderRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let stakeholder = sqlx::query_as::<_, Stakeholder>(
        r#"
        SELECT id, first_name, last_name, email, phone, stakeholder_type,
               password_hash, active, created_at, updated_at, deleted_at
        FROM stakeholders
        WHERE id = $1
        AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Stakeholder {} not found", id)))?;

    Ok(ApiResponse::success(stakeholder))
}

/// POST /api/stakeholders - create a stakeholder with a generated
/// temporary password
pub async fn create(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Json(payload): Json<CreateStakeholder>,
) -> ApiResult<CreatedStakeholder> {
    auth.require(Permission::StakeholderManage)?;
    parse_stakeholder_type(&payload.stakeholder_type)?;

    let temporary_password = password::generate_temporary_password();
    let password_hash = password::hash_password(&temporary_password).map_err(|e| {
        tracing::error!("Failed to hash generated password: {}", e);
        ApiError::internal_server_error("Failed to create stakeholder")
    })?;

    let pool = PoolRegistry::connection(&context).await?;

    let stakeholder = sqlx::query_as::<_, Stakeholder>(
        r#"
        INSERT INTO stakeholders (first_name, last_name, email, phone, stakeholder_type, password_hash, active)
        VALUES ($1, $2, $3, $4, $5, $6, true)
        RETURNING id, first_name, last_name, email, phone, stakeholder_type,
                  password_hash, active, created_at, updated_at, deleted_at
        "#,
    )
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.stakeholder_type)
    .bind(&password_hash)
    .fetch_one(pool.as_ref())
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::conflict(format!("A stakeholder with email '{}' already exists", payload.email))
        }
        _ => ApiError::from(e),
    })?;

    Ok(ApiResponse::created(CreatedStakeholder {
        stakeholder,
        temporary_password,
    }))
}

/// PUT /api/stakeholders/:id
pub async fn update(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStakeholder>,
) -> ApiResult<Stakeholder> {
    auth.require(Permission::StakeholderManage)?;

    if let Some(stakeholder_type) = payload.stakeholder_type.as_deref() {
        parse_stakeholder_type(stakeholder_type)?;
    }

    let pool = PoolRegistry::connection(&context).await?;

    let stakeholder = sqlx::query_as::<_, Stakeholder>(
        r#"
        UPDATE stakeholders
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            phone = COALESCE($4, phone),
            stakeholder_type = COALESCE($5, stakeholder_type),
            active = COALESCE($6, active),
            updated_at = now()
        WHERE id = $1
        AND deleted_at IS NULL
        RETURNING id, first_name, last_name, email, phone, stakeholder_type,
                  password_hash, active, created_at, updated_at, deleted_at
        "#,
    )
    .bind(id)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.phone)
    .bind(&payload.stakeholder_type)
    .bind(payload.active)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Stakeholder {} not found", id)))?;

    Ok(ApiResponse::success(stakeholder))
}

/// POST /api/stakeholders/:id/reset-password - issue a fresh temporary
/// password
pub async fn reset_password(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<CreatedStakeholder> {
    auth.require(Permission::StakeholderManage)?;

    let temporary_password = password::generate_temporary_password();
    let password_hash = password::hash_password(&temporary_password).map_err(|e| {
        tracing::error!("Failed to hash generated password: {}", e);
        ApiError::internal_server_error("Failed to reset password")
    })?;

    let pool = PoolRegistry::connection(&context).await?;

    let stakeholder = sqlx::query_as::<_, Stakeholder>(
        r#"
        UPDATE stakeholders
        SET password_hash = $2, updated_at = now()
        WHERE id = $1
        AND deleted_at IS NULL
        RETURNING id, first_name, last_name, email, phone, stakeholder_type,
                  password_hash, active, created_at, updated_at, deleted_at
        "#,
    )
    .bind(id)
    .bind(&password_hash)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Stakeholder {} not found", id)))?;

    Ok(ApiResponse::success(CreatedStakeholder {
        stakeholder,
        temporary_password,
    }))
}

/// DELETE /api/stakeholders/:id - soft delete
pub async fn delete(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    auth.require(Permission::StakeholderManage)?;
    let pool = PoolRegistry::connection(&context).await?;

    let deleted = sqlx::query(
        r#"
        UPDATE stakeholders
        SET deleted_at = now(), active = false, updated_at = now()
        WHERE id = $1
        AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool.as_ref())
    .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Stakeholder {} not found", id)));
    }

    Ok(ApiResponse::<()>::no_content())
}
