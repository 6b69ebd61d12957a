use axum::extract::{Extension, Path};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Permission;
use crate::database::models::Community;
use crate::database::{PoolRegistry, TenantContext};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthStakeholder};

#[derive(Debug, Deserialize)]
pub struct CreateCommunity {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommunity {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

/// GET /api/communities
pub async fn list(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
) -> ApiResult<Vec<Community>> {
    auth.require(Permission::CommunityRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let communities = sqlx::query_as::<_, Community>(
        r#"
        SELECT id, name, address, city, state, postal_code,
               created_at, updated_at, deleted_at
        FROM communities
        WHERE deleted_at IS NULL
        ORDER BY name
        "#,
    )
    .fetch_all(pool.as_ref())
    .await?;

    Ok(ApiResponse::success(communities))
}

/// GET /api/communities/:id
pub async fn get(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Community> {
    auth.require(Permission::CommunityRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let community = sqlx::query_as::<_, Community>(
        r#"
        SELECT id, name, address, city, state, postal_code,
               created_at, updated_at, deleted_at
        FROM communities
        WHERE id = $1
        AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Community {} not found", id)))?;

    Ok(ApiResponse::success(community))
}

/// POST /api/communities
pub async fn create(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Json(payload): Json<CreateCommunity>,
) -> ApiResult<Community> {
    auth.require(Permission::CommunityManage)?;
    let pool = PoolRegistry::connection(&context).await?;

    let community = sqlx::query_as::<_, Community>(
        r#"
        INSERT INTO communities (name, address, city, state, postal_code)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, address, city, state, postal_code,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.address)
    .bind(&payload.city)
    .bind(&payload.state)
    .bind(&payload.postal_code)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(ApiResponse::created(community))
}

/// PUT /api/communities/:id
pub async fn update(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCommunity>,
) -> ApiResult<Community> {
    auth.require(Permission::CommunityManage)?;
    let pool = PoolRegistry::connection(&context).await?;

    let community = sqlx::query_as::<_, Community>(
        r#"
        UPDATE communities
        SET name = COALESCE($2, name),
            address = COALESCE($3, address),
            city = COALESCE($4, city),
            state = COALESCE($5, state),
            postal_code = COALESCE($6, postal_code),
            updated_at = now()
        WHERE id = $1
        AND deleted_at IS NULL
        RETURNING id, name, address, city, state, postal_code,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.address)
    .bind(&payload.city)
    .bind(&payload.state)
    .bind(&payload.postal_code)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Community {} not found", id)))?;

    Ok(ApiResponse::success(community))
}

/// DELETE /api/communities/:id - soft delete
pub async fn delete(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    auth.require(Permission::CommunityManage)?;
    let pool = PoolRegistry::connection(&context).await?;

    let deleted = sqlx::query(
        r#"
        UPDATE communities
        SET deleted_at = now(), updated_at = now()
        WHERE id = $1
        AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool.as_ref())
    .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Community {} not found", id)));
    }

    Ok(ApiResponse::<()>::no_content())
}
