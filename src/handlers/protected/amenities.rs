use axum::extract::{Extension, Path, Query};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Permission;
use crate::database::models::Amenity;
use crate::database::{PoolRegistry, TenantContext};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthStakeholder};

#[derive(Debug, Deserialize)]
pub struct AmenityQuery {
    pub community_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAmenity {
    pub community_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub booking_fee: Decimal,
    pub capacity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAmenity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub booking_fee: Option<Decimal>,
    pub capacity: Option<i32>,
    pub active: Option<bool>,
}

/// GET /api/amenities[?community_id=]
pub async fn list(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Query(query): Query<AmenityQuery>,
) -> ApiResult<Vec<Amenity>> {
    auth.require(Permission::AmenityRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let amenities = match query.community_id {
        Some(community_id) => {
            sqlx::query_as::<_, Amenity>(
                r#"
                SELECT id, community_id, name, description, booking_fee, capacity,
                       active, created_at, updated_at, deleted_at
                FROM amenities
                WHERE community_id = $1
                AND deleted_at IS NULL
                ORDER BY name
                "#,
            )
            .bind(community_id)
            .fetch_all(pool.as_ref())
            .await?
        }
        None => {
            sqlx::query_as::<_, Amenity>(
                r#"
                SELECT id, community_id, name, description, booking_fee, capacity,
                       active, created_at, updated_at, deleted_at
                FROM amenities
                WHERE deleted_at IS NULL
                ORDER BY name
                "#,
            )
            .fetch_all(pool.as_ref())
            .await?
        }
    };

    Ok(ApiResponse::success(amenities))
}

/// GET /api/amenities/:id
pub async fn get(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Amenity> {
    auth.require(Permission::AmenityRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let amenity = sqlx::query_as::<_, Amenity>(
        r#"
        SELECT id, community_id, name, description, booking_fee, capacity,
               active, created_at, updated_at, deleted_at
        FROM amenities
        WHERE id = $1
        AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Amenity {} not found", id)))?;

    Ok(ApiResponse::success(amenity))
}

/// POST /api/amenities
pub async fn create(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Json(payload): Json<CreateAmenity>,
) -> ApiResult<Amenity> {
    auth.require(Permission::AmenityManage)?;

    if payload.booking_fee.is_sign_negative() {
        return Err(ApiError::bad_request("Booking fee cannot be negative"));
    }
    if payload.capacity < 0 {
        return Err(ApiError::bad_request("Capacity cannot be negative"));
    }

    let pool = PoolRegistry::connection(&context).await?;

    let amenity = sqlx::query_as::<_, Amenity>(
        r#"
        INSERT INTO amenities (community_id, name, description, booking_fee, capacity, active)
        VALUES ($1, $2, $3, $4, $5, true)
        RETURNING id, community_id, name, description, booking_fee, capacity,
                  active, created_at, updated_at, deleted_at
        "#,
    )
    .bind(payload.community_id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.booking_fee)
    .bind(payload.capacity)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(ApiResponse::created(amenity))
}

/// PUT /api/amenities/:id
pub async fn update(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAmenity>,
) -> ApiResult<Amenity> {
    auth.require(Permission::AmenityManage)?;

    if payload.booking_fee.is_some_and(|fee| fee.is_sign_negative()) {
        return Err(ApiError::bad_request("Booking fee cannot be negative"));
    }

    let pool = PoolRegistry::connection(&context).await?;

    let amenity = sqlx::query_as::<_, Amenity>(
        r#"
        UPDATE amenities
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            booking_fee = COALESCE($4, booking_fee),
            capacity = COALESCE($5, capacity),
            active = COALESCE($6, active),
            updated_at = now()
        WHERE id = $1
        AND deleted_at IS NULL
        RETURNING id, community_id, name, description, booking_fee, capacity,
                  active, created_at, updated_at, deleted_at
        "#,
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.booking_fee)
    .bind(payload.capacity)
    .bind(payload.active)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Amenity {} not found", id)))?;

    Ok(ApiResponse::success(amenity))
}

/// DELETE /api/amenities/:id - soft delete
pub async fn delete(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    auth.require(Permission::AmenityManage)?;
    let pool = PoolRegistry::connection(&context).await?;

    let deleted = sqlx::query(
        r#"
        UPDATE amenities
        SET deleted_at = now(), active = false, updated_at = now()
        WHERE id = $1
        AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool.as_ref())
    .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Amenity {} not found", id)));
    }

    Ok(ApiResponse::<()>::no_content())
}
