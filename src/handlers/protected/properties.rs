use axum::extract::{Extension, Path, Query};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Permission;
use crate::database::models::Property;
use crate::database::{PoolRegistry, TenantContext};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthStakeholder};

#[derive(Debug, Deserialize)]
pub struct PropertyQuery {
    pub community_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProperty {
    pub community_id: Uuid,
    pub address: String,
    pub unit: Option<String>,
    pub bedrooms: Option<i32>,
    pub monthly_assessment: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProperty {
    pub address: Option<String>,
    pub unit: Option<String>,
    pub bedrooms: Option<i32>,
    pub monthly_assessment: Option<Decimal>,
}

/// GET /api/properties[?community_id=]
pub async fn list(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Query(query): Query<PropertyQuery>,
) -> ApiResult<Vec<Property>> {
    auth.require(Permission::PropertyRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let properties = match query.community_id {
        Some(community_id) => {
            sqlx::query_as::<_, Property>(
                r#"
                SELECT id, community_id, address, unit, bedrooms, monthly_assessment,
                       created_at, updated_at, deleted_at
                FROM properties
                WHERE community_id = $1
                AND deleted_at IS NULL
                ORDER BY address, unit
                "#,
            )
            .bind(community_id)
            .fetch_all(pool.as_ref())
            .await?
        }
        None => {
            sqlx::query_as::<_, Property>(
                r#"
                SELECT id, community_id, address, unit, bedrooms, monthly_assessment,
                       created_at, updated_at, deleted_at
                FROM properties
                WHERE deleted_at IS NULL
                ORDER BY address, unit
                "#,
            )
            .fetch_all(pool.as_ref())
            .await?
        }
    };

    Ok(ApiResponse::success(properties))
}

/// GET /api/properties/:id
pub async fn get(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Property> {
    auth.require(Permission::PropertyRead)?;
    let pool = PoolRegistry::connection(&context).await?;

    let property = sqlx::query_as::<_, Property>(
        r#"
        SELECT id, community_id, address, unit, bedrooms, monthly_assessment,
               created_at, updated_at, deleted_at
        FROM properties
        WHERE id = $1
        AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Property {} not found", id)))?;

    Ok(ApiResponse::success(property))
}

/// POST /api/properties
pub async fn create(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Json(payload): Json<CreateProperty>,
) -> ApiResult<Property> {
    auth.require(Permission::PropertyManage)?;

    if payload.monthly_assessment.is_sign_negative() {
        return Err(ApiError::bad_request("Monthly assessment cannot be negative"));
    }

    let pool = PoolRegistry::connection(&context).await?;

    let property = sqlx::query_as::<_, Property>(
        r#"
        INSERT INTO properties (community_id, address, unit, bedrooms, monthly_assessment)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, community_id, address, unit, bedrooms, monthly_assessment,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(payload.community_id)
    .bind(&payload.address)
    .bind(&payload.unit)
    .bind(payload.bedrooms)
    .bind(payload.monthly_assessment)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(ApiResponse::created(property))
}

/// PUT /api/properties/:id
pub async fn update(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProperty>,
) -> ApiResult<Property> {
    auth.require(Permission::PropertyManage)?;

    if payload.monthly_assessment.is_some_and(|amount| amount.is_sign_negative()) {
        return Err(ApiError::bad_request("Monthly assessment cannot be negative"));
    }

    let pool = PoolRegistry::connection(&context).await?;

    let property = sqlx::query_as::<_, Property>(
        r#"
        UPDATE properties
        SET address = COALESCE($2, address),
            unit = COALESCE($3, unit),
            bedrooms = COALESCE($4, bedrooms),
            monthly_assessment = COALESCE($5, monthly_assessment),
            updated_at = now()
        WHERE id = $1
        AND deleted_at IS NULL
        RETURNING id, community_id, address, unit, bedrooms, monthly_assessment,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(id)
    .bind(&payload.address)
    .bind(&payload.unit)
    .bind(payload.bedrooms)
    .bind(payload.monthly_assessment)
    .fetch_optional(pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::not_found(format!("Property {} not found", id)))?;

    Ok(ApiResponse::success(property))
}

/// DELETE /api/properties/:id - soft delete
pub async fn delete(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(context): Extension<TenantContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    auth.require(Permission::PropertyManage)?;
    let pool = PoolRegistry::connection(&context).await?;

    let deleted = sqlx::query(
        r#"
        UPDATE properties
        SET deleted_at = now(), updated_at = now()
        WHERE id = $1
        AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool.as_ref())
    .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Property {} not found", id)));
    }

    Ok(ApiResponse::<()>::no_content())
}
