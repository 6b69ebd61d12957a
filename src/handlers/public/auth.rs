use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::auth::{self, password, Claims, StakeholderType};
use crate::config;
use crate::database::models::{Organization, Stakeholder};
use crate::database::PoolRegistry;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub organization: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub stakeholder: LoginStakeholder,
}

#[derive(Debug, Serialize)]
pub struct LoginStakeholder {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub stakeholder_type: String,
    pub organization: String,
    pub database: String,
}

/// POST /auth/login - Authenticate a stakeholder and receive a JWT token
///
/// Looks the organization up in the master database, fetches the
/// stakeholder from that organization's tenant database, verifies the
/// password hash and issues a token whose databaseName claim routes every
/// subsequent request to the right tenant database.
///
/// Expected Input:
/// ```json
/// {
///   "organization": "oakridge",
///   "email": "board@oakridge.example",
///   "password": "string"
/// }
/// ```
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    let master_pool = PoolRegistry::master_connection().await?;

    let organization = sqlx::query_as::<_, Organization>(
        r#"
        SELECT id, name, database_name, active, created_at, updated_at
        FROM organizations
        WHERE name = $1
        AND active = true
        "#,
    )
    .bind(&payload.organization)
    .fetch_optional(master_pool.as_ref())
    .await?
    .ok_or_else(|| {
        tracing::warn!("Login failed: unknown or inactive organization '{}'", payload.organization);
        ApiError::unauthorized("Invalid credentials")
    })?;

    let tenant_pool = PoolRegistry::client_connection(&organization.database_name).await?;

    let stakeholder = sqlx::query_as::<_, Stakeholder>(
        r#"
        SELECT id, first_name, last_name, email, phone, stakeholder_type,
               password_hash, active, created_at, updated_at, deleted_at
        FROM stakeholders
        WHERE email = $1
        AND active = true
        AND deleted_at IS NULL
        "#,
    )
    .bind(&payload.email)
    .fetch_optional(tenant_pool.as_ref())
    .await?
    .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let password_ok = password::verify_password(&payload.password, &stakeholder.password_hash)
        .map_err(|e| {
            tracing::error!("Password verification failed for '{}': {}", payload.email, e);
            ApiError::internal_server_error("Failed to verify credentials")
        })?;

    if !password_ok {
        tracing::warn!(
            "Login failed: bad password for '{}' in '{}'",
            payload.email,
            organization.name
        );
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let stakeholder_type = StakeholderType::from_str(&stakeholder.stakeholder_type).map_err(|e| {
        tracing::error!("Stakeholder {} has bad type on record: {}", stakeholder.id, e);
        ApiError::internal_server_error("Stakeholder record is invalid")
    })?;

    let claims = Claims::new(
        stakeholder.id,
        stakeholder.email.clone(),
        organization.name.clone(),
        stakeholder_type,
        Some(organization.database_name.clone()),
    );
    let token = auth::generate_jwt(&claims)?;

    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in,
        stakeholder: LoginStakeholder {
            id: stakeholder.id,
            email: stakeholder.email,
            first_name: stakeholder.first_name,
            last_name: stakeholder.last_name,
            stakeholder_type: stakeholder.stakeholder_type,
            organization: organization.name,
            database: organization.database_name,
        },
    }))
}
