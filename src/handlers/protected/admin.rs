use axum::extract::{Extension, Path};
use axum::Json;
use serde::Deserialize;

use crate::auth::Permission;
use crate::database::models::Organization;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthStakeholder};
use crate::services::OrganizationService;

#[derive(Debug, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
}

/// GET /api/admin/organizations
pub async fn list_organizations(
    Extension(auth): Extension<AuthStakeholder>,
) -> ApiResult<Vec<Organization>> {
    auth.require(Permission::OrganizationAdmin)?;

    let service = OrganizationService::new().await?;
    let organizations = service.list_organizations().await?;

    Ok(ApiResponse::success(organizations))
}

/// POST /api/admin/organizations - provision a new organization and its
/// tenant database
pub async fn create_organization(
    Extension(auth): Extension<AuthStakeholder>,
    Json(payload): Json<CreateOrganization>,
) -> ApiResult<Organization> {
    auth.require(Permission::OrganizationAdmin)?;

    let service = OrganizationService::new().await?;
    let organization = service.create_organization(&payload.name).await?;

    Ok(ApiResponse::created(organization))
}

/// DELETE /api/admin/organizations/:name - deactivate (tenant database is
/// kept)
pub async fn deactivate_organization(
    Extension(auth): Extension<AuthStakeholder>,
    Path(name): Path<String>,
) -> ApiResult<Organization> {
    auth.require(Permission::OrganizationAdmin)?;

    let service = OrganizationService::new().await?;
    let organization = service
        .deactivate_organization(&name)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Organization '{}' not found", name)))?;

    Ok(ApiResponse::success(organization))
}
