use axum::extract::Extension;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthStakeholder, ValidatedOrganization};

/// GET /api/auth/whoami - Current stakeholder and organization from the
/// validated request context
pub async fn whoami(
    Extension(auth): Extension<AuthStakeholder>,
    Extension(ValidatedOrganization(organization)): Extension<ValidatedOrganization>,
) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "id": auth.id,
        "email": auth.email,
        "stakeholder_type": auth.stakeholder_type.as_str(),
        "organization": {
            "id": organization.id,
            "name": organization.name,
            "database": organization.database_name,
        },
    })))
}
