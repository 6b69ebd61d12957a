use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, Claims, Permission, StakeholderType};
use crate::database::TenantContext;
use crate::error::ApiError;

/// Authenticated stakeholder context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthStakeholder {
    pub id: Uuid,
    pub email: String,
    pub organization: String,
    pub stakeholder_type: StakeholderType,
    pub database: Option<String>,
}

impl AuthStakeholder {
    pub fn require(&self, permission: Permission) -> Result<(), ApiError> {
        auth::permissions::require(self.stakeholder_type, permission)
    }
}

impl From<Claims> for AuthStakeholder {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            organization: claims.organization,
            stakeholder_type: claims.stakeholder_type,
            database: claims.database_name,
        }
    }
}

/// JWT authentication middleware.
///
/// Validates the bearer token, builds this request's TenantContext from the
/// databaseName claim and injects it together with the stakeholder before
/// anything downstream runs. Requests without a valid token never reach a
/// handler. A token without the claim leaves the context unset, which routes
/// the request to the default tenant database.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = auth::verify_jwt(&token)
        .map_err(|e| ApiError::unauthorized(format!("Invalid JWT token: {}", e)))?;

    let mut context = TenantContext::new();
    if let Some(database) = claims.database_name.as_deref() {
        context.set_database(database);
    }

    request.extensions_mut().insert(AuthStakeholder::from(claims));
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_and_malformed_headers() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert!(extract_bearer_token(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn claims_without_database_leave_context_unset() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "resident@oakridge.example".to_string(),
            "oakridge".to_string(),
            StakeholderType::Resident,
            None,
        );

        let stakeholder = AuthStakeholder::from(claims);
        assert!(stakeholder.database.is_none());
    }
}
