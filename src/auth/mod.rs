use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

pub mod password;
pub mod permissions;

pub use permissions::{Permission, StakeholderType};

/// JWT claims issued at login.
///
/// `databaseName` names the organization's tenant database; the auth
/// middleware copies it into the request's TenantContext. A token without
/// the claim routes to the configured default tenant database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub organization: String,
    #[serde(rename = "stakeholderType")]
    pub stakeholder_type: StakeholderType,
    #[serde(rename = "databaseName", skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(
        sub: Uuid,
        email: String,
        organization: String,
        stakeholder_type: StakeholderType,
        database_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub,
            email,
            organization,
            stakeholder_type,
            database_name,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn verify_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> Claims {
        Claims::new(
            Uuid::new_v4(),
            "board@oakridge.example".to_string(),
            "oakridge".to_string(),
            StakeholderType::Board,
            Some("hoa_nexus_oakridge".to_string()),
        )
    }

    #[tokio::test]
    async fn round_trips_claims() {
        let claims = sample_claims();
        let token = generate_jwt(&claims).expect("token");
        let decoded = verify_jwt(&token).expect("claims");

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.email, claims.email);
        assert_eq!(decoded.stakeholder_type, StakeholderType::Board);
        assert_eq!(decoded.database_name.as_deref(), Some("hoa_nexus_oakridge"));
    }

    #[tokio::test]
    async fn rejects_tampered_token() {
        let token = generate_jwt(&sample_claims()).expect("token");
        let mut tampered = token.clone();
        tampered.push('x');

        assert!(verify_jwt(&tampered).is_err());
    }

    #[test]
    fn database_claim_is_optional_on_the_wire() {
        let json = serde_json::json!({
            "sub": Uuid::new_v4(),
            "email": "owner@oakridge.example",
            "organization": "oakridge",
            "stakeholderType": "owner",
            "exp": Utc::now().timestamp() + 3600,
            "iat": Utc::now().timestamp(),
        });

        let claims: Claims = serde_json::from_value(json).expect("claims without databaseName");
        assert!(claims.database_name.is_none());
    }
}
