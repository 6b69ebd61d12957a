pub mod auth;
pub mod organization;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthStakeholder};
pub use organization::{validate_organization_middleware, ValidatedOrganization};
pub use response::{ApiResponse, ApiResult};
