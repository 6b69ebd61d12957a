// Handlers behind the JWT and organization-validation middleware. All of
// them obtain their tenant pool from the registry through the request's
// TenantContext.
pub mod admin;
pub mod amenities;
pub mod assignments;
pub mod auth;
pub mod communities;
pub mod properties;
pub mod stakeholders;
pub mod tickets;
