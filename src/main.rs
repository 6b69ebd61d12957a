use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use hoa_nexus_api::database::PoolRegistry;
use hoa_nexus_api::handlers;
use hoa_nexus_api::middleware::{jwt_auth_middleware, validate_organization_middleware};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, HOA_DEFAULT_DB, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = hoa_nexus_api::config::config();
    tracing::info!("Starting HOA Nexus API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("HOA_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("HOA Nexus API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(handlers::public::auth::login))
        // Protected API, gated by JWT + organization validation
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Everything under /api. The JWT layer runs first (outermost) and builds
/// the request's tenant context; the organization layer then checks the
/// claimed database against the master registry.
fn protected_routes() -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(community_routes())
        .merge(property_routes())
        .merge(stakeholder_routes())
        .merge(amenity_routes())
        .merge(ticket_routes())
        .merge(assignment_routes())
        .merge(admin_routes())
        .layer(from_fn(validate_organization_middleware))
        .layer(from_fn(jwt_auth_middleware))
}

fn auth_routes() -> Router {
    use handlers::protected::auth;

    Router::new().route("/api/auth/whoami", get(auth::whoami))
}

fn community_routes() -> Router {
    use handlers::protected::communities;

    Router::new()
        .route(
            "/api/communities",
            get(communities::list).post(communities::create),
        )
        .route(
            "/api/communities/:id",
            get(communities::get)
                .put(communities::update)
                .delete(communities::delete),
        )
}

fn property_routes() -> Router {
    use handlers::protected::properties;

    Router::new()
        .route(
            "/api/properties",
            get(properties::list).post(properties::create),
        )
        .route(
            "/api/properties/:id",
            get(properties::get)
                .put(properties::update)
                .delete(properties::delete),
        )
}

fn stakeholder_routes() -> Router {
    use handlers::protected::stakeholders;

    Router::new()
        .route(
            "/api/stakeholders",
            get(stakeholders::list).post(stakeholders::create),
        )
        .route(
            "/api/stakeholders/:id",
            get(stakeholders::get)
                .put(stakeholders::update)
                .delete(stakeholders::delete),
        )
        .route(
            "/api/stakeholders/:id/reset-password",
            post(stakeholders::reset_password),
        )
}

fn amenity_routes() -> Router {
    use handlers::protected::amenities;

    Router::new()
        .route(
            "/api/amenities",
            get(amenities::list).post(amenities::create),
        )
        .route(
            "/api/amenities/:id",
            get(amenities::get)
                .put(amenities::update)
                .delete(amenities::delete),
        )
}

fn ticket_routes() -> Router {
    use handlers::protected::tickets;

    Router::new()
        .route("/api/tickets", get(tickets::list).post(tickets::create))
        .route("/api/tickets/:id", get(tickets::get).put(tickets::update))
}

fn assignment_routes() -> Router {
    use handlers::protected::assignments;

    Router::new()
        .route(
            "/api/assignments",
            get(assignments::list).post(assignments::create),
        )
        .route(
            "/api/assignments/:id",
            get(assignments::get).put(assignments::update),
        )
}

fn admin_routes() -> Router {
    use handlers::protected::admin;

    Router::new()
        .route(
            "/api/admin/organizations",
            get(admin::list_organizations).post(admin::create_organization),
        )
        .route(
            "/api/admin/organizations/:name",
            axum::routing::delete(admin::deactivate_organization),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "HOA Nexus API",
            "version": version,
            "description": "Multi-tenant HOA management backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/auth/login (public - token acquisition)",
                "auth": "/api/auth/whoami (protected)",
                "communities": "/api/communities[/:id] (protected)",
                "properties": "/api/properties[/:id] (protected)",
                "stakeholders": "/api/stakeholders[/:id] (protected)",
                "amenities": "/api/amenities[/:id] (protected)",
                "tickets": "/api/tickets[/:id] (protected)",
                "assignments": "/api/assignments[/:id] (protected)",
                "admin": "/api/admin/organizations (restricted, requires admin)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match PoolRegistry::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
