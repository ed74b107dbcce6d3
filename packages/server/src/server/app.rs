//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::member::MemberWorkflow;
use crate::kernel::PgMemberStore;
use crate::server::routes::{
    find_member_by_name, health_handler, register_member, remove_member_by_name,
    update_member_by_name,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub members: Arc<MemberWorkflow>,
}

/// Build the Axum application router.
///
/// Wires the Postgres-backed store into the member workflow and mounts the
/// four member handlers plus the health check.
pub fn build_app(pool: PgPool) -> Router {
    let store = Arc::new(PgMemberStore::new(pool.clone()));
    let members = Arc::new(MemberWorkflow::new(store));

    let app_state = AppState {
        db_pool: pool,
        members,
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        // One resource path per entity; a mismatched verb gets 405 from the
        // method router before the workflow is ever invoked.
        .route(
            "/members",
            get(find_member_by_name)
                .post(register_member)
                .put(update_member_by_name)
                .delete(remove_member_by_name),
        )
        .route("/health", get(health_handler))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
