use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{applications, export, interviews};

/// All routes. Everything under `/api` requires a bearer token.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route(
            "/applications/of-user",
            delete(applications::delete_user_applications),
        )
        .route(
            "/applications/{id}",
            get(applications::get_application)
                .put(applications::update_application)
                .delete(applications::delete_application),
        )
        .route("/interviews", post(interviews::create_interview))
        .route("/interviews/{id}", get(interviews::get_interview))
        .route("/interviews/{id}/comments", post(interviews::add_comment))
        .route(
            "/interviews/{id}/comments/{comment_id}",
            delete(interviews::delete_comment),
        )
        .route("/export", get(export::export_report))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}

async fn health() -> &'static str {
    "ok"
}
