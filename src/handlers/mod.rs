pub mod health;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assembles the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/users/search",
            get(users::search_users_query).post(users::search_users),
        )
        .route("/users", post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .patch(users::patch_user)
                .delete(users::delete_user),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
