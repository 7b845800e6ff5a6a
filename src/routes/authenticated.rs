use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Every mutation of website content plus the contact inbox. There is one flat admin
/// role, so passing the gate layered over this router is the whole authorization check;
/// handlers never re-inspect the identity except `/admin/me`, which echoes it.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/admin/me", get(handlers::get_me))
        // --- Gallery ---
        .route("/gallery", post(handlers::create_gallery_photo))
        .route(
            "/gallery/{id}",
            put(handlers::update_gallery_photo).delete(handlers::delete_gallery_photo),
        )
        // --- Achievements ---
        .route("/achievements", post(handlers::create_achievement))
        .route(
            "/achievements/{id}",
            put(handlers::update_achievement).delete(handlers::delete_achievement),
        )
        // --- Team ---
        .route("/team", post(handlers::create_team_member))
        .route(
            "/team/{id}",
            put(handlers::update_team_member).delete(handlers::delete_team_member),
        )
        // --- Workshops ---
        .route("/workshop", post(handlers::create_workshop))
        .route(
            "/workshop/{id}",
            put(handlers::update_workshop).delete(handlers::delete_workshop),
        )
        // GET /contact
        // The inbox of contact-form submissions, newest first.
        .route("/contact", get(handlers::list_contact_submissions))
        // PUT /about
        // Replaces the singleton about record wholesale.
        .route("/about", put(handlers::update_about))
}
