use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Read access to the website content, the contact form, and the account endpoints an
/// admin uses to obtain a token in the first place.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers. Does not touch the store.
        .route("/health", get(|| async { "ok" }))
        // POST /admin/register, POST /admin/login
        // Both return {token, email}. Login failures never reveal whether the email exists.
        .route("/admin/register", post(handlers::register_admin))
        .route("/admin/login", post(handlers::login_admin))
        .route("/gallery", get(handlers::list_gallery))
        .route("/achievements", get(handlers::list_achievements))
        // GET /team
        // Ordered by the manual `order` field, not by creation time.
        .route("/team", get(handlers::list_team))
        .route("/workshop", get(handlers::list_workshops))
        // POST /contact
        // Anyone may write; reading the submissions is gated.
        .route("/contact", post(handlers::submit_contact))
        // GET /about
        // Falls back to the built-in text until an admin stores one.
        .route("/about", get(handlers::get_about))
}
