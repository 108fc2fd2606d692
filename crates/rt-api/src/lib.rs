//! # rt-api
//!
//! The web routing and orchestration layer for Rusty-Tracker.

pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the REST routes.
///
/// # Developer Note
/// We use a scoped configuration so the main binary can mount the API
/// under a different prefix if needed (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/items", web::get().to(handlers::list_items))
            .route("/items", web::post().to(handlers::create_item))
            .route("/items/{id}", web::put().to(handlers::update_item))
            .route("/items/{id}", web::delete().to(handlers::delete_item))
            .route("/settings", web::get().to(handlers::get_settings))
            .route("/settings", web::put().to(handlers::put_settings)),
    );
}
