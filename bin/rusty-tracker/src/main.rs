//! # Rusty-Tracker Binary
//!
//! The entry point that assembles the application based on compile-time
//! features: one store plugin, the shared app state, and the HTTP server.

use actix_web::{web, App, HttpServer};
use rt_api::handlers::AppState;
use rt_api::middleware;

#[cfg(feature = "db-sqlite")]
use rt_db_sqlite::SqliteStore;

#[cfg(all(feature = "db-memory", not(feature = "db-sqlite")))]
use rt_db_memory::MemoryStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);

    // 1. Initialize the store implementation. The process opens its store
    //    once and reuses the handle for its lifetime.
    #[cfg(feature = "db-sqlite")]
    let store = {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:rusty_tracker.db".to_string());
        SqliteStore::new(&url)
            .await
            .expect("Failed to open SQLite store")
    };

    #[cfg(all(feature = "db-memory", not(feature = "db-sqlite")))]
    let store = MemoryStore::new();

    // 2. Wrap in AppState (dynamic dispatch keeps the API crate plugin-free)
    let state = web::Data::new(AppState {
        items: Box::new(store.clone()),
        settings: Box::new(store),
    });

    log::info!("rusty-tracker listening on http://{bind_addr}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            .configure(rt_api::configure_routes)
    })
    .bind((bind_addr.as_str(), port))?
    .run()
    .await
}
