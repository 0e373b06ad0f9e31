// Authpay - token-authenticated payment API with PostgreSQL backup tooling

pub mod config;
pub mod models;
pub mod types;
pub mod routes;
pub mod middleware;
pub mod payment;
pub mod backup;    // pg_dump / psql wrappers
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
