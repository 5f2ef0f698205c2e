pub mod config;
pub mod db;
pub mod errors;
pub mod fixtures;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod startup;

#[cfg(test)]
mod testing;

use db::SharedStore;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: config::AppConfig,
}
