//! Video Market Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod storage;

pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};
pub use storage::VideoStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub store: VideoStore,
}

impl AppState {
    /// Create a new AppState with the given database and configuration.
    /// The blob store root is derived from the configured storage directory.
    pub fn new(db: Db, config: Config) -> Self {
        let store = VideoStore::new(&config.storage_dir);
        Self { db, config, store }
    }
}
