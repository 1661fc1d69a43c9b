//! Athenaeum Library Catalog
//!
//! A Rust server for browsing a library catalog and managing its loanable
//! copies, providing a REST JSON API for authors, books, genres, languages
//! and loan renewals.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
