//! userdb - pooled MySQL access to the `utilisateurs` and `JOUEUR` tables
//!
//! The crate exposes repositories over an explicitly constructed connection
//! pool, thin services that validate input, and an interactive console menu.

pub mod config;
pub mod domain;
pub mod error;
pub mod menu;
pub mod migration;
pub mod repository;
pub mod service;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorKind, Result};
pub use repository::DbPool;
