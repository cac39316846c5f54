//! Re-ranks baseline movie recommendations by blending their affinity score
//! with demographic, genre and synopsis signals.

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::{Config, RerankConfig};
pub use error::{AppError, AppResult};
