//! Snappy API - Delivery marketplace backend
//!
//! Serves accounts with multiple roles (client, establishment owner, courier),
//! the product catalogue, image uploads and the payment handoff to Mercado
//! Pago.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: command-line entry points
//! - **config**: environment configuration and constants
//! - **domain**: server-side entities and value objects
//! - **services**: use cases
//! - **infra**: database, repositories, image storage, payment gateway
//! - **api**: handlers, middleware, routes
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! snappy serve --port 3000
//!
//! # Run migrations
//! snappy migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use crate::domain::{Password, User};
pub use errors::{AppError, AppResult};
