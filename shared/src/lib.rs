//! Shared types for the table server
//!
//! Data models and the unified error/response types used by the server and
//! by API clients (staff terminals, booking page).

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};
