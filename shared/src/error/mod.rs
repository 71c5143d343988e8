//! Unified error system for the table server
//!
//! This module provides the transport-level error handling:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Reservation errors
//! - 4xxx: Order errors
//! - 5xxx: Customer errors
//! - 6xxx: Product errors
//! - 7xxx: Table errors
//! - 8xxx: Inventory errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::with_message(ErrorCode::NoActiveOccupant, "Table 4 has no open visit")
//!     .with_detail("table_id", 4);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(3004));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
