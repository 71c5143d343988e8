//! Unified error codes for the table server
//!
//! This module defines all error codes used by the table server and its clients
//! (staff terminals, booking page). Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Reservation / occupancy errors
//! - 4xxx: Order errors
//! - 5xxx: Customer errors
//! - 6xxx: Product errors
//! - 7xxx: Table errors
//! - 8xxx: Inventory errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Request carries no identity
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Manager role required
    ManagerRequired = 2003,

    // ==================== 3xxx: Reservation ====================
    /// Occupancy record not found
    ReservationNotFound = 3001,
    /// Reservation window is malformed
    InvalidWindow = 3002,
    /// Reservation window overlaps another booking
    ReservationConflict = 3003,
    /// Table has no current occupant to advance
    NoActiveOccupant = 3004,
    /// Table already has a current occupant
    TableOccupied = 3005,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no lines
    OrderEmpty = 4002,
    /// Stored total differs from the sum of the lines
    OrderTotalMismatch = 4003,

    // ==================== 5xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 5001,
    /// Comment exceeds the allowed length
    CommentTooLong = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is unknown or not available for sale
    ProductUnavailable = 6002,

    // ==================== 7xxx: Table ====================
    /// Dining table not found
    TableNotFound = 7001,
    /// Branch not found
    BranchNotFound = 7101,

    // ==================== 8xxx: Inventory ====================
    /// Ingredient not found
    IngredientNotFound = 8001,
    /// Lot quantity must be positive
    InvalidLotQuantity = 8002,
    /// Supplier not found
    SupplierNotFound = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Store is busy (lock contention), retry
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this is the success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Default English message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthenticated => "Authentication required",

            Self::PermissionDenied => "Permission denied",
            Self::ManagerRequired => "Manager role required",

            Self::ReservationNotFound => "Reservation not found",
            Self::InvalidWindow => "Invalid reservation window",
            Self::ReservationConflict => "Reservation window overlaps an existing booking",
            Self::NoActiveOccupant => "No active reservation or visit for this table",
            Self::TableOccupied => "Table is already occupied",

            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order has no items",
            Self::OrderTotalMismatch => "Order total does not match its items",

            Self::CustomerNotFound => "Customer not found",
            Self::CommentTooLong => "Comment is too long",

            Self::ProductNotFound => "Product not found",
            Self::ProductUnavailable => "Product is invalid or not available",

            Self::TableNotFound => "Table not found",
            Self::BranchNotFound => "Branch not found",

            Self::IngredientNotFound => "Ingredient not found",
            Self::InvalidLotQuantity => "Lot quantity must be positive",
            Self::SupplierNotFound => "Supplier not found",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::TimeoutError => "Operation timed out",
            Self::ConfigError => "Configuration error",
            Self::SystemBusy => "System busy, please retry",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a u16 does not map to any [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth / Permission
            1001 => Ok(ErrorCode::NotAuthenticated),
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::ManagerRequired),

            // Reservation
            3001 => Ok(ErrorCode::ReservationNotFound),
            3002 => Ok(ErrorCode::InvalidWindow),
            3003 => Ok(ErrorCode::ReservationConflict),
            3004 => Ok(ErrorCode::NoActiveOccupant),
            3005 => Ok(ErrorCode::TableOccupied),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderTotalMismatch),

            // Customer
            5001 => Ok(ErrorCode::CustomerNotFound),
            5002 => Ok(ErrorCode::CommentTooLong),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductUnavailable),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7101 => Ok(ErrorCode::BranchNotFound),

            // Inventory
            8001 => Ok(ErrorCode::IngredientNotFound),
            8002 => Ok(ErrorCode::InvalidLotQuantity),
            8003 => Ok(ErrorCode::SupplierNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NoActiveOccupant.code(), 3004);
        assert_eq!(ErrorCode::ProductUnavailable.code(), 6002);
        assert_eq!(ErrorCode::TableNotFound.code(), 7001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ManagerRequired,
            ErrorCode::ReservationConflict,
            ErrorCode::TableOccupied,
            ErrorCode::OrderTotalMismatch,
            ErrorCode::CommentTooLong,
            ErrorCode::ProductUnavailable,
            ErrorCode::BranchNotFound,
            ErrorCode::SupplierNotFound,
            ErrorCode::SystemBusy,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::NoActiveOccupant).unwrap();
        assert_eq!(json, "3004");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
