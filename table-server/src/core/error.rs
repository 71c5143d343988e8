//! 核心错误 - 桌台占用 / 订单引擎的错误分类
//!
//! | 变体 | 含义 |
//! |------|------|
//! | `NotFound` | 桌台、顾客、商品不存在 |
//! | `InvalidInput` | 缺少字段、时间窗口非法 |
//! | `Conflict` | 无当前占用者、预订时间重叠 |
//! | `InvalidProduct` | 订单行引用了不可售或未知商品 |
//! | `StoreFailure` | 存储层事务失败 (整个事务回滚) |
//!
//! Every variant is surfaced to the caller; nothing is retried here.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::repository::RepoError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{message}")]
    NotFound { code: ErrorCode, message: String },

    #[error("{message}")]
    InvalidInput { code: ErrorCode, message: String },

    #[error("{message}")]
    Conflict { code: ErrorCode, message: String },

    #[error("Product {0} is invalid or not available")]
    InvalidProduct(i64),

    #[error("Store failure: {0}")]
    StoreFailure(String),
}

impl EngineError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::ValidationFailed,
            message: msg.into(),
        }
    }

    pub fn invalid_window(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::InvalidWindow,
            message: msg.into(),
        }
    }

    pub fn table_not_found(table_id: i64) -> Self {
        Self::NotFound {
            code: ErrorCode::TableNotFound,
            message: format!("Table {table_id} not found"),
        }
    }

    pub fn customer_not_found(national_id: &str) -> Self {
        Self::NotFound {
            code: ErrorCode::CustomerNotFound,
            message: format!("Customer {national_id} not found"),
        }
    }

    pub fn order_not_found(order_id: i64) -> Self {
        Self::NotFound {
            code: ErrorCode::OrderNotFound,
            message: format!("Order {order_id} not found"),
        }
    }

    pub fn no_active_occupant(table_id: i64) -> Self {
        Self::Conflict {
            code: ErrorCode::NoActiveOccupant,
            message: format!("No active reservation or visit for table {table_id}"),
        }
    }

    pub fn table_occupied(table_id: i64, record_id: i64) -> Self {
        Self::Conflict {
            code: ErrorCode::TableOccupied,
            message: format!("Table {table_id} is occupied by record {record_id}"),
        }
    }

    pub fn reservation_conflict(table_id: i64, record_id: i64) -> Self {
        Self::Conflict {
            code: ErrorCode::ReservationConflict,
            message: format!("Window overlaps reservation {record_id} on table {table_id}"),
        }
    }

    /// Stable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { code, .. }
            | Self::InvalidInput { code, .. }
            | Self::Conflict { code, .. } => *code,
            Self::InvalidProduct(_) => ErrorCode::ProductUnavailable,
            Self::StoreFailure(msg) => classify_store_failure(msg),
        }
    }
}

/// 将存储错误转换为错误码
fn classify_store_failure(msg: &str) -> ErrorCode {
    let lower = msg.to_lowercase();
    // SQLITE_BUSY / SQLITE_LOCKED: 写锁竞争，客户端可重试
    if lower.contains("database is locked") || lower.contains("busy") {
        return ErrorCode::SystemBusy;
    }
    if lower.contains("timed out") {
        return ErrorCode::TimeoutError;
    }
    ErrorCode::DatabaseError
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::StoreFailure(err.to_string())
    }
}

impl From<RepoError> for EngineError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(message) => EngineError::NotFound {
                code: ErrorCode::NotFound,
                message,
            },
            RepoError::Duplicate(message) => EngineError::Conflict {
                code: ErrorCode::AlreadyExists,
                message,
            },
            RepoError::Validation(message) => EngineError::invalid(message),
            RepoError::Database(message) => EngineError::StoreFailure(message),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let code = err.code();
        match &err {
            EngineError::StoreFailure(msg) => {
                tracing::error!(error = %msg, error_code = ?code, "Store failure, transaction rolled back");
                AppError::with_message(code, code.message())
            }
            EngineError::InvalidProduct(product_id) => {
                AppError::with_message(code, err.to_string()).with_detail("product_id", *product_id)
            }
            _ => AppError::with_message(code, err.to_string()),
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// 服务器启动 / 运行错误
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("数据库初始化失败: {0}")]
    Database(#[from] AppError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 服务器层 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
