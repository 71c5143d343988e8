//! Table Server - 多门店餐厅的桌台占用、预订与订单服务
//!
//! # 架构概述
//!
//! - **桌台** (`tables`): 桌台登记与缓存的可用标记, 修复任务
//! - **占用** (`occupancy`): 预订 / 到店记录的生命周期与当前占用者判定
//! - **订单** (`orders`): 订单与金额在同一事务内写入
//! - **顾客** (`clients`, `favorites`): 顾客档案、留言、常点缓存
//! - **报表** (`reports`), **库存** (`inventory`)
//! - **HTTP API** (`api`) + 身份头 (`auth`)
//!
//! # 模块结构
//!
//! ```text
//! table-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── auth/          # 身份头与角色
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 连接池与 repository
//! ├── tables/ occupancy/ orders/ clients/ favorites/ reports/ inventory/
//! └── utils/         # 时钟、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod clients;
pub mod core;
pub mod db;
pub mod favorites;
pub mod inventory;
pub mod occupancy;
pub mod orders;
pub mod reports;
pub mod tables;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export 公共类型
pub use auth::{CurrentUser, Role};
pub use core::{Config, EngineError, EngineResult, Server, ServerState, build_app};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::{Clock, ManualClock, SystemClock};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置运行环境: 工作目录与日志
///
/// `.env` 由调用方在读取 [`Config`] 之前加载。
pub fn setup_environment(config: &Config) -> core::Result<()> {
    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(())
}
