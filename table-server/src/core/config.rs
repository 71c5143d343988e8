use std::path::PathBuf;

use chrono_tz::Tz;

use crate::utils::time::parse_timezone;

/// 服务器配置 - 桌台服务的所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | DATABASE_PATH | {WORK_DIR}/table-server.db | SQLite 文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | (无) | 日志目录, 存在时按天滚动写文件 |
/// | BUSINESS_TIMEZONE | UTC | 营业日时区 (IANA 名称) |
/// | RECONCILE_INTERVAL_SECS | 300 | 可用标记修复周期, 0 关闭 |
/// | ALLOW_DOUBLE_BOOKING | false | 是否允许预订时段重叠 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/tables BUSINESS_TIMEZONE=America/Santiago cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// SQLite 数据库文件
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 营业日时区 ("今天" 的边界)
    pub timezone: Tz,
    /// 修复任务周期 (秒), 0 表示只在启动时执行一次
    pub reconcile_interval_secs: u64,
    pub allow_double_booking: bool,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("table-server.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            database_path,
            http_port: env_parse("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            timezone: parse_timezone(&std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "UTC".into())),
            reconcile_interval_secs: env_parse("RECONCILE_INTERVAL_SECS", 300),
            allow_double_booking: env_parse("ALLOW_DOUBLE_BOOKING", false),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10000),
            work_dir,
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = PathBuf::from(&config.work_dir)
            .join("table-server.db")
            .to_string_lossy()
            .into_owned();
        config.http_port = http_port;
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_move_database_into_work_dir() {
        let config = Config::with_overrides("/tmp/tables-test", 4100);
        assert_eq!(config.http_port, 4100);
        assert!(config.database_path.starts_with("/tmp/tables-test"));
        assert!(config.database_path.ends_with("table-server.db"));
    }

    #[test]
    fn test_env_parse_falls_back_on_garbage() {
        assert_eq!(env_parse("TABLE_SERVER_SURELY_UNSET_KEY", 7u64), 7);
    }
}
