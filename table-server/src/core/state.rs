use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::clients::ClientDirectory;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::favorites::FavoritesAggregator;
use crate::inventory::InventoryService;
use crate::occupancy::{LedgerSettings, OccupancyLedger};
use crate::orders::OrderLedger;
use crate::reports::ReportingViews;
use crate::tables::TableRegistry;
use crate::utils::{Clock, SystemClock};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有服务内部只持有连接池和时钟, Clone 成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | clock | 注入的时钟 |
/// | tables | TableRegistry |
/// | occupancy | OccupancyLedger |
/// | orders | OrderLedger |
/// | clients | ClientDirectory |
/// | favorites | FavoritesAggregator |
/// | reports | ReportingViews |
/// | inventory | 入库批次 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub clock: Arc<dyn Clock>,
    pub tables: TableRegistry,
    pub occupancy: OccupancyLedger,
    pub orders: OrderLedger,
    pub clients: ClientDirectory,
    pub favorites: FavoritesAggregator,
    pub reports: ReportingViews,
    pub inventory: InventoryService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录
    /// 2. 打开数据库并执行迁移
    /// 3. 组装各服务 (系统时钟)
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        if let Some(parent) = Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_pool(config.clone(), db.pool, Arc::new(SystemClock)))
    }

    /// 用现成的连接池和时钟组装 (测试使用 ManualClock)
    pub fn with_pool(config: Config, pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        let settings = LedgerSettings {
            allow_double_booking: config.allow_double_booking,
            timezone: config.timezone,
        };

        Self {
            tables: TableRegistry::new(pool.clone(), clock.clone()),
            occupancy: OccupancyLedger::new(pool.clone(), clock.clone(), settings),
            orders: OrderLedger::new(pool.clone(), clock.clone(), config.timezone),
            clients: ClientDirectory::new(pool.clone(), clock.clone()),
            favorites: FavoritesAggregator::new(pool.clone(), clock.clone()),
            reports: ReportingViews::new(pool.clone()),
            inventory: InventoryService::new(pool.clone(), clock.clone()),
            config,
            pool,
            clock,
        }
    }

    /// 注册后台任务
    ///
    /// - 启动时执行一次 reconcile (Warmup)
    /// - `reconcile_interval_secs > 0` 时周期执行 (Periodic)
    pub fn start_background_tasks(&self) -> crate::core::BackgroundTasks {
        use crate::core::TaskKind;

        let mut tasks = crate::core::BackgroundTasks::new();

        let tables = self.tables.clone();
        tasks.spawn("reconcile_warmup", TaskKind::Warmup, async move {
            match tables.reconcile().await {
                Ok(fixed) if !fixed.is_empty() => {
                    tracing::warn!(corrected = fixed.len(), "Startup reconcile corrected availability flags");
                }
                Ok(_) => tracing::debug!("Startup reconcile: all flags consistent"),
                Err(e) => tracing::error!(error = %e, "Startup reconcile failed"),
            }
        });

        if self.config.reconcile_interval_secs > 0 {
            let tables = self.tables.clone();
            let token = tasks.shutdown_token();
            let period = std::time::Duration::from_secs(self.config.reconcile_interval_secs);
            tasks.spawn("reconcile_periodic", TaskKind::Periodic, async move {
                crate::tables::run_reconcile_loop(tables, period, token).await;
            });
        }

        tasks.log_summary();
        tasks
    }
}
