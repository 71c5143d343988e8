use table_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env + 配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 工作目录, 日志
    setup_environment(&config)?;
    tracing::info!(
        environment = %config.environment,
        timezone = %config.timezone,
        database = %config.database_path,
        "Table server starting..."
    );

    // 3. 初始化服务器状态
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器 (后台任务随之启动)
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
