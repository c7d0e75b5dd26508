use anyhow::Context;
use product_api::{
    build_router,
    infrastructure::{config::AppConfig, logger::Logger},
    AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("加载配置失败")?;
    Logger::init(&config.logging);

    let addr = config.listen_addr();
    let app = build_router(AppState::new(config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("无法绑定到 {}", addr))?;

    info!("🚀 产品 API 服务器运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /api/products      - 产品列表 (category, search, page, limit)");
    info!("   GET    /api/products/:id  - 获取产品");
    info!("   POST   /api/products      - 创建产品 (需要 API key)");
    info!("   PUT    /api/products/:id  - 更新产品 (需要 API key)");
    info!("   DELETE /api/products/:id  - 删除产品 (需要 API key)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务器运行失败")?;

    info!("服务器已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("监听 Ctrl-C 失败: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到停止信号，开始优雅关闭");
}
