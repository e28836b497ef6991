use tokio::signal;
use tracing::{error, warn};

/// 等待 Ctrl+C；无法监听信号时永不返回，由服务自身决定退出
pub async fn listen_for_shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");
}
