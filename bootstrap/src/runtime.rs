//! 服务运行时：日志初始化与关闭信号

use std::future::Future;
use std::io;

use marginiq_config::AppConfig;
use marginiq_telemetry::{init_tracing, init_tracing_json};
use tracing::{error, info};

/// 初始化服务运行时（生产环境输出 JSON 日志）
pub fn init_runtime(config: &AppConfig) {
    if config.is_production() {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        log_level = %config.telemetry.log_level,
        "Runtime initialized"
    );
}

/// 注册关闭信号，返回在收到 Ctrl+C 或 SIGTERM 时完成的 future
///
/// SIGTERM 监听在调用时注册，注册失败直接返回错误；
/// Ctrl+C 监听失败只记录日志，仍可通过 SIGTERM 关闭。
pub fn shutdown_signal() -> io::Result<impl Future<Output = ()>> {
    #[cfg(unix)]
    let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    Ok(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            terminate.recv().await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        info!("Shutdown signal received");
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_shutdown_signal_installs_and_waits() {
        let shutdown = shutdown_signal().unwrap();
        let waited = tokio::time::timeout(Duration::from_millis(20), shutdown).await;
        assert!(waited.is_err(), "shutdown resolved without a signal");
    }
}
