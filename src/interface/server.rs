use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::application::service::BookService;
use crate::config::{AppConfig, StorageBackend};
use crate::domain::repository::BookRepository;
use crate::infra::json_store::JsonBookRepository;
use crate::infra::memory_store::InMemoryBookRepository;
use crate::infra::sqlite_store::SqliteBookRepository;

use super::http;

// =============================================================================
// Public entry point
// =============================================================================

/// 設定されたストアを開いてHTTPサーバを起動する。Ctrl-Cで停止。
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .server
        .socket_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.socket_addr()))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let backend = config.storage.backend;
    let path = config.storage.path();
    tracing::info!(?backend, path = %path.display(), "opening store");

    match backend {
        StorageBackend::Sqlite => {
            let repo = SqliteBookRepository::open(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            serve(listener, repo).await
        }
        StorageBackend::Json => serve(listener, JsonBookRepository::new(path)).await,
        StorageBackend::Memory => serve(listener, InMemoryBookRepository::new()).await,
    }
}

/// バインド済みのlistenerでRouterを動かす。
pub async fn serve<R: BookRepository + 'static>(
    listener: TcpListener,
    repo: R,
) -> anyhow::Result<()> {
    let app = http::router(Arc::new(BookService::new(repo)));

    tracing::info!(addr = %listener.local_addr()?, "book-api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("book-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
