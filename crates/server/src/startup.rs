use std::future::Future;

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::errors::StartupError;
use crate::observability;
use crate::routes;
use crate::state::AppState;

/// Build the state and router described by `cfg`.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = AppState::from_config(&cfg.store);
    let count = state.posts.count().await?;
    observability::set_post_count(count);
    info!(
        posts = count,
        seed = cfg.store.seed,
        id_strategy = ?cfg.store.id_strategy,
        docs = cfg.docs.enabled,
        "post store ready"
    );
    Ok(routes::build_router(state, cfg))
}

/// Serve `app` on an already bound listener until `shutdown` resolves,
/// then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Public entry: build the app and run the HTTP server until Ctrl-C / SIGTERM.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    let local = listener.local_addr()?;
    info!(%local, "starting blog api");
    serve(listener, app, shutdown_signal()).await?;
    info!("blog api stopped");
    Ok(())
}

/// Resolves on the first Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }
    log_shutdown_signal();
}

fn log_shutdown_signal() {
    info!(
        service = "blog_api",
        event = "shutdown_signal",
        "shutdown signal received, draining connections"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_reports_bind_failure() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = taken.local_addr().unwrap().port();
        let err = run(cfg).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<StartupError>(), Some(StartupError::Bind { .. })));
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn shutdown_signal_event_carries_service_fields() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, log_shutdown_signal);

        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains(r#""event":"shutdown_signal""#), "{out}");
        assert!(out.contains(r#""service":"blog_api""#), "{out}");
    }

    #[tokio::test]
    async fn serve_stops_when_shutdown_resolves() -> anyhow::Result<()> {
        let app = build_app(&AppConfig::default()).await?;
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        serve(listener, app, async {}).await
    }
}
