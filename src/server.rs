//! Router assembly and server lifecycle.

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::ServerConfig;
use crate::ws;

/// Builds the full application router: REST, WebSocket and (with the
/// `swagger-ui` feature) API docs.
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .merge(api::build_router())
        .merge(ws::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(crate::openapi::swagger_ui());

    router
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `app` on `listener` until a shutdown signal arrives.
///
/// Ctrl-C, SIGTERM (unix) or cancelling `state.shutdown` starts the
/// shutdown: every broadcast connection is sent a close signal, then the
/// root token is cancelled so echo connections end too.
///
/// # Errors
///
/// Returns an I/O error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, app: Router, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
}

/// Resolves once shutdown is requested, after closing every WebSocket.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl-C"),
        () = terminate => tracing::info!("received SIGTERM"),
        () = state.shutdown.cancelled() => tracing::info!("shutdown requested"),
    }

    let closed = state.dispatcher.shutdown().await;
    state.shutdown.cancel();
    tracing::info!(broadcast_connections = closed, "shutting down");
}
