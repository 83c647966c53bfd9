use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use service_core::error::AppError;
use service_core::middleware::tracing::{http_request_span, request_id_middleware};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{SessionConfig, StoreBackend};
use crate::handlers;
use crate::services::{InMemorySessionStore, MongoDb, MongoSessionStore, SessionStore};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: SessionConfig,
    pub store: Arc<dyn SessionStore>,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    /// Connect the configured store backend, assemble the router, and bind
    /// the listener. Port 0 picks a free port, which the tests rely on.
    pub async fn build(config: SessionConfig) -> Result<Self, AppError> {
        let store: Arc<dyn SessionStore> = match config.store.backend {
            StoreBackend::Mongo => {
                let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
                Arc::new(MongoSessionStore::new(db))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory session store; sessions vanish on restart");
                Arc::new(InMemorySessionStore::default())
            }
        };

        let state = AppState {
            config: config.clone(),
            store,
        };
        let router = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();
        tracing::info!(port = port, backend = ?state.config.store.backend, "Session service ready");

        Ok(Self {
            port,
            listener,
            router,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Store handle for test setup and verification.
    pub fn store(&self) -> Arc<dyn SessionStore> {
        self.state.store.clone()
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/sessions",
            post(handlers::create_session).get(handlers::list_sessions),
        )
        .route(
            "/sessions/:id",
            get(handlers::get_session)
                .put(handlers::update_session)
                .delete(handlers::delete_session),
        );

    // Browsers call this API directly, so CORS stays wide open. Layers run
    // outermost-last: CORS and request ids wrap the trace layer so every
    // span carries an id and even rejected requests get CORS headers.
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/info", get(handlers::service_info))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(state.config.http.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.http.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http().make_span_with(http_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
