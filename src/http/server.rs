//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the redirect handler as catch-all
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve until the shutdown signal, draining in-flight requests
//! - Swap in rebuilt service trees when the config changes

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    extract::{OriginalUri, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RedirectConfig;
use crate::http::request::{request_id, MakeRequestUuid, RedirectRequest};
use crate::http::response::method_not_allowed;
use crate::lifecycle::shutdown::wait as shutdown_requested;
use crate::observability::metrics;
use crate::routing::{Directory, Outcome};
use crate::service::CompositionError;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<ArcSwap<Directory>>,
}

/// HTTP front end of the redirector.
pub struct HttpServer {
    router: Router,
    config: RedirectConfig,
    state: AppState,
}

impl HttpServer {
    /// Build every configured service tree and the router serving them.
    pub fn new(config: RedirectConfig) -> Result<Self, CompositionError> {
        let directory = Directory::from_config(&config)?;
        tracing::info!(mounts = directory.len(), "Service trees built");

        let state = AppState {
            directory: Arc::new(ArcSwap::from_pointee(directory)),
        };
        let router = Self::build_router(&config, state.clone());

        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectConfig, state: AppState) -> Router {
        Router::new()
            .fallback(redirect_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Configs received on `config_updates` replace the served trees; a
    /// config whose trees fail to build is logged and dropped.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RedirectConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let directory = self.state.directory.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match Directory::from_config(&config) {
                    Ok(next) => {
                        tracing::info!(mounts = next.len(), "Service trees reloaded");
                        directory.store(Arc::new(next));
                        metrics::record_reload(true);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to rebuild service trees, keeping current ones");
                        metrics::record_reload(false);
                    }
                }
            }
        });

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_requested(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve any path against the current service trees.
async fn redirect_handler(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(original): OriginalUri,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let request = RedirectRequest::from_uris(method, &original, &uri);
    let request_id = request_id(&headers);

    if !request.is_read_only() {
        tracing::debug!(request_id = %request_id, method = %request.method, "Method not allowed");
        let response = method_not_allowed();
        metrics::record_request(response.status().as_u16(), "none", start);
        return response;
    }

    let outcome = state
        .directory
        .load()
        .resolve(&request.script_name, &request.path_info);

    let service = match &outcome {
        Outcome::Redirect(resolution) => {
            tracing::debug!(
                request_id = %request_id,
                path = %request.path_info,
                service = %resolution.service,
                location = %resolution.location,
                "Redirecting"
            );
            resolution.service.name()
        }
        Outcome::NotFound { path } => {
            tracing::debug!(request_id = %request_id, path = %path, "No service matched");
            "none"
        }
        Outcome::Fallback(_) => "fallback",
        Outcome::Unbound(e) => {
            tracing::error!(
                request_id = %request_id,
                path = %request.path_info,
                service = %e.service,
                placeholder = %e.placeholder,
                "Template variable left unbound"
            );
            e.service.name()
        }
    };

    let response = outcome.into_response();
    metrics::record_request(response.status().as_u16(), service, start);
    response
}
