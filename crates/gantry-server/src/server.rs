use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use gantry_reconcile::WorkloadReconciler;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::AppConfig, handlers};

/// Shared handles available to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<WorkloadReconciler>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(reconciler: Arc<WorkloadReconciler>) -> Self {
        Self { reconciler }
    }

    /// Wires the record store and cluster gateway named by the config into
    /// a reconciler.
    ///
    /// # Errors
    ///
    /// Fails if a backend name is unknown or the cluster client cannot be
    /// initialized from the ambient environment.
    pub async fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let store = match cfg.storage.backend.as_str() {
            "memory" => gantry_db_memory::create_record_store(),
            other => anyhow::bail!("unknown storage backend: {other}"),
        };
        tracing::info!(backend = %cfg.storage.backend, "Record store initialized");

        let gateway = match cfg.cluster.backend.as_str() {
            "kube" => gantry_kube::create_cluster_gateway()
                .await
                .map_err(|e| anyhow::anyhow!("cluster gateway initialization failed: {e}"))?,
            other => anyhow::bail!("unknown cluster backend: {other}"),
        };
        tracing::info!(backend = %cfg.cluster.backend, "Cluster gateway initialized");

        Ok(Self::new(Arc::new(WorkloadReconciler::new(gateway, store))))
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Workload lifecycle
        .route(
            "/workloads",
            get(handlers::find_all_workloads)
                .post(handlers::add_workload)
                .put(handlers::update_workload),
        )
        .route(
            "/workloads/{id}",
            get(handlers::find_workload).delete(handlers::delete_workload),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct GantryServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    state: Option<AppState>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            state: None,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Supplies a pre-built state instead of wiring backends from config.
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    pub async fn build(self) -> anyhow::Result<GantryServer> {
        let state = match self.state {
            Some(state) => state,
            None => AppState::from_config(&self.config).await?,
        };
        let app = build_app(state);

        Ok(GantryServer {
            addr: self.addr,
            app,
        })
    }
}

impl GantryServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
