use crate::config::{CorsConfig, CostingConfig};
use crate::handlers::{self, calculator, clients, costs, systems};
use crate::services::{CostingDb, CostingRepository};
use axum::{
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{http_trace_layer, request_id_middleware},
};
use std::future::Future;
use std::pin::Pin;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: CostingConfig,
    pub db: CostingDb,
    pub repository: CostingRepository,
}

impl AppState {
    pub fn new(config: CostingConfig, db: CostingDb) -> Self {
        let repository = CostingRepository::new(&db);
        Self {
            config,
            db,
            repository,
        }
    }
}

/// All routes with the shared middleware stack applied.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/api/calculator/preview", post(calculator::preview))
        // Clients and their systems
        .route(
            "/api/clients",
            post(clients::create_client).get(clients::list_clients),
        )
        .route(
            "/api/clients/:id",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/api/clients/:id/systems",
            post(systems::create_system).get(systems::list_systems),
        )
        .route(
            "/api/clients/systems/:id",
            put(systems::update_system).delete(systems::delete_system),
        )
        // Cost records nested under a system
        .route(
            "/api/clients/systems/:id/costs",
            post(costs::create_system_cost).get(costs::list_system_costs),
        )
        .route(
            "/api/clients/costs/:id",
            put(costs::update_cost).delete(costs::delete_cost),
        )
        // Cost records addressed directly
        .route("/api/costs", post(costs::create_cost).get(costs::list_costs))
        .route(
            "/api/costs/:id",
            get(costs::get_cost)
                .put(costs::update_cost)
                .delete(costs::delete_cost),
        )
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub struct Application {
    port: u16,
    server: Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>,
    state: AppState,
}

impl Application {
    pub async fn build(config: CostingConfig) -> Result<Self, AppError> {
        let db = CostingDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let state = AppState::new(config.clone(), db);
        let app = build_router(state.clone());

        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::pin(async move { server.await }),
            state,
        })
    }

    pub fn db(&self) -> &CostingDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
