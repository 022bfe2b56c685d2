pub mod config;
pub mod route_builder;

use crate::{
    auth::oauth::{IdentityProvider, OAuthService},
    config::Config,
    error::AppError,
    health::HealthService,
    metrics,
    routes::{create_auth_routes, create_health_routes},
    server::route_builder::middleware_factories::request_response_logger,
    shutdown::ShutdownCoordinator,
    utils::request_id::request_id_middleware,
};
use axum::{Router, middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub oauth_service: Arc<OAuthService>,
    pub health_service: Arc<HealthService>,
    pub shutdown_coordinator: Arc<ShutdownCoordinator>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        if config.metrics.enabled {
            if let Err(e) = metrics::init_metrics_with_port(config.metrics.port) {
                error!(
                    "Failed to start metrics server on port {}: {}",
                    config.metrics.port, e
                );
                return Err(AppError::Internal(format!(
                    "Failed to start metrics server: {}",
                    e
                )));
            }
            info!("Metrics server started on port {}", config.metrics.port);
        }

        let oauth_service = Arc::new(OAuthService::new(&config)?);
        Ok(Self::assemble(config, oauth_service).await)
    }

    /// Build a server around an already constructed identity provider
    pub async fn with_provider(config: Config, provider: Arc<dyn IdentityProvider>) -> Self {
        let oauth_service = Arc::new(OAuthService::with_provider(&config, provider));
        Self::assemble(config, oauth_service).await
    }

    async fn assemble(config: Config, oauth_service: Arc<OAuthService>) -> Self {
        let health_service = Arc::new(HealthService::new());
        health_service
            .register(oauth_service.health_checker())
            .await;

        Self {
            config: Arc::new(config),
            oauth_service,
            health_service,
            shutdown_coordinator: Arc::new(ShutdownCoordinator::new()),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let app = self.create_app();

        let host = self.config.server.host.as_str();
        let port = self.config.server.port;
        let listener = TcpListener::bind((host, port)).await.map_err(|e| {
            AppError::Internal(format!("Failed to bind to {}:{}: {}", host, port, e))
        })?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::Internal(format!("Failed to read local address: {}", e)))?;

        info!("Server listening on http://{}", addr);

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        tokio::spawn(async move {
            shutdown_coordinator.wait_for_shutdown_signal().await;
        });

        let mut shutdown_rx = self.shutdown_coordinator.subscribe();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
                info!("Graceful shutdown initiated");
            })
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

        info!("Server shutdown complete");
        Ok(())
    }

    pub fn create_app(&self) -> Router {
        let mut routes = Router::new()
            .merge(create_auth_routes())
            .merge(create_health_routes());

        // route_layer so the matched path is available as a label
        if self.config.metrics.enabled {
            routes = routes.route_layer(middleware::from_fn(metrics::metrics_middleware));
        }

        let mut app = routes.with_state(self.clone());
        if self.config.logging.log_request {
            app = app.layer(middleware::from_fn(request_response_logger));
        }
        // Outermost, so the logger sees the id
        app.layer(middleware::from_fn(request_id_middleware))
    }
}
