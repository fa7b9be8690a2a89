//! Admissions Engine server entry point.
//!
//! Loads configuration, installs tracing, wires adapters into the HTTP
//! router and serves until Ctrl-C. An expiry sweeper runs alongside the
//! server and stops with it.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

use admissions_engine::adapters::http::{app_router, AppState};
use admissions_engine::adapters::notifier::LoggingNotifier;
use admissions_engine::adapters::payment::{
    HttpGatewayConfig, HttpPaymentGateway, MockPaymentGateway,
};
use admissions_engine::adapters::sweeper::ExpirySweeper;
use admissions_engine::application::PurgeExpiredHandler;
use admissions_engine::config::{AppConfig, ConfigError, GatewayKind, PaymentConfig, ValidationError};
use admissions_engine::ports::{GatewayError, PaymentGateway};
use admissions_engine::telemetry::{self, TelemetryError};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("payment gateway: {0}")]
    Gateway(#[from] GatewayError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init(&config.server)?;

    let gateway = payment_gateway(&config.payment)?;
    let state = AppState::in_memory(&config, gateway, Arc::new(LoggingNotifier::new()))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = ExpirySweeper::new(
        PurgeExpiredHandler::new(
            state.otp_store.clone(),
            state.tokens.clone(),
            state.rate_limiter.clone(),
        ),
        config.server.purge_interval(),
    );
    let sweeper_task = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    let app = app_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        gateway = ?config.payment.gateway,
        stages = config.pipeline.stages.len(),
        "admissions engine listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper_task.await {
        tracing::warn!(error = %e, "expiry sweeper did not stop cleanly");
    }
    tracing::info!("admissions engine stopped");
    Ok(())
}

fn payment_gateway(config: &PaymentConfig) -> Result<Arc<dyn PaymentGateway>, StartupError> {
    match config.gateway {
        GatewayKind::Mock => {
            tracing::warn!("using the mock payment gateway; no real payments are taken");
            Ok(Arc::new(MockPaymentGateway::new()))
        }
        GatewayKind::Http => {
            let base_url = config
                .gateway_base_url
                .clone()
                .ok_or(ValidationError::MissingRequired("PAYMENT__GATEWAY_BASE_URL"))?;
            let api_key = config
                .gateway_api_key
                .clone()
                .ok_or(ValidationError::MissingRequired("PAYMENT__GATEWAY_API_KEY"))?;
            let gateway = HttpPaymentGateway::new(HttpGatewayConfig {
                base_url,
                api_key,
                timeout: Duration::from_secs(config.gateway_timeout_secs),
            })?;
            Ok(Arc::new(gateway))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
