// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{sync::Arc, time::Duration};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::dashboard_service::DashboardService;
use crate::application::device_service::DeviceService;
use crate::application::poller::run_polling;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_source::HttpRecordSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    calibrate, date_ranges, device_status, get_dashboard, get_focus, health_check, list_devices,
    refresh, set_interval,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sensor_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = load_app_config()?;
    tracing::info!(
        upstream = %config.upstream.base_url,
        bind = %config.server.bind,
        poll_secs = config.polling.interval_secs,
        "Configuration loaded"
    );

    // Create record source (infrastructure layer)
    let source = Arc::new(HttpRecordSource::new(
        config.upstream.base_url.clone(),
        Duration::from_secs(config.upstream.timeout_secs),
    )?);

    // Create services (application layer)
    let dashboard_service = DashboardService::new(source.clone(), config.dashboard.clone());
    let device_service = DeviceService::new(source);

    match device_service.list_devices().await {
        Ok(devices) => tracing::info!(count = devices.len(), "Devices discovered"),
        Err(e) => tracing::warn!(error = %e, "Device list unavailable at startup"),
    }

    // Polling also performs the initial fetch
    tokio::spawn(run_polling(dashboard_service.clone(), config.polling.interval_secs));

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        device_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/devices", get(list_devices))
        .route("/ranges", get(date_ranges))
        .route("/status", get(device_status))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/focus/:metric", get(get_focus))
        .route("/refresh", post(refresh))
        .route("/control/interval", post(set_interval))
        .route("/control/calibrate", post(calibrate))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(address = %config.server.bind, "Starting sensor-dashboard service");

    axum::serve(listener, router).await?;

    Ok(())
}
