//! # Cadence API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use cadence_infra::SystemClock;

mod background;
mod config;
mod handlers;
mod middleware;
mod seed;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let telemetry_config = telemetry::TelemetryConfig::from_env();
    telemetry::init_telemetry(&telemetry_config);

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Cadence API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config, Arc::new(SystemClock));

    if config.seed_sample_data {
        if let Err(e) = seed::seed(&state).await {
            tracing::error!(error = %e, "Failed to load sample data");
        }
    }

    // Hand-off point to the external publisher.
    state
        .events
        .subscribe("posts.due", |event| {
            Box::pin(async move {
                tracing::info!(post_id = %event.post_id(), "Post due for publishing");
            })
        })
        .await;

    #[cfg(feature = "scheduler")]
    let scheduler = start_scheduler(&config, &state).await;

    let result = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    #[cfg(feature = "scheduler")]
    if let Some(mut scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler did not stop cleanly");
        }
    }

    result
}

/// Start the due-post scan. Failures are logged and the server runs without it.
#[cfg(feature = "scheduler")]
async fn start_scheduler(config: &AppConfig, state: &AppState) -> Option<background::Scheduler> {
    let scheduler = match background::Scheduler::new(config.scheduler.clone()).await {
        Ok(scheduler) => scheduler,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create scheduler");
            return None;
        }
    };

    if let Err(e) = background::register_due_scan(&scheduler, state.registry.clone()).await {
        tracing::error!(error = %e, "Failed to register due-post scan");
        return None;
    }
    if let Err(e) = scheduler.start().await {
        tracing::error!(error = %e, "Failed to start scheduler");
        return None;
    }
    Some(scheduler)
}
