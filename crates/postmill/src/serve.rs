// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `postmill serve` command.

use std::sync::Arc;

use postmill_config::PostmillConfig;
use postmill_core::PostmillError;
use postmill_cron::Scheduler;
use postmill_gateway::{AuthConfig, GatewayState, ServerConfig, start_server};
use tracing::{error, info};

use crate::app::App;
use crate::shutdown;

/// Run the scheduler and the HTTP gateway until SIGINT or SIGTERM.
pub async fn run_serve(config: PostmillConfig) -> Result<(), PostmillError> {
    info!(service = %config.service.name, "starting postmill serve");

    let app = App::build(&config).await?;
    let scheduler = Arc::new(Scheduler::new(app.workers.clone()).await);
    let cancel = shutdown::install_signal_handler();

    let scheduler_task = tokio::spawn(Arc::clone(&scheduler).run(cancel.clone()));

    let state = GatewayState {
        workers: app.workers.clone(),
        scheduler,
        auth: AuthConfig {
            api_key: config.gateway_api_key(),
        },
    };
    let server_result = start_server(
        &ServerConfig::from_config(&config.gateway),
        state,
        cancel.clone(),
    )
    .await;

    // The gateway may have stopped on its own (bind failure); stop the rest too.
    cancel.cancel();
    if let Err(e) = scheduler_task.await {
        error!(error = %e, "scheduler task failed");
    }
    app.shutdown().await?;
    info!("postmill serve shutdown complete");
    server_result
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("postmill={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
