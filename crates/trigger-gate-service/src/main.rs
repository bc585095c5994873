//! # Trigger-Gate Service
//!
//! Binary entry point for the Trigger-Gate HTTP service.
//!
//! This executable:
//! - Loads configuration from files and the environment (see [`settings`])
//! - Initializes structured logging
//! - Builds the secret store and the configured interceptors
//! - Starts the HTTP server from trigger-gate-api
//!
//! Exit codes: 1 bind failure, 2 server failure, 3 configuration error.

mod settings;

use anyhow::Context;
use trigger_gate_api::{
    build_registry, start_server, InterceptorRegistry, LoggingConfig, ServiceConfig, ServiceError,
};
use trigger_gate_core::SecretResolver;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let service_config = match settings::load_config() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&LoggingConfig::default())?;
            error!(error = %e, "Service configuration is unusable; aborting");
            std::process::exit(3);
        }
    };

    init_tracing(&service_config.logging)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Trigger-Gate Service"
    );

    let registry = match build_interceptors(&service_config) {
        Ok(registry) => registry,
        Err(e) => {
            error!(error = %e, "Failed to build interceptors; aborting");
            std::process::exit(exit_code(&e));
        }
    };

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        interceptors = registry.len(),
        "Starting HTTP server"
    );

    if let Err(e) = start_server(service_config, registry).await {
        error!(error = %e, "HTTP server stopped with an error");
        std::process::exit(exit_code(&e));
    }

    Ok(())
}

/// Build the secret store and the configured interceptors.
fn build_interceptors(config: &ServiceConfig) -> Result<InterceptorRegistry, ServiceError> {
    let resolver = SecretResolver::new(config.secrets.build_store());
    Ok(build_registry(&config.interceptors, resolver)?)
}

/// Process exit code for a start-up or server failure.
fn exit_code(error: &ServiceError) -> i32 {
    match error {
        ServiceError::BindFailed { .. } => 1,
        ServiceError::ServerFailed { .. } => 2,
        ServiceError::Configuration(_) => 3,
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `logging.level` when set.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("invalid logging.level '{}'", logging.level))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = if logging.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    result.context("failed to initialize logging")
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
