// # ddnsd - DDNS Daemon
//
// The ddnsd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Opening the domain store and constructing the provider
// 4. Serving the HTTP API until SIGTERM/SIGINT
//
// See `ddnsd::config` for the full list of variables.
//
// ## Example
//
// ```bash
// export DATABASE_URI=sqlite:///var/lib/ddns/ddns.db
// export CLOUDFLARE_API_KEY=your_token
// export CLOUDFLARE_ZONE_ID=your_zone
// export DDNS_ADMIN_USERNAME=admin
// export DDNS_ADMIN_PASSWORD=change-me-please
//
// ddnsd
// ```

use anyhow::Result;
use ddns_core::{DomainRegistry, Reconciler};
use ddns_provider_cloudflare::CloudflareProvider;
use ddns_store_sqlite::SqliteDomainStore;
use ddnsd::{AppState, Config};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.tracing_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd daemon");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        // Startup failures are configuration problems; anything after the
        // listener is up is a runtime failure.
        let (listener, state, store) = match startup(&config).await {
            Ok(parts) => parts,
            Err(e) => {
                error!("Startup failed: {:#}", e);
                return DdnsExitCode::ConfigError;
            }
        };

        let exit = match run_daemon(listener, state).await {
            Ok(()) => DdnsExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {:#}", e);
                DdnsExitCode::RuntimeError
            }
        };

        store.close().await;
        exit
    })
    .into()
}

/// Open the store, build the provider and bind the listener
async fn startup(
    config: &Config,
) -> Result<(tokio::net::TcpListener, Arc<AppState>, SqliteDomainStore)> {
    let store = SqliteDomainStore::connect(&config.database_uri).await?;

    let provider = CloudflareProvider::new(config.cloudflare_config())?;
    info!("Using DNS provider: cloudflare (zone {})", config.cloudflare_zone_id);

    let registry = DomainRegistry::new(Arc::new(store.clone()));
    let reconciler = Reconciler::new(registry, Arc::new(provider));
    let state = Arc::new(AppState::new(
        reconciler,
        config.admin_credentials(),
        config.service_config(),
    ));

    let listener = tokio::net::TcpListener::bind(config.bind_socket_addr()?).await?;
    Ok((listener, state, store))
}

/// Run the daemon
async fn run_daemon(listener: tokio::net::TcpListener, state: Arc<AppState>) -> Result<()> {
    let shutdown = shutdown_signal()?;

    ddnsd::serve(listener, state, async move {
        let signal = shutdown.await;
        info!("Received shutdown signal: {}", signal);
        info!("Shutting down daemon");
    })
    .await
}

/// Install handlers for SIGTERM and SIGINT
///
/// Handlers are installed eagerly; failing to install one is a startup error.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl std::future::Future<Output = &'static str> + Send + 'static> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        }
    })
}

/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl std::future::Future<Output = &'static str> + Send + 'static> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to wait for CTRL-C: {}", e);
        }
        "SIGINT"
    })
}
