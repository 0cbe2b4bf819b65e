//! `leadboxd`: the LeadBox server binary.
//!
//! Usage:
//!   leadboxd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/leadbox/<name>.toml`.
//! If a path with `/` or a `.toml` suffix is given, it's used directly.

mod bootstrap;
mod config;
mod login;
mod routes;
mod session;

use std::sync::Arc;

use clap::Parser;
use leadbox_core::Module;
use tracing::info;

use config::ServerConfig;
use routes::AppState;
use session::SessionKeys;

/// LeadBox server.
#[derive(Parser, Debug)]
#[command(name = "leadboxd", about = "LeadBox sales lead server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    bootstrap::verify_config(&server_config)?;

    // The backend is built once and shared by every request.
    let backend = bootstrap::sheet_backend(&server_config);

    let leads_module = leads::LeadsModule::new(
        backend,
        leads::LeadConfig {
            campaigns: server_config.campaigns.clone(),
            duplicate_keys: server_config.leads.duplicate_keys,
        },
    );
    info!(
        "Leads module initialized ({} campaigns, {} backend)",
        leads_module.service().registry().len(),
        leads_module.service().backend_kind()
    );

    let app_state = AppState {
        sessions: Arc::new(SessionKeys::new(
            &server_config.session.secret,
            server_config.session.expire_secs,
        )),
        auth: bootstrap::auth_provider(&server_config),
    };

    let module_routes = vec![(leads_module.name(), leads_module.routes())];
    let app = routes::build_router(app_state, module_routes);

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("LeadBox server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
