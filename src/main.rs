// ABOUTME: Entry point for the factory binary.
// ABOUTME: Parses CLI arguments, loads .env, initializes tracing, and starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use factory_server::providers::ProviderStatus;
use factory_server::{AppState, FactoryConfig, create_router};

#[derive(Parser)]
#[command(
    name = "factory",
    version,
    about = "Spec-to-app demo server backed by pluggable LLM providers"
)]
struct Cli {
    /// Socket address to bind, overriding FACTORY_BIND
    #[arg(long)]
    bind: Option<SocketAddr>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print which LLM providers are configured, without key values
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "factory=debug,factory_server=debug,factory_llm=debug,tower_http=debug".into()
            }),
        )
        .init();

    let cli = Cli::parse();
    let mut config = FactoryConfig::from_env()?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Providers => {
            let status = ProviderStatus::from_config(&config.llm);
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }
    }
}

async fn serve(config: FactoryConfig) -> anyhow::Result<()> {
    tracing::info!(
        provider = %config.llm.provider_kind(),
        model = config.llm.default_model.as_deref().unwrap_or("(adapter default)"),
        "factory starting up"
    );

    let state = Arc::new(AppState::new(config.llm));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
