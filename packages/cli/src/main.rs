// ABOUTME: Hemobank server binary
// ABOUTME: `hemobank serve` runs the API, `hemobank seed` bootstraps data

use anyhow::Result;
use axum::http::Method;
use clap::{Parser, Subcommand};
use hemobank_api::{create_router, AppState};
use hemobank_auth::Keys;
use hemobank_notify::{Mailer, MailerConfig};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod seed;

use config::Config;

#[derive(Parser)]
#[command(name = "hemobank", about = "Blood bank management server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server (default)
    Serve,
    /// Create the admin account and zeroed stock counters
    Seed {
        /// Admin login email
        #[arg(long, default_value = "admin@hemobank.local")]
        email: String,
        /// Admin password
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = hemobank_storage::connect_file(&config.database_path).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Seed { email, password } => {
            seed::seed(&pool, &email, &password).await?;
        }
        Command::Serve => {
            serve(pool, config).await?;
        }
    }

    Ok(())
}

async fn serve(pool: sqlx::SqlitePool, config: Config) -> Result<()> {
    let mailer = Mailer::new(MailerConfig {
        api_url: config.mail_api_url.clone(),
        api_key: config.mail_api_key.clone(),
        from: config.mail_from.clone(),
    });
    let keys = Keys::new(&config.jwt_secret);
    let state = AppState::new(pool, mailer, keys, config.admin_email.clone());

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Hemobank API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
