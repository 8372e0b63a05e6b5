use anyhow::Context;
use auth_identity::AuthConfig;
use clap::Parser;
use email_service::{EmailConfig, SmtpMailer};
use medibook_server::{create_app, MedibookServer};
use medibook_server::server::ServerConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// MediBook HTTP Server
#[derive(Parser, Debug)]
#[command(name = "medibook-server")]
#[command(about = "Healthcare appointment booking HTTP API server")]
struct Args {
    /// Server bind address (overrides MEDIBOOK_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides MEDIBOOK_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing();

    let mut config = ServerConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    info!("starting MediBook server v{}", env!("CARGO_PKG_VERSION"));

    let pool = database_layer::connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    database_layer::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let users = Arc::new(
        database_layer::PostgresUserRepository::new(pool.clone())
            .context("failed to initialize the user store")?,
    );
    let appointment_repo = Arc::new(database_layer::PostgresAppointmentRepository::new(pool));
    let mailer = Arc::new(SmtpMailer::new(EmailConfig::from_env()));

    let server = MedibookServer::new(users, appointment_repo, mailer, AuthConfig::from_env());
    let app = create_app(server);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("listening on http://{addr}");
    info!("API docs at http://{addr}/swagger-ui");

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "medibook_server=info,auth_identity=info,tower_http=info,sqlx=warn".into()
    });

    let is_development =
        std::env::var("MEDIBOOK_ENV").unwrap_or_else(|_| "development".to_string()) == "development";

    if is_development {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    } else {
        // Structured JSON logging for production.
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    }
}
