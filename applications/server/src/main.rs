/// Jukebox Server - collaborative playlist queue server
use clap::{Parser, Subcommand};
use jukebox_core::UserId;
use jukebox_server::{
    config::ServerConfig, create_router, jobs::AdvancementScheduler, services::AuthService,
};
use jukebox_storage::SqliteQueueStore;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jukebox-server")]
#[command(about = "Collaborative playlist queue server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the advancement scheduler
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Apply database migrations and exit
    Migrate {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print a development access token
    Token {
        /// User ID to issue the token for
        #[arg(short, long)]
        user: String,
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "jukebox_server=info,jukebox_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(load_config(config)?).await?;
        }
        Commands::Migrate { config } => {
            migrate(&load_config(config)?).await?;
        }
        Commands::Token { user, config } => {
            issue_token(&load_config(config)?, &user)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ServerConfig> {
    let config = ServerConfig::load(path.as_deref())?;
    config.validate()?;
    Ok(config)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Jukebox Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    ensure_database_dir(&config.storage.database_url).await?;
    let pool = jukebox_storage::create_pool(&config.storage.database_url).await?;
    jukebox_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    let store = Arc::new(SqliteQueueStore::new(pool.clone()));
    let app_state = jukebox_server::build_state(store, &config);

    // Background advancement
    let shutdown = CancellationToken::new();
    let scheduler = if config.scheduler.enabled {
        let scheduler = AdvancementScheduler::new(
            Arc::clone(&app_state.queue),
            config.scheduler.tick_interval(),
        );
        Some(scheduler.spawn(shutdown.clone()))
    } else {
        tracing::warn!("Advancement scheduler disabled");
        None
    };

    let app = create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            tracing::error!("Advancement scheduler task failed: {}", e);
        }
    }

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn migrate(config: &ServerConfig) -> anyhow::Result<()> {
    ensure_database_dir(&config.storage.database_url).await?;
    let pool = jukebox_storage::create_pool(&config.storage.database_url).await?;
    jukebox_storage::run_migrations(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations applied to {}", config.storage.database_url);
    Ok(())
}

/// Create the directory holding a file-backed SQLite database
async fn ensure_database_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    Ok(())
}

fn issue_token(config: &ServerConfig, user: &str) -> anyhow::Result<()> {
    let auth_service = AuthService::new(&config.auth.jwt_secret, config.auth.jwt_expiration_hours);
    let token = auth_service.create_access_token(&UserId::new(user))?;

    println!("{token}");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM, or once `shutdown` is cancelled elsewhere
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
        () = shutdown.cancelled() => {},
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
