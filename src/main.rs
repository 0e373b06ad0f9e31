use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn, error};
use tracing_appender::non_blocking::WorkerGuard;
use authpay::{
    backup::{self, BackupError, PgTools},
    config::{BackupConfig, Config},
    routes::create_router,
    utils::init_logger,
    AppState,
};

#[derive(Parser)]
#[command(name = "authpay", version, about = "Token-authenticated payment API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Dump the configured PostgreSQL database into BACKUP_PATH
    Backup,
    /// Restore a .sql or .sql.gz dump into the configured database
    Restore {
        /// Path to the backup file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            init_logger(None)?;
            serve().await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Backup => {
            let guard = init_logger(Some(Path::new("logs/backup.log")))?;
            let result = async {
                let config = BackupConfig::from_env()?;
                backup::perform_backup(&config, &PgTools::default()).await
            }
            .await;
            if let Ok(path) = &result {
                info!(file = %path.display(), "Backup finished");
            }
            Ok(finish("Backup", result, guard))
        }
        Command::Restore { file } => {
            let guard = init_logger(Some(Path::new("logs/restore.log")))?;
            let result = async {
                let config = BackupConfig::from_env()?;
                backup::perform_restore(&config, &PgTools::default(), &file).await
            }
            .await;
            Ok(finish("Restore", result, guard))
        }
    }
}

/// Log the outcome of a backup task, then flush the log file before exit.
fn finish<T>(task: &str, result: Result<T, BackupError>, guard: Option<WorkerGuard>) -> ExitCode {
    let code = match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "{} process failed", task);
            ExitCode::FAILURE
        }
    };
    drop(guard);
    code
}

async fn serve() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    if config.auth.uses_default_secret() {
        warn!("AUTH_SECRET is not set; using the built-in development secret");
    }

    // Create shared state
    let state = AppState::from_config(config.clone());

    // Create router
    let app = create_router(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()
        .map_err(|e| anyhow::anyhow!("Invalid HOST {}: {}", config.server.host, e))?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
