use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::{connection_args, pg_command, run, BackupError, PgTools};
use crate::config::BackupConfig;

/// `<database>_backup_<YYYYmmddHHMMSS>.sql`
pub fn backup_file_name(database: &str, timestamp: &str) -> String {
    format!("{}_backup_{}.sql", database, timestamp)
}

pub fn pg_dump_args(config: &BackupConfig, file: &Path) -> Vec<String> {
    let mut args = connection_args(config);
    args.push(format!("--dbname={}", config.database));
    args.push("--no-password".to_string());
    args.push(format!("--file={}", file.display()));
    args
}

/// Dump the database into `BACKUP_PATH` and gzip the result.
///
/// Returns the path of the file that was left on disk: the `.gz` archive,
/// or the plain `.sql` dump if compression failed.
pub async fn perform_backup(config: &BackupConfig, tools: &PgTools) -> Result<PathBuf, BackupError> {
    let backup_dir = config.require_backup_path()?;
    tokio::fs::create_dir_all(backup_dir).await?;

    let timestamp = Local::now().format("%Y%m%d%H%M%S").to_string();
    let backup_file = backup_dir.join(backup_file_name(&config.database, &timestamp));

    info!(database = %config.database, "Starting backup");

    let args = pg_dump_args(config, &backup_file);
    run(&tools.pg_dump, pg_command(&tools.pg_dump, &args, config))
        .await
        .inspect_err(|e| error!(error = %e, "Error during backup"))?;

    info!(file = %backup_file.display(), "Backup completed successfully");

    info!("Compressing backup file...");
    let mut gzip = tokio::process::Command::new(&tools.gzip);
    gzip.arg(&backup_file);
    match run(&tools.gzip, gzip).await {
        Ok(()) => {
            let mut compressed = backup_file.into_os_string();
            compressed.push(".gz");
            let compressed = PathBuf::from(compressed);
            info!(file = %compressed.display(), "Backup compressed successfully");
            Ok(compressed)
        }
        Err(e) => {
            warn!(error = %e, "Compression failed, but backup file is still intact");
            Ok(backup_file)
        }
    }
}
