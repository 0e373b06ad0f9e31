use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use super::{connection_args, pg_command, run, BackupError, PgTools};
use crate::config::BackupConfig;

pub fn is_compressed(file: &Path) -> bool {
    file.extension().is_some_and(|ext| ext == "gz")
}

pub fn createdb_args(config: &BackupConfig) -> Vec<String> {
    let mut args = connection_args(config);
    args.push(config.database.clone());
    args
}

/// psql arguments; with `file` set, psql reads the script itself instead of stdin.
pub fn psql_args(config: &BackupConfig, file: Option<&Path>) -> Vec<String> {
    let mut args = connection_args(config);
    args.push(format!("--dbname={}", config.database));
    if let Some(file) = file {
        args.push("-f".to_string());
        args.push(file.display().to_string());
    }
    args
}

/// Restore a plain or gzip-compressed SQL dump into the configured database.
///
/// The database is created first; if that fails it is assumed to exist already.
pub async fn perform_restore(
    config: &BackupConfig,
    tools: &PgTools,
    backup_file: &Path,
) -> Result<(), BackupError> {
    if !tokio::fs::try_exists(backup_file).await.unwrap_or(false) {
        return Err(BackupError::NotFound(backup_file.to_path_buf()));
    }

    info!(database = %config.database, "Starting restore");

    let createdb = pg_command(&tools.createdb, &createdb_args(config), config);
    match run(&tools.createdb, createdb).await {
        Ok(()) => info!(database = %config.database, "Created fresh database"),
        Err(BackupError::CommandFailed { .. }) => warn!(
            database = %config.database,
            "Database already exists. Proceeding with restore..."
        ),
        Err(e) => return Err(e),
    }

    if is_compressed(backup_file) {
        info!("Detected compressed backup file. Decompressing and restoring...");
        restore_compressed(config, tools, backup_file).await?;
    } else {
        info!("Detected uncompressed backup file. Restoring...");
        let args = psql_args(config, Some(backup_file));
        run(&tools.psql, pg_command(&tools.psql, &args, config)).await?;
    }

    info!("Restore completed successfully");
    Ok(())
}

/// `gunzip --stdout <file> | psql ...`
async fn restore_compressed(
    config: &BackupConfig,
    tools: &PgTools,
    backup_file: &Path,
) -> Result<(), BackupError> {
    let mut gunzip = Command::new(&tools.gunzip)
        .arg("--stdout")
        .arg(backup_file)
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| BackupError::Spawn {
            program: tools.gunzip.clone(),
            source,
        })?;

    let stdin: Stdio = match gunzip.stdout.take() {
        Some(stdout) => TryInto::<Stdio>::try_into(stdout)?,
        None => Stdio::null(),
    };

    let mut psql = pg_command(&tools.psql, &psql_args(config, None), config);
    psql.stdin(stdin);
    let result = run(&tools.psql, psql).await;

    // psql's exit status decides the outcome; gunzip is only reaped
    if let Err(e) = gunzip.wait().await {
        warn!(error = %e, "Failed to wait for gunzip");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::test_support;
    use tempfile::TempDir;

    #[test]
    fn test_is_compressed() {
        assert!(is_compressed(Path::new("shop_backup_20240101000000.sql.gz")));
        assert!(!is_compressed(Path::new("shop_backup_20240101000000.sql")));
        assert!(!is_compressed(Path::new("gz")));
    }

    #[test]
    fn test_psql_args() {
        let config = test_support::config(None);

        assert_eq!(
            psql_args(&config, None),
            vec!["--host=localhost", "--port=5433", "--username=postgres", "--dbname=shop"]
        );
        assert_eq!(
            psql_args(&config, Some(Path::new("/b/shop.sql"))).last().map(String::as_str),
            Some("/b/shop.sql")
        );
        assert_eq!(createdb_args(&config).last().map(String::as_str), Some("shop"));
    }

    #[tokio::test]
    async fn test_restore_missing_file() {
        let config = test_support::config(None);
        let err = perform_restore(
            &config,
            &test_support::succeeding_tools(),
            Path::new("/nonexistent/shop.sql"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BackupError::NotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_restore_proceeds_when_database_exists() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("shop.sql");
        std::fs::write(&file, "SELECT 1;").unwrap();
        let tools = PgTools {
            createdb: "false".to_string(),
            ..test_support::succeeding_tools()
        };

        perform_restore(&test_support::config(None), &tools, &file)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_restore_fails_when_createdb_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("shop.sql");
        std::fs::write(&file, "SELECT 1;").unwrap();
        let tools = PgTools {
            createdb: "definitely-not-a-real-createdb".to_string(),
            ..test_support::succeeding_tools()
        };

        let err = perform_restore(&test_support::config(None), &tools, &file)
            .await
            .unwrap_err();

        assert!(matches!(err, BackupError::Spawn { ref program, .. } if program == "definitely-not-a-real-createdb"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_restore_compressed_pipes_through_gunzip() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("shop.sql.gz");
        std::fs::write(&file, b"not really gzip").unwrap();

        perform_restore(&test_support::config(None), &test_support::succeeding_tools(), &file)
            .await
            .unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_restore_fails_when_psql_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("shop.sql");
        std::fs::write(&file, "SELECT 1;").unwrap();
        let tools = PgTools {
            psql: "false".to_string(),
            ..test_support::succeeding_tools()
        };

        let err = perform_restore(&test_support::config(None), &tools, &file)
            .await
            .unwrap_err();

        assert!(matches!(err, BackupError::CommandFailed { .. }));
    }
}
