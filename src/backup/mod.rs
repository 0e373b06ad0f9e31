//! PostgreSQL backup and restore.
//!
//! Thin wrappers around the PostgreSQL client tools. The password is passed
//! to each child through `PGPASSWORD`, never on the command line.

pub mod dump;
pub mod restore;

pub use dump::perform_backup;
pub use restore::perform_restore;

use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

use crate::config::BackupConfig;

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("{0} is not defined in the credentials.env file.")]
    MissingVar(String),

    #[error("Backup file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{program} exited with status {code:?}")]
    CommandFailed { program: String, code: Option<i32> },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Names (or paths) of the external tools invoked by backup and restore.
#[derive(Debug, Clone)]
pub struct PgTools {
    pub pg_dump: String,
    pub createdb: String,
    pub psql: String,
    pub gzip: String,
    pub gunzip: String,
}

impl Default for PgTools {
    fn default() -> Self {
        Self {
            pg_dump: "pg_dump".to_string(),
            createdb: "createdb".to_string(),
            psql: "psql".to_string(),
            gzip: "gzip".to_string(),
            gunzip: "gunzip".to_string(),
        }
    }
}

/// `--host`, `--port` and `--username` flags shared by every tool.
pub(crate) fn connection_args(config: &BackupConfig) -> Vec<String> {
    vec![
        format!("--host={}", config.host),
        format!("--port={}", config.port),
        format!("--username={}", config.user),
    ]
}

pub(crate) fn pg_command(program: &str, args: &[String], config: &BackupConfig) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args).env("PGPASSWORD", &config.password);
    cmd
}

/// Run to completion; a non-zero exit becomes [`BackupError::CommandFailed`].
pub(crate) async fn run(program: &str, mut cmd: Command) -> Result<(), BackupError> {
    debug!(program, "Spawning command");
    let status = cmd.status().await.map_err(|source| BackupError::Spawn {
        program: program.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(BackupError::CommandFailed {
            program: program.to_string(),
            code: status.code(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn config(backup_path: Option<PathBuf>) -> BackupConfig {
        BackupConfig {
            host: "localhost".to_string(),
            port: "5433".to_string(),
            user: "postgres".to_string(),
            password: "pw".to_string(),
            database: "shop".to_string(),
            backup_path,
        }
    }

    /// Every tool replaced with `true`, so each step succeeds without side effects.
    pub fn succeeding_tools() -> PgTools {
        PgTools {
            pg_dump: "true".to_string(),
            createdb: "true".to_string(),
            psql: "true".to_string(),
            gzip: "true".to_string(),
            gunzip: "true".to_string(),
        }
    }
}
