use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

use crate::error::CliError;

/// Installs the stderr console subscriber and, if requested, an audit file layer
/// that only keeps ledger events.
///
/// The returned guard must stay alive until exit or buffered audit lines
/// are lost.
pub fn init_tracing(audit_log: Option<&Path>) -> Result<Option<WorkerGuard>, CliError> {
    let mut guard = None;

    let audit_layer = match audit_log {
        Some(path) => {
            let file_name = path.file_name().ok_or_else(|| {
                CliError::InvalidArgument(format!("audit log path has no file name: {}", path.display()))
            })?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)?;

            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(worker_guard);

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
                        metadata.target().starts_with("custody_ledger")
                    })),
            )
        }
        None => None,
    };

    // stdout is reserved for command output.
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_filter(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,custody_ledger=debug".into()),
    );

    tracing_subscriber::registry()
        .with(audit_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}
