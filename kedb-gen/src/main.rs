//! kedb-gen - KEDB document generator
//!
//! Web form for Known Error Database entries. Each submission becomes a
//! numbered Word document (`KEDB0001.docx`, ...) in the output directory and
//! is offered back for download.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kedb_common::config::{ConfigOverrides, ServiceConfig, TomlConfig};
use kedb_common::DocumentStore;
use kedb_gen::{build_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments; each also reads an environment variable
#[derive(Debug, Parser)]
#[command(name = "kedb-gen", version, about = "KEDB document generator")]
struct Args {
    /// Directory generated documents are written to
    #[arg(long, env = "KEDB_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "KEDB_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "KEDB_PORT")]
    port: Option<u16>,

    /// Largest accepted form submission, in MiB
    #[arg(long, env = "KEDB_MAX_UPLOAD_MB")]
    max_upload_mb: Option<usize>,

    /// TOML config file (defaults to <config dir>/kedb/config.toml)
    #[arg(long, env = "KEDB_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output_dir: self.output_dir.clone(),
            host: self.host.clone(),
            port: self.port,
            max_upload_mb: self.max_upload_mb,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting KEDB Document Generator (kedb-gen) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let file_config = TomlConfig::load_or_default(args.config.as_deref());
    let config = ServiceConfig::resolve(args.overrides(), file_config)?;

    let store = DocumentStore::new(&config.output_dir);
    store
        .ensure_exists()
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;
    info!("Output directory: {}", config.output_dir.display());
    info!("Next KEDB number: {}", store.next_number()?);

    let state = AppState::new(store, config.max_upload_bytes());
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("kedb-gen listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["kedb-gen"]).unwrap();
        assert_eq!(args.log_level, "info");
        assert!(args.config.is_none());
    }

    #[test]
    #[serial]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "kedb-gen",
            "--output-dir",
            "/tmp/kedb",
            "--port",
            "9100",
        ])
        .unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.output_dir, Some(PathBuf::from("/tmp/kedb")));
        assert_eq!(overrides.port, Some(9100));
    }

    #[test]
    fn test_args_reject_bad_port() {
        assert!(Args::try_parse_from(["kedb-gen", "--port", "http"]).is_err());
    }

    #[test]
    #[serial]
    fn test_args_read_environment() {
        std::env::set_var("KEDB_OUTPUT_DIR", "/tmp/kedb-env");
        let args = Args::try_parse_from(["kedb-gen"]).unwrap();
        std::env::remove_var("KEDB_OUTPUT_DIR");

        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/kedb-env")));
    }

    #[test]
    #[serial]
    fn test_command_line_beats_environment() {
        std::env::set_var("KEDB_OUTPUT_DIR", "/tmp/kedb-env");
        let args = Args::try_parse_from(["kedb-gen", "--output-dir", "/tmp/kedb-cli"]).unwrap();
        std::env::remove_var("KEDB_OUTPUT_DIR");

        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/kedb-cli")));
    }
}
