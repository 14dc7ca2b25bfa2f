//! Bookshelf server entry point.
//!
//! # Responsibility
//! - Resolve configuration from an optional TOML file plus flag overrides.
//! - Initialize logging, open the store once and serve HTTP until ctrl-c.

use bookshelf_api::{load_config, serve, ServerConfig, Store};
use bookshelf_core::init_logging;
use clap::Parser;
use log::{error, info};
use std::error::Error;
use std::path::PathBuf;

/// Author/book catalogue served over HTTP.
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to
    #[arg(long, short)]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(database) = self.database {
            config.database_path = database;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.log_dir.is_some() {
            config.log_dir = self.log_dir;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    let config = cli.apply_overrides(config);
    config.validate()?;

    let log_dir = match &config.log_dir {
        Some(dir) => Some(
            dir.to_str()
                .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", dir.display()))?,
        ),
        None => None,
    };
    init_logging(&config.log_level, log_dir)?;

    info!(
        "event=config_loaded module=cli status=ok addr={} database={}",
        config.socket_addr(),
        config.database_path.display()
    );

    let store = match Store::open(&config.database_path) {
        Ok(store) => store,
        Err(err) => {
            error!(
                "event=store_open module=cli status=error database={} error={}",
                config.database_path.display(),
                err
            );
            return Err(err.into());
        }
    };

    serve(&config, store).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use bookshelf_api::ServerConfig;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn flags_override_file_values() {
        let cli = Cli::try_parse_from([
            "bookshelf",
            "--port",
            "8080",
            "--database",
            "/tmp/shelf.sqlite3",
        ])
        .unwrap();
        let base = ServerConfig {
            host: "0.0.0.0".to_string(),
            ..ServerConfig::default()
        };

        let config = cli.apply_overrides(base);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("/tmp/shelf.sqlite3"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn no_flags_keep_config() {
        let cli = Cli::try_parse_from(["bookshelf"]).unwrap();
        assert_eq!(
            cli.apply_overrides(ServerConfig::default()),
            ServerConfig::default()
        );
    }
}
