//! placerec-server configuration
//!
//! Each setting resolves as: command-line flag → environment variable →
//! TOML config file → compiled default. Flags and environment variables are
//! parsed by clap; the TOML file and defaults come from placerec-common.

use clap::Parser;
use placerec_common::config::{
    default_config_path, default_database_path, StoreBackend, TomlConfig, DEFAULT_ALLOWED_ORIGIN,
    DEFAULT_BIND_ADDR, DEFAULT_LOG_LEVEL, DEFAULT_PORT,
};
use placerec_common::{Error, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cors::AllowedOrigin;
use crate::RouterConfig;

/// Command-line arguments for placerec-server
#[derive(Parser, Debug, Default)]
#[command(name = "placerec-server")]
#[command(about = "Place recommendation aggregation service")]
#[command(version)]
pub struct CliArgs {
    /// Path to TOML config file
    #[arg(long, env = "PLACEREC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "PLACEREC_BIND")]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PLACEREC_PORT")]
    pub port: Option<u16>,

    /// Store backend: memory or sqlite
    #[arg(long, env = "PLACEREC_STORE")]
    pub store: Option<StoreBackend>,

    /// SQLite database file (sqlite backend only)
    #[arg(long, env = "PLACEREC_DATABASE")]
    pub database: Option<PathBuf>,

    /// Origin allowed to call the API ("*" for any)
    #[arg(long, env = "PLACEREC_ALLOWED_ORIGIN")]
    pub allowed_origin: Option<String>,

    /// Directory of static frontend files to serve
    #[arg(long, env = "PLACEREC_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl CliArgs {
    /// Config file to read: explicit flag/env, otherwise the platform default
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(default_config_path)
    }
}

/// Fully resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub store: StoreBackend,
    pub database_path: PathBuf,
    pub allowed_origin: String,
    pub static_dir: Option<PathBuf>,
    pub log_level: String,
}

impl ServerConfig {
    /// Merge arguments over the TOML file over compiled defaults
    pub fn resolve(args: CliArgs, toml: TomlConfig) -> Self {
        Self {
            bind_addr: args
                .bind
                .or(toml.bind_addr)
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port: args.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            store: args.store.or(toml.store).unwrap_or_default(),
            database_path: args
                .database
                .or(toml.database_path)
                .unwrap_or_else(default_database_path),
            allowed_origin: args
                .allowed_origin
                .or(toml.allowed_origin)
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
            static_dir: args.static_dir.or(toml.static_dir),
            log_level: toml
                .logging
                .level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|e| {
                Error::Config(format!(
                    "Invalid bind address {}:{}: {}",
                    self.bind_addr, self.port, e
                ))
            })
    }

    /// Default tracing directives when `RUST_LOG` is unset
    pub fn log_filter(&self) -> String {
        format!(
            "placerec_server={0},placerec_common={0},tower_http={0}",
            self.log_level
        )
    }

    /// Router settings; fails if the allowed origin is not a valid header value
    pub fn router_config(&self) -> Result<RouterConfig> {
        Ok(RouterConfig {
            allowed_origin: AllowedOrigin::parse(&self.allowed_origin)?,
            static_dir: self.static_dir.clone(),
        })
    }
}
