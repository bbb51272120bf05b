//! Server settings loaded via OrthoConfig, plus the resolved server
//! configuration handed to [`super::create_server`].

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use marketplace::domain::CompletionStatus;
use marketplace::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings read from `MARKET_*` environment variables, CLI flags, or a
/// config file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKET")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-process stores are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Comma-separated origins allowed to open the push channel.
    pub allowed_origins: Option<String>,
    /// Status a review moves a transaction into: `completed` or `received`.
    pub review_completion: Option<String>,
}

impl ServerSettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the configured address does not parse.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid MARKET_BIND_ADDR {raw:?}: {err}"),
            )
        })
    }

    /// Maximum pool size, falling back to 10.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Session key path, falling back to the mounted secret location.
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    /// Trimmed, non-empty origins from the comma-separated list.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .unwrap_or(DEFAULT_ALLOWED_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Completion status for reviews, defaulting to `COMPLETED`.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] for values other than `completed` or
    /// `received`.
    pub fn review_completion(&self) -> std::io::Result<CompletionStatus> {
        match self.review_completion.as_deref() {
            None => Ok(CompletionStatus::default()),
            Some(raw) => raw.parse().map_err(|err| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("invalid MARKET_REVIEW_COMPLETION: {err}"),
                )
            }),
        }
    }

    /// Load the session signing key.
    ///
    /// An unreadable key file is fatal unless ephemeral keys are allowed or
    /// this is a debug build.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the key cannot be read and no fallback
    /// is permitted.
    pub fn session_key(&self) -> std::io::Result<Key> {
        let path = self.session_key_file();
        match std::fs::read(path) {
            Ok(bytes) => Ok(Key::derive_from(&bytes)),
            Err(e) => {
                if cfg!(debug_assertions) || self.session_allow_ephemeral {
                    warn!(path = %path.display(), error = %e, "using temporary session key (dev only)");
                    Ok(Key::generate())
                } else {
                    Err(std::io::Error::other(format!(
                        "failed to read session key at {}: {e}",
                        path.display()
                    )))
                }
            }
        }
    }
}

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) allowed_origins: Vec<String>,
    pub(crate) completion: CompletionStatus,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            allowed_origins: Vec::new(),
            completion: CompletionStatus::default(),
            db_pool: None,
        }
    }

    /// Origins allowed to open the push channel.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// Status a review moves a transaction into.
    #[must_use]
    pub const fn with_completion(mut self, completion: CompletionStatus) -> Self {
        self.completion = completion;
        self
    }

    /// Attach a database connection pool; Diesel adapters replace the
    /// in-process stores.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
