use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Default cap on a single asset upload: 10 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Which backend the stores run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// In-process stores seeded with the sample projects. Nothing persists.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret (and the database URL on the postgres
/// backend) have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is postgres.
    pub database_url: Option<String>,
    /// Directory uploaded images are written to.
    pub asset_dir: PathBuf,
    /// Public URL prefix the asset directory is served under.
    pub asset_base_url: String,
    pub max_upload_bytes: usize,
    /// Idle time after which a gallery session is evicted.
    pub gallery_session_ttl_secs: u64,
    /// Most gallery sessions held at once.
    pub max_gallery_sessions: usize,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Bootstrap admin account. On postgres it is created only when no
    /// admin exists yet; on the memory backend it is the only account.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `STORE_BACKEND`            | `postgres`                 |
    /// | `DATABASE_URL`             | -- (required for postgres) |
    /// | `ASSET_DIR`                | `./uploads`                |
    /// | `ASSET_BASE_URL`           | `/assets`                  |
    /// | `MAX_UPLOAD_BYTES`         | `10485760`                 |
    /// | `GALLERY_SESSION_TTL_SECS` | `1800`                     |
    /// | `MAX_GALLERY_SESSIONS`     | `1000`                     |
    /// | `ADMIN_EMAIL`              | --                         |
    /// | `ADMIN_PASSWORD`           | --                         |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on unparsable values, and when the postgres backend is
    /// selected without `DATABASE_URL`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_parse("PORT", 3000);
        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );
        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", 30);

        let store_backend: StoreBackend = env_parse("STORE_BACKEND", StoreBackend::Postgres);
        let database_url = non_empty_var("DATABASE_URL");
        if store_backend == StoreBackend::Postgres {
            assert!(
                database_url.is_some(),
                "DATABASE_URL must be set when STORE_BACKEND=postgres"
            );
        }

        let asset_dir = PathBuf::from(
            std::env::var("ASSET_DIR").unwrap_or_else(|_| "./uploads".into()),
        );
        let asset_base_url =
            normalize_base_url(&std::env::var("ASSET_BASE_URL").unwrap_or_else(|_| "/assets".into()));
        let max_upload_bytes: usize = env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES);
        let gallery_session_ttl_secs: u64 = env_parse("GALLERY_SESSION_TTL_SECS", 1800);
        let max_gallery_sessions: usize = env_parse("MAX_GALLERY_SESSIONS", 1000);
        assert!(max_gallery_sessions > 0, "MAX_GALLERY_SESSIONS must be at least 1");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store_backend,
            database_url,
            asset_dir,
            asset_base_url,
            max_upload_bytes,
            gallery_session_ttl_secs,
            max_gallery_sessions,
            jwt,
            admin_email: non_empty_var("ADMIN_EMAIL"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
        }
    }
}

/// Read and parse `key`, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `assets/` and `/assets/` both become `/assets`.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_drops_blanks() {
        assert_eq!(
            parse_origins("http://localhost:5173, ,https://taller.example.com,"),
            vec!["http://localhost:5173", "https://taller.example.com"]
        );
    }

    #[test]
    fn test_store_backend_from_str() {
        assert_eq!("postgres".parse::<StoreBackend>(), Ok(StoreBackend::Postgres));
        assert_eq!(" Memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("assets/"), "/assets");
        assert_eq!(normalize_base_url("/media/uploads/"), "/media/uploads");
    }
}
