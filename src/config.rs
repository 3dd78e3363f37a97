use std::net::IpAddr;
use std::path::PathBuf;

use chrono::Duration;
use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    /// Base for image links. `None` derives it from each request.
    pub public_base_url: Option<String>,
    /// Peers whose `X-Forwarded-*` headers are believed.
    pub trusted_proxies: Vec<IpNet>,
    pub upload_dir: PathBuf,
    pub max_upload_size: usize,
    pub duplicate_window: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_or("DATABASE_URL", "sqlite://withcare.db");

        let host: IpAddr = env_or("WITHCARE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid WITHCARE_HOST: {e}"))?;

        let port: u16 = env_or("WITHCARE_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid WITHCARE_PORT: {e}"))?;

        let public_base_url = std::env::var("WITHCARE_PUBLIC_BASE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let trusted_proxies: Vec<IpNet> = env_or("WITHCARE_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid WITHCARE_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let upload_dir = PathBuf::from(env_or("WITHCARE_UPLOAD_DIR", "uploads"));

        let max_upload_size: usize = env_or("WITHCARE_MAX_UPLOAD_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid WITHCARE_MAX_UPLOAD_SIZE: {e}"))?;

        let window_minutes: i64 = env_or("WITHCARE_DUPLICATE_WINDOW_MINUTES", "30")
            .parse()
            .map_err(|e| format!("Invalid WITHCARE_DUPLICATE_WINDOW_MINUTES: {e}"))?;
        if window_minutes <= 0 {
            return Err("WITHCARE_DUPLICATE_WINDOW_MINUTES must be positive".to_string());
        }

        let log_level = env_or("WITHCARE_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            host,
            port,
            public_base_url,
            trusted_proxies,
            upload_dir,
            max_upload_size,
            duplicate_window: Duration::minutes(window_minutes),
            log_level,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
