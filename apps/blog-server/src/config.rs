//! Application configuration loaded from environment variables.

use std::env;

use blog_infra::database::DatabaseConfig;

/// Which mail gateway delivers shared posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    /// Log messages instead of sending them.
    Console,
    /// POST messages to an HTTP mail API.
    Http,
}

/// Mail configuration.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend: MailBackend,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub mail: MailConfig,
    /// Scheme and host used in links sent by email, e.g.
    /// `https://blog.example.com`. When unset, links are built from the
    /// request's host, which clients control through `Host`, `Forwarded`
    /// and `X-Forwarded-Host`.
    pub site_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            mail: MailConfig::from_env(),
            site_url: env::var("SITE_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        }
    }
}

impl MailConfig {
    /// Load mail settings from `MAIL_*` environment variables.
    pub fn from_env() -> Self {
        let backend = match env::var("MAIL_BACKEND")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            Ok("http") => MailBackend::Http,
            Ok("console") | Err(_) => MailBackend::Console,
            Ok(other) => {
                tracing::warn!("Unknown MAIL_BACKEND '{}', using console", other);
                MailBackend::Console
            }
        };

        Self {
            backend,
            api_url: env::var("MAIL_API_URL").ok(),
            api_key: env::var("MAIL_API_KEY").ok(),
            from: env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@blog.local".to_string()),
        }
    }
}
