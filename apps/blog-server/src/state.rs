//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::Mailer;
use blog_core::{BlogService, BlogSettings};
use blog_infra::{ConsoleMailer, InMemoryBlogStore};

#[cfg(feature = "postgres")]
use blog_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use blog_infra::database::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
};

use crate::config::{AppConfig, MailBackend, MailConfig};

/// Where posts, tags and comments live.
#[derive(Clone)]
pub enum Storage {
    #[cfg(feature = "postgres")]
    Postgres(Arc<DatabaseConnections>),
    Memory(Arc<InMemoryBlogStore>),
}

impl Storage {
    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "postgres")]
            Storage::Postgres(_) => "postgres",
            Storage::Memory(_) => "memory",
        }
    }

    /// Whether the backing store answers.
    pub async fn is_healthy(&self) -> bool {
        match self {
            #[cfg(feature = "postgres")]
            Storage::Postgres(db) => match db.ping().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("Database health check failed: {}", e);
                    false
                }
            },
            Storage::Memory(_) => true,
        }
    }

    fn blog_service(&self, mailer: Arc<dyn Mailer>, settings: BlogSettings) -> BlogService {
        match self {
            #[cfg(feature = "postgres")]
            Storage::Postgres(db) => BlogService::new(
                Arc::new(PostgresPostRepository::new(db.main.clone())),
                Arc::new(PostgresTagRepository::new(db.main.clone())),
                Arc::new(PostgresCommentRepository::new(db.main.clone())),
                mailer,
                settings,
            ),
            Storage::Memory(store) => BlogService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                mailer,
                settings,
            ),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub storage: Storage,
    /// Fixed origin for emailed links; see [`AppConfig::site_url`].
    pub site_url: Option<String>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let storage = Self::init_storage(config).await;
        let mailer = build_mailer(&config.mail);
        let settings = BlogSettings {
            mail_from: config.mail.from.clone(),
            ..BlogSettings::default()
        };

        if config.site_url.is_none() {
            tracing::warn!("SITE_URL not set. Shared post links will use the request host.");
        }

        tracing::info!(storage = storage.name(), "Application state initialized");

        Self::with_storage(storage, mailer, settings).with_site_url(config.site_url.clone())
    }

    /// Assemble state from an existing store and mailer.
    pub fn with_storage(storage: Storage, mailer: Arc<dyn Mailer>, settings: BlogSettings) -> Self {
        let blog = Arc::new(storage.blog_service(mailer, settings));
        Self {
            blog,
            storage,
            site_url: None,
        }
    }

    pub fn with_site_url(mut self, site_url: Option<String>) -> Self {
        self.site_url = site_url;
        self
    }

    #[cfg(feature = "postgres")]
    async fn init_storage(config: &AppConfig) -> Storage {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Storage::Memory(Arc::new(InMemoryBlogStore::new()));
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => Storage::Postgres(Arc::new(connections)),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Storage::Memory(Arc::new(InMemoryBlogStore::new()))
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn init_storage(_config: &AppConfig) -> Storage {
        tracing::info!("Running without postgres feature - using in-memory store");
        Storage::Memory(Arc::new(InMemoryBlogStore::new()))
    }
}

fn build_mailer(config: &MailConfig) -> Arc<dyn Mailer> {
    match config.backend {
        MailBackend::Console => Arc::new(ConsoleMailer),
        MailBackend::Http => http_mailer(config),
    }
}

#[cfg(feature = "http-mail")]
fn http_mailer(config: &MailConfig) -> Arc<dyn Mailer> {
    use blog_infra::{HttpMailer, HttpMailerConfig};

    match &config.api_url {
        Some(api_url) => Arc::new(HttpMailer::new(HttpMailerConfig {
            api_url: api_url.clone(),
            api_key: config.api_key.clone(),
        })),
        None => {
            tracing::warn!("MAIL_BACKEND=http but MAIL_API_URL is not set. Using console mailer.");
            Arc::new(ConsoleMailer)
        }
    }
}

#[cfg(not(feature = "http-mail"))]
fn http_mailer(_config: &MailConfig) -> Arc<dyn Mailer> {
    tracing::warn!("Built without http-mail feature. Using console mailer.");
    Arc::new(ConsoleMailer)
}
