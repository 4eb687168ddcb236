//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//! This crate contains database, in-memory and mail integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM (trigram search needs `pg_trgm`)
//! - `http-mail` - Delivery through an HTTP mail API via reqwest

pub mod database;
pub mod mail;
pub mod memory;

// Re-exports - In-Memory
pub use mail::{ConsoleMailer, InMemoryMailer};
pub use memory::InMemoryBlogStore;

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "http-mail")]
pub use mail::{HttpMailer, HttpMailerConfig};
