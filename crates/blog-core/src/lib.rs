//! # Blog Core
//!
//! The domain layer of the blog service.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, ports, pagination, trigram similarity, form validation and the
//! [`BlogService`] that composes them into the reader-facing operations.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod service;
pub mod similarity;

pub use error::DomainError;
pub use service::{BlogService, BlogSettings};
