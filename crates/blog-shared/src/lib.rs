//! # Blog Shared
//!
//! Wire types shared between the server and its clients (templates, SPA).

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
