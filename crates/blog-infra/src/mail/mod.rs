//! Mail gateways - console, HTTP mail API and in-memory outbox.

mod console;
mod memory;

#[cfg(feature = "http-mail")]
mod http;

pub use console::ConsoleMailer;
pub use memory::InMemoryMailer;

#[cfg(feature = "http-mail")]
pub use http::{HttpMailer, HttpMailerConfig};
