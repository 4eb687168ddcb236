//! In-memory port implementations.

mod store;

pub use store::InMemoryBlogStore;
