//! Domain entities - the core business objects.

mod comment;
mod post;
mod search;
mod tag;

pub use comment::Comment;
pub use post::{Post, PostStatus};
pub use search::SearchResult;
pub use tag::Tag;
