use serde::{Deserialize, Serialize};

use super::Post;

/// A post annotated with its similarity to a search query.
///
/// The score is the sum of the title and body trigram similarities, so it
/// ranges over `[0, 2]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub post: Post,
    pub similarity: f64,
}
