//! Data Transfer Objects - the page contexts returned by the blog endpoints.
//!
//! Form payloads are generic so each endpoint can echo back its own typed
//! form together with field errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A tag as shown on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub name: String,
    pub slug: String,
}

/// A post's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub author_id: String,
    pub publish: String,
    /// Canonical detail path, e.g. `/blog/2024/3/1/hello/`.
    pub url: String,
    pub tags: Vec<TagResponse>,
}

/// A comment as shown under a post. The author's email is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub name: String,
    pub body: String,
    pub created_at: String,
}

/// Position of a page within a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationResponse {
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub per_page: u64,
    pub has_next: bool,
    pub has_previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<u64>,
}

/// A form's current values and any field errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse<F> {
    pub data: F,
    pub errors: BTreeMap<String, Vec<String>>,
}

/// GET /blog/ and /blog/tag/{tag_slug}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub pagination: PaginationResponse,
    pub tag: Option<TagResponse>,
}

/// GET /blog/{year}/{month}/{day}/{slug}/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse<F> {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub form: FormResponse<F>,
    pub similar_posts: Vec<PostResponse>,
}

/// GET/POST /blog/{post_id}/share/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse<F> {
    pub post: PostResponse,
    pub form: FormResponse<F>,
    pub sent: bool,
}

/// POST /blog/{post_id}/comment/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSubmitResponse<F> {
    pub post: PostResponse,
    pub form: FormResponse<F>,
    pub comment: Option<CommentResponse>,
}

/// One search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHitResponse {
    pub post: PostResponse,
    pub similarity: f64,
}

/// GET /blog/search/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse<F> {
    pub form: FormResponse<F>,
    pub query: Option<String>,
    pub results: Vec<SearchHitResponse>,
}
