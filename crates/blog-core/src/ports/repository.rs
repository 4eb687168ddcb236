use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Comment, Post, SearchResult, Tag};
use crate::error::RepoError;

/// Generic repository trait for entities this layer creates.
#[async_trait]
pub trait BaseRepository<T>: Send + Sync {
    /// Insert a new entity and return it as stored.
    async fn create(&self, entity: T) -> Result<T, RepoError>;
}

/// Criteria for the reader-facing post listing.
///
/// Only posts with status `Published` and `publish <= now` match.
#[derive(Debug, Clone, Copy)]
pub struct PublishedFilter {
    pub now: DateTime<Utc>,
    pub tag_id: Option<Uuid>,
}

impl PublishedFilter {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now, tag_id: None }
    }

    pub fn with_tag(mut self, tag_id: Uuid) -> Self {
        self.tag_id = Some(tag_id);
        self
    }
}

/// Post repository. Every query sees published posts only, and every
/// returned post carries its tags.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Count posts matching `filter`.
    async fn count_published(&self, filter: &PublishedFilter) -> Result<u64, RepoError>;

    /// A window of posts matching `filter`, newest publish first.
    async fn find_published(
        &self,
        filter: &PublishedFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    async fn find_published_by_id(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError>;

    /// All posts whose UTC publish date is `date` and slug is `slug`.
    /// Callers treat anything other than exactly one match as absent.
    async fn find_published_by_date_slug(
        &self,
        date: NaiveDate,
        slug: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Post>, RepoError>;

    /// Posts sharing at least one tag with `post` (excluding it), ordered by
    /// shared tag count descending, then publish descending.
    async fn find_similar_published(
        &self,
        post: &Post,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Posts whose title + body trigram similarity to `query` is at least
    /// `min_similarity`, ordered by similarity descending, then publish
    /// descending.
    async fn search_published(
        &self,
        query: &str,
        now: DateTime<Utc>,
        min_similarity: f64,
    ) -> Result<Vec<SearchResult>, RepoError>;
}

/// Tag lookup.
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment> {
    /// Active comments on a post, oldest first.
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
