//! In-memory blog store - used when no database is configured, and in tests.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Comment, Post, SearchResult, Tag};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CommentRepository, PostRepository, PublishedFilter, TagRepository,
};
use blog_core::similarity::similarity;

/// Posts, tags and comments held behind async RwLocks.
///
/// Query semantics match the PostgreSQL repositories, including trigram
/// scoring for search.
/// Note: Data is lost on process restart.
pub struct InMemoryBlogStore {
    posts: RwLock<Vec<Post>>,
    tags: RwLock<HashMap<String, Tag>>,
    comments: RwLock<Vec<Comment>>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
            tags: RwLock::new(HashMap::new()),
            comments: RwLock::new(Vec::new()),
        }
    }

    /// Add a post, registering any of its tags not yet known.
    ///
    /// Tag slugs are unique: a tag whose slug is already registered under a
    /// different id is rejected and nothing is stored.
    pub async fn insert_post(&self, post: Post) -> Result<(), RepoError> {
        let mut tags = self.tags.write().await;
        for tag in &post.tags {
            Self::check_slug(&tags, tag)?;
        }
        for tag in &post.tags {
            tags.entry(tag.slug.clone()).or_insert_with(|| tag.clone());
        }
        drop(tags);

        self.posts.write().await.push(post);
        Ok(())
    }

    pub async fn insert_tag(&self, tag: Tag) -> Result<(), RepoError> {
        let mut tags = self.tags.write().await;
        Self::check_slug(&tags, &tag)?;
        tags.insert(tag.slug.clone(), tag);
        Ok(())
    }

    fn check_slug(tags: &HashMap<String, Tag>, tag: &Tag) -> Result<(), RepoError> {
        match tags.get(&tag.slug) {
            Some(existing) if existing.id != tag.id => Err(RepoError::Constraint(format!(
                "tag slug '{}' already belongs to tag {}",
                tag.slug, existing.id
            ))),
            _ => Ok(()),
        }
    }

    /// All stored comments, including inactive ones.
    pub async fn all_comments(&self) -> Vec<Comment> {
        self.comments.read().await.clone()
    }

    /// Set a comment's moderation flag. Returns false if it does not exist.
    pub async fn set_comment_active(&self, id: Uuid, active: bool) -> bool {
        let mut comments = self.comments.write().await;
        match comments.iter_mut().find(|c| c.id == id) {
            Some(comment) => {
                comment.active = active;
                comment.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    fn matches(post: &Post, filter: &PublishedFilter) -> bool {
        post.is_visible_at(filter.now)
            && filter
                .tag_id
                .is_none_or(|tag_id| post.tags.iter().any(|t| t.id == tag_id))
    }
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn count_published(&self, filter: &PublishedFilter) -> Result<u64, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().filter(|p| Self::matches(p, filter)).count() as u64)
    }

    async fn find_published(
        &self,
        filter: &PublishedFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;

        let mut matching: Vec<&Post> = posts.iter().filter(|p| Self::matches(p, filter)).collect();
        matching.sort_by_key(|p| Reverse(p.publish));

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_published_by_id(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .find(|p| p.id == id && p.is_visible_at(now))
            .cloned())
    }

    async fn find_published_by_date_slug(
        &self,
        date: NaiveDate,
        slug: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .filter(|p| p.is_visible_at(now) && p.publish_date() == date && p.slug == slug)
            .cloned()
            .collect())
    }

    async fn find_similar_published(
        &self,
        post: &Post,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;

        let mut similar: Vec<(usize, &Post)> = posts
            .iter()
            .filter(|p| p.id != post.id && p.is_visible_at(now))
            .map(|p| (p.shared_tag_count(post), p))
            .filter(|(shared, _)| *shared > 0)
            .collect();
        similar.sort_by_key(|(shared, p)| (Reverse(*shared), Reverse(p.publish)));

        Ok(similar
            .into_iter()
            .take(limit as usize)
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn search_published(
        &self,
        query: &str,
        now: DateTime<Utc>,
        min_similarity: f64,
    ) -> Result<Vec<SearchResult>, RepoError> {
        let posts = self.posts.read().await;

        let mut results: Vec<SearchResult> = posts
            .iter()
            .filter(|p| p.is_visible_at(now))
            .map(|p| SearchResult {
                similarity: similarity(&p.title, query) + similarity(&p.body, query),
                post: p.clone(),
            })
            .filter(|r| r.similarity >= min_similarity)
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| b.post.publish.cmp(&a.post.publish))
        });

        Ok(results)
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        Ok(self.tags.read().await.get(slug).cloned())
    }
}

#[async_trait]
impl BaseRepository<Comment> for InMemoryBlogStore {
    async fn create(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut comments = self.comments.write().await;
        if comments.iter().any(|c| c.id == comment.id) {
            return Err(RepoError::Constraint(format!(
                "comment {} already exists",
                comment.id
            )));
        }
        comments.push(comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let comments = self.comments.read().await;

        let mut active: Vec<Comment> = comments
            .iter()
            .filter(|c| c.post_id == post_id && c.active)
            .cloned()
            .collect();
        active.sort_by_key(|c| c.created_at);

        Ok(active)
    }
}
