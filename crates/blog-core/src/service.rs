//! Reader-facing blog operations.
//!
//! [`BlogService`] composes the repository and mail ports into the five
//! operations the site exposes. Each call is independent: it reads or
//! inserts once and keeps no state between requests. The current time is
//! always passed in, so "published" is an explicit parameter rather than a
//! hidden default filter.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Comment, Post, SearchResult, Tag};
use crate::error::DomainError;
use crate::forms::{BoundForm, CommentForm, EmailPostForm, SearchForm};
use crate::pagination::{Page, Paginator};
use crate::ports::{
    CommentRepository, Mailer, OutgoingMail, PostRepository, PublishedFilter, TagRepository,
};

/// Tunables for the blog operations.
#[derive(Debug, Clone)]
pub struct BlogSettings {
    /// Posts per listing page.
    pub page_size: u64,
    /// Maximum number of similar posts on a detail page.
    pub similar_posts_limit: u64,
    /// Minimum combined title + body similarity for a search hit.
    pub min_search_similarity: f64,
    /// Sender address for shared-post emails.
    pub mail_from: String,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            page_size: 3,
            similar_posts_limit: 4,
            min_search_similarity: 0.1,
            mail_from: "noreply@blog.local".to_string(),
        }
    }
}

/// One page of the post listing.
#[derive(Debug, Clone)]
pub struct PostList {
    pub page: Page<Post>,
    pub tag: Option<Tag>,
}

/// Everything the post detail page shows.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub form: BoundForm<CommentForm>,
    pub similar_posts: Vec<Post>,
}

/// Result of showing or submitting the share form.
#[derive(Debug, Clone)]
pub struct ShareOutcome {
    pub post: Post,
    pub form: BoundForm<EmailPostForm>,
    pub sent: bool,
}

/// Result of submitting a comment.
#[derive(Debug, Clone)]
pub struct CommentOutcome {
    pub post: Post,
    pub form: BoundForm<CommentForm>,
    pub comment: Option<Comment>,
}

/// Result of a search request.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub form: BoundForm<SearchForm>,
    /// The accepted query, set only when the form validated.
    pub query: Option<String>,
    pub results: Vec<SearchResult>,
}

/// The blog's request-level operations.
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
    mailer: Arc<dyn Mailer>,
    settings: BlogSettings,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
        mailer: Arc<dyn Mailer>,
        settings: BlogSettings,
    ) -> Self {
        Self {
            posts,
            tags,
            comments,
            mailer,
            settings,
        }
    }

    /// List published posts, optionally restricted to a tag.
    ///
    /// `page` is the raw page parameter; it never causes an error.
    pub async fn list_posts(
        &self,
        tag_slug: Option<&str>,
        page: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<PostList, DomainError> {
        let mut filter = PublishedFilter::at(now);

        let tag = match tag_slug {
            Some(slug) => {
                let tag = self
                    .tags
                    .find_by_slug(slug)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Tag", slug))?;
                filter = filter.with_tag(tag.id);
                Some(tag)
            }
            None => None,
        };

        let total = self.posts.count_published(&filter).await?;
        let paginator = Paginator::new(self.settings.page_size, total);
        let number = paginator.resolve(page);

        let items = self
            .posts
            .find_published(&filter, paginator.offset(number), paginator.per_page())
            .await?;

        tracing::debug!(
            tag = tag_slug.unwrap_or("-"),
            page = number,
            total,
            "Listed posts"
        );

        Ok(PostList {
            page: paginator.page(number, items),
            tag,
        })
    }

    /// The published post at `year/month/day/slug` with its active comments
    /// and similar posts.
    pub async fn post_detail(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
        now: DateTime<Utc>,
    ) -> Result<PostDetail, DomainError> {
        let key = format!("{}/{}/{}/{}", year, month, day, slug);
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DomainError::not_found("Post", &key))?;

        let mut matches = self
            .posts
            .find_published_by_date_slug(date, slug, now)
            .await?;
        if matches.len() != 1 {
            if matches.len() > 1 {
                tracing::warn!(post = %key, count = matches.len(), "Ambiguous post lookup");
            }
            return Err(DomainError::not_found("Post", key));
        }
        let post = matches.remove(0);

        let comments = self.comments.find_active_by_post(post.id).await?;
        let similar_posts = self
            .posts
            .find_similar_published(&post, now, self.settings.similar_posts_limit)
            .await?;

        Ok(PostDetail {
            post,
            comments,
            form: BoundForm::unbound(),
            similar_posts,
        })
    }

    /// Show the share form (`submission == None`) or send the post by email.
    ///
    /// `site_url` is the scheme and host the post URL is built on. A mail
    /// transport failure is returned as an error; nothing is retried.
    pub async fn share_post(
        &self,
        post_id: Uuid,
        submission: Option<EmailPostForm>,
        site_url: &str,
        now: DateTime<Utc>,
    ) -> Result<ShareOutcome, DomainError> {
        let post = self.published_post(post_id, now).await?;

        let Some(submission) = submission else {
            return Ok(ShareOutcome {
                post,
                form: BoundForm::unbound(),
                sent: false,
            });
        };

        let form = BoundForm::bind(submission);
        if !form.is_valid() {
            return Ok(ShareOutcome {
                post,
                form,
                sent: false,
            });
        }

        let post_url = format!("{}{}", site_url.trim_end_matches('/'), post.absolute_path());
        let mail = self.share_mail(&post, &form.data, &post_url);
        let recipients = mail.masked_recipients();

        self.mailer.send(mail).await?;
        tracing::info!(post_id = %post.id, to = %recipients, "Post shared by email");

        Ok(ShareOutcome {
            post,
            form,
            sent: true,
        })
    }

    fn share_mail(&self, post: &Post, form: &EmailPostForm, post_url: &str) -> OutgoingMail {
        OutgoingMail {
            from: self.settings.mail_from.clone(),
            to: vec![form.to.clone()],
            subject: format!("{} recommends you read {}", form.name, post.title),
            body: format!(
                "Read {} at {}\n\n{}'s comments: {}",
                post.title, post_url, form.name, form.comments
            ),
        }
    }

    /// Validate a comment submission and store it on success.
    pub async fn post_comment(
        &self,
        post_id: Uuid,
        submission: CommentForm,
        now: DateTime<Utc>,
    ) -> Result<CommentOutcome, DomainError> {
        let post = self.published_post(post_id, now).await?;

        let form = BoundForm::bind(submission);
        if !form.is_valid() {
            tracing::debug!(post_id = %post.id, errors = form.errors.len(), "Comment rejected");
            return Ok(CommentOutcome {
                post,
                form,
                comment: None,
            });
        }

        let comment = Comment::new(
            post.id,
            form.data.name.clone(),
            form.data.email.clone(),
            form.data.body.clone(),
        );
        let comment = self.comments.create(comment).await?;
        tracing::info!(post_id = %post.id, comment_id = %comment.id, "Comment created");

        Ok(CommentOutcome {
            post,
            form,
            comment: Some(comment),
        })
    }

    /// Trigram search over published posts.
    ///
    /// `submission == None` means no query parameter was sent at all.
    pub async fn search(
        &self,
        submission: Option<SearchForm>,
        now: DateTime<Utc>,
    ) -> Result<SearchOutcome, DomainError> {
        let Some(submission) = submission else {
            return Ok(SearchOutcome {
                form: BoundForm::unbound(),
                query: None,
                results: Vec::new(),
            });
        };

        let form = BoundForm::bind(submission);
        if !form.is_valid() {
            return Ok(SearchOutcome {
                form,
                query: None,
                results: Vec::new(),
            });
        }

        let query = form.data.query.clone();
        let results = self
            .posts
            .search_published(&query, now, self.settings.min_search_similarity)
            .await?;
        tracing::debug!(query = %query, hits = results.len(), "Search executed");

        Ok(SearchOutcome {
            form,
            query: Some(query),
            results,
        })
    }

    async fn published_post(&self, id: Uuid, now: DateTime<Utc>) -> Result<Post, DomainError> {
        self.posts
            .find_published_by_id(id, now)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }
}
