use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tag;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status '{}'", other)),
        }
    }
}

/// Post entity - a blog article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    /// Unique among posts published on the same (UTC) date.
    pub slug: String,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
}

impl Post {
    /// Create a new draft post scheduled for `publish`.
    pub fn new(
        author_id: Uuid,
        title: impl Into<String>,
        slug: impl Into<String>,
        body: impl Into<String>,
        publish: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: title.into(),
            slug: slug.into(),
            body: body.into(),
            publish,
            status: PostStatus::Draft,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        }
    }

    pub fn published(mut self) -> Self {
        self.status = PostStatus::Published;
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Whether readers may see this post at `now`.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Published && self.publish <= now
    }

    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Canonical path of the detail page, e.g. `/blog/2024/3/1/hello/`.
    pub fn absolute_path(&self) -> String {
        let date = self.publish_date();
        format!(
            "/blog/{}/{}/{}/{}/",
            date.year(),
            date.month(),
            date.day(),
            self.slug
        )
    }

    /// Number of tags this post shares with `other`.
    pub fn shared_tag_count(&self, other: &Post) -> usize {
        self.tags
            .iter()
            .filter(|tag| other.tags.iter().any(|t| t.id == tag.id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn post_at(publish: DateTime<Utc>) -> Post {
        Post::new(Uuid::new_v4(), "Hello", "hello", "Body", publish)
    }

    #[test]
    fn test_draft_is_never_visible() {
        let now = Utc::now();
        let post = post_at(now - Duration::days(1));
        assert!(!post.is_visible_at(now));
    }

    #[test]
    fn test_future_post_is_not_visible() {
        let now = Utc::now();
        let post = post_at(now + Duration::hours(1)).published();
        assert!(!post.is_visible_at(now));
        assert!(post.is_visible_at(now + Duration::hours(2)));
    }

    #[test]
    fn test_absolute_path_is_not_zero_padded() {
        let publish = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let post = post_at(publish);
        assert_eq!(post.absolute_path(), "/blog/2024/3/1/hello/");
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [PostStatus::Draft, PostStatus::Published] {
            assert_eq!(status.as_str().parse::<PostStatus>().unwrap(), status);
        }
        assert!("DF".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_shared_tag_count() {
        let rust = Tag::new("Rust", "rust");
        let web = Tag::new("Web", "web");
        let db = Tag::new("Databases", "databases");

        let a = post_at(Utc::now()).with_tags(vec![rust.clone(), web.clone()]);
        let b = post_at(Utc::now()).with_tags(vec![web, rust, db]);

        assert_eq!(a.shared_tag_count(&b), 2);
        assert_eq!(b.shared_tag_count(&a), 2);
    }
}
