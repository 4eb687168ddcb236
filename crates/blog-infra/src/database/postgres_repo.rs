//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::{Expr, Query, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, LoaderTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blog_core::domain::{Comment, Post, PostStatus, SearchResult, Tag};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, PublishedFilter, TagRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag;
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Status is published and the publish time has passed.
fn published_at(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(post::Column::Status.eq(PostStatus::Published.as_str()))
        .add(post::Column::Publish.lte(now))
}

/// `similarity(title, q) + similarity(body, q)` using `pg_trgm`.
fn trigram_score(query: &str) -> SimpleExpr {
    Expr::cust_with_values(
        r#"(similarity("posts"."title", ?) + similarity("posts"."body", ?))::float8"#,
        [query.to_string(), query.to_string()],
    )
}

impl PostgresPostRepository {
    fn published_select(filter: &PublishedFilter) -> Select<PostEntity> {
        let select = PostEntity::find().filter(published_at(filter.now));

        match filter.tag_id {
            Some(tag_id) => select.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(post_tag::Entity)
                        .and_where(post_tag::Column::TagId.eq(tag_id))
                        .to_owned(),
                ),
            ),
            None => select,
        }
    }

    /// Convert models to domain posts, loading every post's tags in one query.
    async fn with_tags(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        let tags = models
            .load_many_to_many(TagEntity, post_tag::Entity, &self.db)
            .await
            .map_err(query_error)?;

        Ok(models
            .into_iter()
            .zip(tags)
            .map(|(model, tags)| {
                let mut tags: Vec<Tag> = tags.into_iter().map(Into::into).collect();
                tags.sort_by(|a, b| a.name.cmp(&b.name));
                Post::from(model).with_tags(tags)
            })
            .collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count_published(&self, filter: &PublishedFilter) -> Result<u64, RepoError> {
        Self::published_select(filter)
            .count(&self.db)
            .await
            .map_err(query_error)
    }

    async fn find_published(
        &self,
        filter: &PublishedFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let models = Self::published_select(filter)
            .order_by_desc(post::Column::Publish)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.with_tags(models).await
    }

    async fn find_published_by_id(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .filter(published_at(now))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        match model {
            Some(model) => Ok(self.with_tags(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_published_by_date_slug(
        &self,
        date: NaiveDate,
        slug: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Post>, RepoError> {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);

        let models = PostEntity::find()
            .filter(published_at(now))
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(day_start))
            .filter(post::Column::Publish.lt(day_end))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.with_tags(models).await
    }

    async fn find_similar_published(
        &self,
        post: &Post,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tag_ids: Vec<Uuid> = post.tags.iter().map(|t| t.id).collect();
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let shared_tags = Expr::col((post_tag::Entity, post_tag::Column::TagId)).count();

        let models = PostEntity::find()
            .join(JoinType::InnerJoin, post::Relation::PostTag.def())
            .filter(published_at(now))
            .filter(post_tag::Column::TagId.is_in(tag_ids))
            .filter(post::Column::Id.ne(post.id))
            .group_by(post::Column::Id)
            .order_by_desc(shared_tags)
            .order_by_desc(post::Column::Publish)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.with_tags(models).await
    }

    async fn search_published(
        &self,
        query: &str,
        now: DateTime<Utc>,
        min_similarity: f64,
    ) -> Result<Vec<SearchResult>, RepoError> {
        let score = trigram_score(query);

        let scored: Vec<(Uuid, f64)> = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .column_as(score.clone(), "similarity")
            .filter(published_at(now))
            .filter(Expr::expr(score.clone()).gte(min_similarity))
            .order_by_desc(score)
            .order_by_desc(post::Column::Publish)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_error)?;

        if scored.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = scored.iter().map(|(id, _)| *id).collect();
        let models = PostEntity::find()
            .filter(post::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let mut by_id: HashMap<Uuid, Post> = self
            .with_tags(models)
            .await?
            .into_iter()
            .map(|post| (post.id, post))
            .collect();

        Ok(scored
            .into_iter()
            .filter_map(|(id, similarity)| {
                by_id
                    .remove(&id)
                    .map(|post| SearchResult { post, similarity })
            })
            .collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        tracing::debug!(tag = %slug, "Finding tag by slug");

        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
