//! Blog reader handlers.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use blog_core::forms::{CommentForm, EmailPostForm, SearchForm};
use blog_core::service::PostList;
use blog_shared::dto::{
    CommentSubmitResponse, PostDetailResponse, PostListResponse, SearchResponse, ShareResponse,
};

use super::context::{
    comment_response, form_response, pagination_response, post_response, search_hit_response,
    tag_response,
};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// `?page=` is kept raw so any value resolves to some page.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// GET /blog/
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let list = state
        .blog
        .list_posts(None, query.page.as_deref(), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(list_response(list)))
}

/// GET /blog/tag/{tag_slug}/
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let tag_slug = path.into_inner();
    let list = state
        .blog
        .list_posts(Some(&tag_slug), query.page.as_deref(), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(list_response(list)))
}

fn list_response(list: PostList) -> PostListResponse {
    PostListResponse {
        posts: list.page.items.iter().map(post_response).collect(),
        pagination: pagination_response(&list.page),
        tag: list.tag.as_ref().map(tag_response),
    }
}

/// GET /blog/{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let detail = state
        .blog
        .post_detail(year, month, day, &slug, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: post_response(&detail.post),
        comments: detail.comments.iter().map(comment_response).collect(),
        form: form_response(detail.form),
        similar_posts: detail.similar_posts.iter().map(post_response).collect(),
    }))
}

/// GET /blog/{post_id}/share/
pub async fn post_share_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    share(state, req, path.into_inner(), None).await
}

/// POST /blog/{post_id}/share/
pub async fn post_share(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    form: web::Form<EmailPostForm>,
) -> AppResult<HttpResponse> {
    share(state, req, path.into_inner(), Some(form.into_inner())).await
}

async fn share(
    state: web::Data<AppState>,
    req: HttpRequest,
    post_id: Uuid,
    submission: Option<EmailPostForm>,
) -> AppResult<HttpResponse> {
    let site_url = site_url(&state, &req);
    let outcome = state
        .blog
        .share_post(post_id, submission, &site_url, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(ShareResponse {
        post: post_response(&outcome.post),
        form: form_response(outcome.form),
        sent: outcome.sent,
    }))
}

/// Origin for emailed links: the configured `SITE_URL`, else the scheme and
/// host the request claims to have been made to.
fn site_url(state: &AppState, req: &HttpRequest) -> String {
    if let Some(site_url) = &state.site_url {
        return site_url.clone();
    }
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

/// POST /blog/{post_id}/comment/
pub async fn post_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .post_comment(path.into_inner(), form.into_inner(), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(CommentSubmitResponse {
        post: post_response(&outcome.post),
        form: form_response(outcome.form),
        comment: outcome.comment.as_ref().map(comment_response),
    }))
}

/// GET /blog/search/?query=
pub async fn post_search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let submission = params
        .into_inner()
        .query
        .map(|query| SearchForm { query });
    let outcome = state.blog.search(submission, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(SearchResponse {
        form: form_response(outcome.form),
        query: outcome.query,
        results: outcome.results.iter().map(search_hit_response).collect(),
    }))
}
