//! Conversions from domain values to response bodies.

use blog_core::domain::{Comment, Post, SearchResult, Tag};
use blog_core::forms::BoundForm;
use blog_core::pagination::Page;
use blog_shared::dto::{
    CommentResponse, FormResponse, PaginationResponse, PostResponse, SearchHitResponse,
    TagResponse,
};

pub fn tag_response(tag: &Tag) -> TagResponse {
    TagResponse {
        name: tag.name.clone(),
        slug: tag.slug.clone(),
    }
}

pub fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title.clone(),
        slug: post.slug.clone(),
        body: post.body.clone(),
        author_id: post.author_id.to_string(),
        publish: post.publish.to_rfc3339(),
        url: post.absolute_path(),
        tags: post.tags.iter().map(tag_response).collect(),
    }
}

pub fn comment_response(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id.to_string(),
        name: comment.name.clone(),
        body: comment.body.clone(),
        created_at: comment.created_at.to_rfc3339(),
    }
}

pub fn search_hit_response(result: &SearchResult) -> SearchHitResponse {
    SearchHitResponse {
        post: post_response(&result.post),
        similarity: result.similarity,
    }
}

pub fn pagination_response<T>(page: &Page<T>) -> PaginationResponse {
    PaginationResponse {
        number: page.number,
        num_pages: page.num_pages,
        total: page.total,
        per_page: page.per_page,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
        next_page: page.next_page_number(),
        previous_page: page.previous_page_number(),
    }
}

pub fn form_response<F>(form: BoundForm<F>) -> FormResponse<F> {
    FormResponse {
        data: form.data,
        errors: form.errors,
    }
}
