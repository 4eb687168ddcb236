//! HTTP handlers and route configuration.

mod blog;
mod context;
mod health;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/health", web::get().to(health::health_check)))
        .service(
            web::scope("/blog")
                .route("/", web::get().to(blog::post_list))
                .route("/search/", web::get().to(blog::post_search))
                .route("/tag/{tag_slug}/", web::get().to(blog::post_list_by_tag))
                .service(
                    web::resource("/{post_id}/share/")
                        .route(web::get().to(blog::post_share_form))
                        .route(web::post().to(blog::post_share))
                        .default_service(method_not_allowed("GET, POST")),
                )
                .service(
                    web::resource("/{post_id}/comment/")
                        .route(web::post().to(blog::post_comment))
                        .default_service(method_not_allowed("POST")),
                )
                .route(
                    "/{year}/{month}/{day}/{slug}/",
                    web::get().to(blog::post_detail),
                ),
        );
}

/// Fallback for a resource hit with a method it does not accept.
fn method_not_allowed(allowed: &'static str) -> actix_web::Route {
    web::to(move || async move { Err::<HttpResponse, _>(AppError::MethodNotAllowed(allowed)) })
}
