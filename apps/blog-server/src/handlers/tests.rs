use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use blog_core::BlogSettings;
use blog_core::domain::{Post, Tag};
use blog_infra::{InMemoryBlogStore, InMemoryMailer};

use super::configure_routes;
use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::state::{AppState, Storage};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

struct Setup {
    state: AppState,
    store: Arc<InMemoryBlogStore>,
    mailer: Arc<InMemoryMailer>,
    hello: Post,
    draft: Post,
}

async fn setup() -> Setup {
    let python = Tag::new("Python", "python");
    let web = Tag::new("Web", "web");
    let rust = Tag::new("Rust", "rust");
    let author = Uuid::new_v4();

    let hello = Post::new(author, "Django", "hello", "Getting started.", at(2024, 3, 1))
        .published()
        .with_tags(vec![python.clone(), web.clone()]);
    let rust_async = Post::new(
        author,
        "Rust async",
        "rust-async",
        "Futures and executors.",
        at(2024, 3, 5),
    )
    .published()
    .with_tags(vec![rust.clone(), web.clone()]);
    let python_tips = Post::new(
        author,
        "Python tips",
        "python-tips",
        "Comprehensions.",
        at(2024, 3, 10),
    )
    .published()
    .with_tags(vec![python.clone(), web.clone()]);
    let flask = Post::new(author, "Flask", "flask", "Micro framework.", at(2024, 2, 1))
        .published()
        .with_tags(vec![python.clone()]);
    let draft = Post::new(author, "Django drafts", "draft", "Not ready.", at(2024, 3, 2))
        .with_tags(vec![python.clone()]);

    let store = Arc::new(InMemoryBlogStore::new());
    for post in [&hello, &rust_async, &python_tips, &flask, &draft] {
        store.insert_post(post.clone()).await.unwrap();
    }

    let mailer = Arc::new(InMemoryMailer::new());
    let state = AppState::with_storage(
        Storage::Memory(store.clone()),
        mailer.clone(),
        BlogSettings::default(),
    );

    Setup {
        state,
        store,
        mailer,
        hello,
        draft,
    }
}

fn slugs(posts: &Value) -> Vec<&str> {
    posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect()
}

#[actix_web::test]
async fn test_list_first_page() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/blog/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        slugs(&body["posts"]),
        vec!["python-tips", "rust-async", "hello"]
    );
    assert_eq!(body["pagination"]["number"], 1);
    assert_eq!(body["pagination"]["num_pages"], 2);
    assert_eq!(body["pagination"]["has_next"], true);
    assert!(body["tag"].is_null());
}

#[actix_web::test]
async fn test_list_page_parameter_never_fails() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    for (page, expected) in [("2", 2), ("abc", 1), ("99", 2), ("0", 2)] {
        let req = test::TestRequest::get()
            .uri(&format!("/blog/?page={}", page))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["pagination"]["number"], expected, "page={}", page);
    }
}

#[actix_web::test]
async fn test_list_by_tag() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/blog/tag/rust/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(slugs(&body["posts"]), vec!["rust-async"]);
    assert_eq!(body["tag"]["slug"], "rust");
}

#[actix_web::test]
async fn test_list_unknown_tag_is_404() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/blog/tag/nope/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["title"], "Not Found");
}

#[actix_web::test]
async fn test_detail_with_similar_posts() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/blog/2024/3/1/hello/")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post"]["id"], setup.hello.id.to_string());
    assert_eq!(body["post"]["url"], "/blog/2024/3/1/hello/");
    assert_eq!(
        slugs(&body["similar_posts"]),
        vec!["python-tips", "rust-async", "flask"]
    );
    assert_eq!(body["comments"].as_array().unwrap().len(), 0);
    assert_eq!(body["form"]["data"]["name"], "");
}

#[actix_web::test]
async fn test_detail_not_found() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    for uri in [
        "/blog/2024/3/2/hello/",
        "/blog/2024/13/1/hello/",
        "/blog/2024/3/2/draft/",
        "/blog/year/3/1/hello/",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn test_share_form_get() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/blog/{}/share/", setup.hello.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["sent"], false);
    assert!(body["form"]["errors"].as_object().unwrap().is_empty());
}

#[actix_web::test]
async fn test_share_sends_mail() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/share/", setup.hello.id))
        .set_form([
            ("name", "Ann"),
            ("email", "ann@example.com"),
            ("to", "bob@example.com"),
            ("comments", "Worth a look"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sent"], true);

    let sent = setup.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["bob@example.com".to_string()]);
    assert_eq!(sent[0].subject, "Ann recommends you read Django");
    assert!(sent[0].body.contains("/blog/2024/3/1/hello/"));
    assert!(sent[0].body.contains("Worth a look"));
}

#[actix_web::test]
async fn test_share_link_uses_configured_site_url() {
    let setup = setup().await;
    let state = setup
        .state
        .with_site_url(Some("https://blog.example.com".to_string()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/share/", setup.hello.id))
        .insert_header(("x-forwarded-host", "evil.example"))
        .set_form([
            ("name", "Ann"),
            ("email", "ann@example.com"),
            ("to", "bob@example.com"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let sent = setup.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert!(
        sent[0]
            .body
            .contains("https://blog.example.com/blog/2024/3/1/hello/")
    );
    assert!(!sent[0].body.contains("evil.example"));
}

#[actix_web::test]
async fn test_share_invalid_form_sends_nothing() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/share/", setup.hello.id))
        .set_form([("name", "Ann"), ("email", "ann@example.com"), ("to", "bob")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sent"], false);
    assert!(body["form"]["errors"]["to"].is_array());
    assert!(setup.mailer.sent().await.is_empty());
}

#[actix_web::test]
async fn test_share_unpublished_post_is_404() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    for id in [setup.draft.id, Uuid::new_v4()] {
        let req = test::TestRequest::get()
            .uri(&format!("/blog/{}/share/", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn test_comment_requires_post() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/blog/{}/comment/", setup.hello.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "POST");
}

#[actix_web::test]
async fn test_comment_created() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/comment/", setup.hello.id))
        .set_form([
            ("name", "Bob"),
            ("email", "bob@example.com"),
            ("body", "Nice post"),
        ])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["comment"]["name"], "Bob");
    assert!(body["comment"].get("email").is_none());

    let stored = setup.store.all_comments().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].post_id, setup.hello.id);
    assert!(stored[0].active);

    let req = test::TestRequest::get()
        .uri("/blog/2024/3/1/hello/")
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["comments"][0]["body"], "Nice post");
}

#[actix_web::test]
async fn test_comment_with_missing_name_is_rejected() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/comment/", setup.hello.id))
        .set_form([("email", "bob@example.com"), ("body", "Nice post")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["comment"].is_null());
    assert!(body["form"]["errors"]["name"].is_array());
    assert!(setup.store.all_comments().await.is_empty());
}

#[actix_web::test]
async fn test_search_tolerates_typos() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/blog/search/?query=djano")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["query"], "djano");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["post"]["slug"], "hello");
    assert!(results[0]["similarity"].as_f64().unwrap() > 0.4);
}

#[actix_web::test]
async fn test_search_without_valid_query() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/blog/search/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["query"].is_null());
    assert!(body["results"].as_array().unwrap().is_empty());
    assert!(body["form"]["errors"].as_object().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/blog/search/?query=")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["query"].is_null());
    assert!(body["form"]["errors"]["query"].is_array());
}

#[actix_web::test]
async fn test_request_id_header() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header((REQUEST_ID_HEADER, "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
}

#[actix_web::test]
async fn test_error_body_carries_request_id() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/blog/tag/nope/")
        .insert_header((REQUEST_ID_HEADER, "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["request_id"], "abc-123");
    assert_eq!(body["status"], 404);

    let req = test::TestRequest::get()
        .uri(&format!("/blog/{}/comment/", setup.hello.id))
        .insert_header((REQUEST_ID_HEADER, "abc-456"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "POST");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["request_id"], "abc-456");
}

#[actix_web::test]
async fn test_health_reports_memory_storage() {
    let setup = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(setup.state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["database_ok"], true);
}
