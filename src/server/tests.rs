use super::routes;
use crate::{
    config::{Config, TogetherConfig},
    error::Result,
    handler::ImageHandler,
    models::{ImageRequest, TogetherImageData, TogetherImageResponse},
    together::{ContentFetcher, ImageGenerator},
};
use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

struct InlineGenerator;

#[async_trait]
impl ImageGenerator for InlineGenerator {
    async fn generate(
        &self,
        _api_key: &str,
        _request: &ImageRequest,
    ) -> Result<TogetherImageResponse> {
        Ok(TogetherImageResponse {
            data: vec![Some(TogetherImageData::inline("QUJD"))],
            ..Default::default()
        })
    }
}

struct UnreachableFetcher;

#[async_trait]
impl ContentFetcher for UnreachableFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        panic!("unexpected fetch of {}", url)
    }
}

fn static_dir() -> String {
    format!("{}/static", env!("CARGO_MANIFEST_DIR"))
}

fn test_config(api_key: Option<&str>) -> Config {
    let mut together = TogetherConfig::new();
    together.api_key = api_key.map(String::from);
    Config::new()
        .with_static_dir(static_dir())
        .with_together(together)
}

fn handler_for(config: &Config) -> web::Data<ImageHandler> {
    web::Data::new(ImageHandler::new(
        config.together.clone(),
        Arc::new(InlineGenerator),
        Arc::new(UnreachableFetcher),
    ))
}

macro_rules! app {
    ($config:expr) => {{
        let config: Config = $config;
        test::init_service(
            App::new()
                .app_data(handler_for(&config))
                .configure(|cfg| routes::configure(cfg, &config)),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_generate_image_success() {
    let app = app!(test_config(Some("secret")));

    let req = test::TestRequest::post()
        .uri("/generate-image")
        .set_json(json!({ "prompt": "a cat" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "image": "QUJD" }));
}

#[actix_web::test]
async fn test_empty_prompt_is_bad_request() {
    let app = app!(test_config(Some("secret")));

    let req = test::TestRequest::post()
        .uri("/generate-image")
        .set_json(json!({ "prompt": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Prompt is required" }));
}

#[actix_web::test]
async fn test_bad_steps_is_bad_request() {
    let app = app!(test_config(Some("secret")));

    let req = test::TestRequest::post()
        .uri("/generate-image")
        .set_json(json!({ "prompt": "x", "steps": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid parameter format");
    assert!(body["details"].as_str().unwrap().contains("steps"));
}

#[actix_web::test]
async fn test_non_json_bodies_rejected() {
    let app = app!(test_config(Some("secret")));

    let requests = [
        test::TestRequest::post()
            .uri("/generate-image")
            .insert_header(("content-type", "text/plain"))
            .set_payload(r#"{"prompt":"a cat"}"#)
            .to_request(),
        test::TestRequest::post()
            .uri("/generate-image")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
        test::TestRequest::post()
            .uri("/generate-image")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"["a cat"]"#)
            .to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Request must be JSON" }));
    }
}

#[actix_web::test]
async fn test_large_prompt_reaches_validation() {
    let app = app!(test_config(Some("secret")));

    let req = test::TestRequest::post()
        .uri("/generate-image")
        .set_json(json!({ "prompt": "x".repeat(300_000) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Prompt is too long" }));
}

#[actix_web::test]
async fn test_body_over_limit_is_json_error() {
    let app = app!(test_config(Some("secret")).with_max_body_bytes(1024));

    let req = test::TestRequest::post()
        .uri("/generate-image")
        .set_json(json!({ "prompt": "x".repeat(2048) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Prompt is too long" }));
}

#[actix_web::test]
async fn test_json_media_type_variants_accepted() {
    let app = app!(test_config(Some("secret")));

    for content_type in ["Application/JSON; charset=utf-8", "application/vnd.api+json"] {
        let req = test::TestRequest::post()
            .uri("/generate-image")
            .insert_header(("content-type", content_type))
            .set_payload(r#"{"prompt":"a cat"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK, "{}", content_type);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "image": "QUJD" }));
    }
}

#[actix_web::test]
async fn test_missing_api_key_is_server_error() {
    let app = app!(test_config(None));

    let req = test::TestRequest::post()
        .uri("/generate-image")
        .set_json(json!({ "prompt": "a cat" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "error": "Server configuration error: Missing API key" })
    );
}

#[actix_web::test]
async fn test_get_generate_image_not_allowed() {
    let app = app!(test_config(Some("secret")));

    let req = test::TestRequest::get().uri("/generate-image").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn test_landing_page_served() {
    let app = app!(test_config(Some("secret")));

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("/generate-image"));
}

#[actix_web::test]
async fn test_missing_landing_page_is_not_found() {
    let app = app!(test_config(Some("secret")).with_landing_page("missing.html"));

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_cors_preflight_for_allowed_origin() {
    let app = app!(test_config(Some("secret")).with_allowed_origins(["https://app.example"]));

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/generate-image")
        .insert_header(("origin", "https://app.example"))
        .insert_header(("access-control-request-method", "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://app.example")
    );
}

#[actix_web::test]
async fn test_cors_header_on_post() {
    let app = app!(test_config(Some("secret")));

    let req = test::TestRequest::post()
        .uri("/generate-image")
        .insert_header(("origin", "https://anywhere.example"))
        .set_json(json!({ "prompt": "a cat" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}
