//! QR code, health and static asset routes

#[macro_use]
mod common;

use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use serde_json::Value;

use common::{failing_state, test_state};
use nyooom::api::services::qrcode::render_qr_png;

#[actix_rt::test]
async fn test_qr_code_for_existing_link() {
    let state = test_state();
    state
        .links
        .create_link("qrme", "https://example.com")
        .await
        .unwrap();
    let app = init_app!(state);

    let resp = test::call_service(&app, TestRequest::get().uri("/qr/qrme").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"\x89PNG\r\n\x1a\n"));

    // 生成二维码不算点击
    let link = state.db.get_link("qrme").await.unwrap().unwrap();
    assert_eq!(link.clicks, 0);
}

#[actix_rt::test]
async fn test_qr_code_encodes_host_not_forwarded_host() {
    let state = test_state();
    state
        .links
        .create_link("qrfwd", "https://example.com")
        .await
        .unwrap();
    let app = init_app!(state);

    let req = TestRequest::get()
        .uri("/qr/qrfwd")
        .insert_header((header::HOST, "sho.rt"))
        .insert_header(("X-Forwarded-Host", "evil.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert_eq!(body, render_qr_png("http://sho.rt/qrfwd").unwrap());
    assert_ne!(body, render_qr_png("http://evil.example/qrfwd").unwrap());
}

#[actix_rt::test]
async fn test_qr_code_unknown_link() {
    let state = test_state();
    let app = init_app!(state);

    let resp = test::call_service(&app, TestRequest::get().uri("/qr/nope").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_health_check() {
    let state = test_state();
    let app = init_app!(state);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["store"]["backend"], "memory");
}

#[actix_rt::test]
async fn test_health_check_store_down() {
    let state = failing_state();
    let app = init_app!(state);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["store"]["status"], "unhealthy");
}

#[actix_rt::test]
async fn test_static_assets() {
    let state = test_state();
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/static/app.css").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css; charset=utf-8"
    );

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/static/login.html").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/static/missing.js").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_request_id_header() {
    use actix_web::App;
    use nyooom::api::configure_routes;
    use nyooom::api::middleware::RequestIdMiddleware;

    let state = test_state();
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .app_data(state.clone())
            .configure(|cfg| configure_routes(cfg, false)),
    )
    .await;

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    let generated = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(generated.len(), 36);

    let req = TestRequest::get()
        .uri("/health")
        .insert_header(("X-Request-ID", "upstream-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "upstream-123");

    // 非法的上游 ID 被替换
    let req = TestRequest::get()
        .uri("/health")
        .insert_header(("X-Request-ID", "bad id\twith spaces"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_ne!(resp.headers().get("x-request-id").unwrap(), "bad id\twith spaces");
}
