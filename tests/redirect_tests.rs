//! Redirect tests
//!
//! The hot path: slug → 307 redirect, plus the root landing logic.

#[macro_use]
mod common;

use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};

use common::{failing_state, session_cookie, state_with_account, test_state};

#[actix_rt::test]
async fn test_redirect_existing_link() {
    let state = test_state();
    state
        .links
        .create_link("ghub", "github.com/nyooom")
        .await
        .unwrap();
    let app = init_app!(state);

    let req = TestRequest::get().uri("/ghub").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "https://github.com/nyooom"
    );
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
}

#[actix_rt::test]
async fn test_redirect_counts_clicks() {
    let state = test_state();
    state
        .links
        .create_link("count", "https://example.com")
        .await
        .unwrap();
    let app = init_app!(state);

    for _ in 0..3 {
        let req = TestRequest::get().uri("/count").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    let link = state.db.get_link("count").await.unwrap().unwrap();
    assert_eq!(link.clicks, 3);
}

#[actix_rt::test]
async fn test_head_request_redirects() {
    let state = test_state();
    state
        .links
        .create_link("head", "https://example.com/head")
        .await
        .unwrap();
    let app = init_app!(state);

    let req = TestRequest::default()
        .method(actix_web::http::Method::HEAD)
        .uri("/head")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[actix_rt::test]
async fn test_unknown_slug_is_not_found() {
    let state = test_state();
    let app = init_app!(state);

    let resp = test::call_service(&app, TestRequest::get().uri("/missing").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // too short to ever be a slug
    let resp = test::call_service(&app, TestRequest::get().uri("/ab").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_store_failure_is_server_error() {
    let state = failing_state();
    let app = init_app!(state);

    let resp = test::call_service(&app, TestRequest::get().uri("/whatever").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_rt::test]
async fn test_root_without_account_goes_to_create_account() {
    let state = test_state();
    let app = init_app!(state);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/create-account"
    );
}

#[actix_rt::test]
async fn test_root_with_account() {
    let state = state_with_account().await;
    let app = init_app!(state);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");

    let req = TestRequest::get()
        .uri("/")
        .cookie(session_cookie(&state))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/dashboard");
}
