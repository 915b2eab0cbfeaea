//! Listing lifecycle, discover feed and dashboard over HTTP

mod common;

use actix_web::{http::header::CONTENT_TYPE, http::StatusCode, test};
use chrono::{Duration, Utc};
use serde_json::Value;

use mt_api::create_app;

use common::{bearer, multipart_body, multipart_content_type, TestContext};

fn tomorrow() -> String {
    (Utc::now() + Duration::days(1)).format("%Y-%m-%d").to_string()
}

fn listing_fields(expiry: &str, quantity: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", "Paracetamol 500mg".to_string()),
        ("description", "Unopened box".to_string()),
        ("expiryDate", expiry.to_string()),
        ("quantity", quantity.to_string()),
        ("city", "Pune".to_string()),
    ]
}

fn add_request(token: &str, fields: &[(&'static str, String)], image: Option<(&str, &[u8])>) -> test::TestRequest {
    let borrowed: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    test::TestRequest::post()
        .uri("/api/medicines/add")
        .insert_header(bearer(token))
        .insert_header((CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&borrowed, image))
}

#[actix_web::test]
async fn test_publish_discover_donate_flow() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.sessions.clone(), &ctx.settings())).await;
    let (_, token) = ctx.donor("Ravi", "ravi@example.com").await;

    let resp = test::call_service(&app, add_request(&token, &listing_fields(&tomorrow(), "10"), None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["msg"], "Medicine added");
    assert_eq!(body["medicine"]["status"], "private");
    assert_eq!(body["medicine"]["quantity"], 10);
    let id = body["medicine"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get().uri("/api/medicines/discover").to_request();
    let feed: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(feed.as_array().unwrap().len(), 0);

    let req = test::TestRequest::put()
        .uri(&format!("/api/medicines/available/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["medicine"]["status"], "available");

    let req = test::TestRequest::get().uri("/api/medicines/discover").to_request();
    let feed: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["id"], id.as_str());
    assert_eq!(feed[0]["donor"]["name"], "Ravi");
    assert_eq!(feed[0]["donor"]["phone"], "9876543210");

    let req = test::TestRequest::put()
        .uri(&format!("/api/medicines/donated/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/medicines/available/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_STATUS_TRANSITION");

    let req = test::TestRequest::get().uri("/api/medicines/discover").to_request();
    let feed: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(feed.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_mine_and_dashboard() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.sessions.clone(), &ctx.settings())).await;
    let (_, token) = ctx.donor("Ravi", "ravi@example.com").await;
    let (_, other) = ctx.donor("Meera", "meera@example.com").await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let resp = test::call_service(&app, add_request(&token, &listing_fields(&tomorrow(), "1"), None).to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        ids.push(body["medicine"]["id"].as_str().unwrap().to_string());
    }
    test::call_service(&app, add_request(&other, &listing_fields(&tomorrow(), "1"), None).to_request()).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/medicines/available/{}", ids[0]))
        .insert_header(bearer(&token))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/medicines/mine")
        .insert_header(bearer(&token))
        .to_request();
    let mine: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(mine.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/medicines/dashboard")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stats: Value = test::read_body_json(resp).await;
    assert_eq!(stats["myMedicines"], 2);
    assert_eq!(stats["availableMedicines"], 1);
}

#[actix_web::test]
async fn test_other_donor_cannot_touch_listing() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.sessions.clone(), &ctx.settings())).await;
    let (_, owner) = ctx.donor("Ravi", "ravi@example.com").await;
    let (_, intruder) = ctx.donor("Meera", "meera@example.com").await;

    let resp = test::call_service(&app, add_request(&owner, &listing_fields(&tomorrow(), "3"), None).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let id = body["medicine"]["id"].as_str().unwrap().to_string();

    for req in [
        test::TestRequest::put().uri(&format!("/api/medicines/available/{}", id)),
        test::TestRequest::put().uri(&format!("/api/medicines/donated/{}", id)),
        test::TestRequest::delete().uri(&format!("/api/medicines/delete/{}", id)),
    ] {
        let resp = test::call_service(&app, req.insert_header(bearer(&intruder)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    let req = test::TestRequest::get()
        .uri("/api/medicines/mine")
        .insert_header(bearer(&owner))
        .to_request();
    let mine: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(mine[0]["status"], "private");
}

#[actix_web::test]
async fn test_update_and_delete() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.sessions.clone(), &ctx.settings())).await;
    let (_, token) = ctx.donor("Ravi", "ravi@example.com").await;

    let resp = test::call_service(&app, add_request(&token, &listing_fields(&tomorrow(), "3"), None).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let id = body["medicine"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/medicines/update/{}", id))
        .insert_header(bearer(&token))
        .insert_header((CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[("quantity", "7"), ("city", "")], None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["msg"], "Medicine updated");
    assert_eq!(body["medicine"]["quantity"], 7);
    assert_eq!(body["medicine"]["city"], "Pune");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/medicines/delete/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["msg"], "Medicine deleted");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/medicines/delete/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_invalid_input_is_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.sessions.clone(), &ctx.settings())).await;
    let (_, token) = ctx.donor("Ravi", "ravi@example.com").await;

    let resp = test::call_service(&app, add_request(&token, &listing_fields(&tomorrow(), "0"), None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, add_request(&token, &listing_fields("next week", "2"), None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mut missing_city = listing_fields(&tomorrow(), "2");
    missing_city.pop();
    let resp = test::call_service(&app, add_request(&token, &missing_city, None).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/medicines/available/not-a-uuid")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/medicines/mine")
        .insert_header(bearer(&token))
        .to_request();
    let mine: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(mine.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_owner_routes_require_session() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.sessions.clone(), &ctx.settings())).await;

    let req = test::TestRequest::get().uri("/api/medicines/mine").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/api/medicines/dashboard").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/api/medicines/discover").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_image_is_uploaded_with_listing() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), ctx.sessions.clone(), &ctx.settings())).await;
    let (_, token) = ctx.donor("Ravi", "ravi@example.com").await;

    let png: &[u8] = &[0x89, b'P', b'N', b'G'];
    let resp = test::call_service(
        &app,
        add_request(&token, &listing_fields(&tomorrow(), "1"), Some(("box.png", png))).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let url = body["medicine"]["imageUrl"].as_str().unwrap();
    assert!(url.starts_with("mock://images/"));
    assert!(url.ends_with("/box.png"));
    assert_eq!(ctx.storage.get_upload_count(), 1);
}
