// storefront/tests/http_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::*;
use serde_json::{json, Value};
use storefront::models::UserId;
use storefront::web::configure_app_routes;
use storefront::web::extractors::USER_ID_HEADER;
use uuid::Uuid;

macro_rules! init_app {
  ($fx:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($fx.state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

fn as_user(req: test::TestRequest, user: UserId) -> test::TestRequest {
  req.insert_header((USER_ID_HEADER, user.to_string()))
}

#[actix_web::test]
async fn test_health_check() {
  let fx = Fixture::new().await;
  let app = init_app!(fx);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_missing_or_malformed_identity_is_unauthorized() {
  let fx = Fixture::new().await;
  let app = init_app!(fx);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/cart").to_request()).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let req = test::TestRequest::get()
    .uri("/api/v1/cart")
    .insert_header((USER_ID_HEADER, "not-a-uuid"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_checkout_flow_over_http() {
  let fx = Fixture::new().await;
  let app = init_app!(fx);

  for (product_id, quantity) in [(fx.product_a.id, 2), (fx.product_b.id, 1)] {
    let req = as_user(test::TestRequest::post().uri("/api/v1/cart/items"), fx.alice)
      .set_json(json!({ "product_id": product_id, "quantity": quantity }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["cartItem"]["quantity"], quantity);
  }

  let req = as_user(test::TestRequest::get().uri("/api/v1/cart"), fx.alice).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["cart"]["items"].as_array().map(Vec::len), Some(2));

  let req = as_user(test::TestRequest::post().uri("/api/v1/orders"), fx.alice)
    .set_json(json!({ "address_id": fx.alice_address.id }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["order"]["status"], "pending");
  let order_id = body["order"]["id"].as_str().unwrap().to_string();

  let req = as_user(test::TestRequest::get().uri("/api/v1/orders"), fx.alice).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["orders"][0]["id"], order_id.as_str());

  let req = as_user(test::TestRequest::post().uri("/api/v1/payments/intents"), fx.alice)
    .set_json(json!({ "order_id": order_id }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["amount"], 10000);
  assert_eq!(body["currency"], "usd");
  assert!(body["clientSecret"].as_str().is_some_and(|s| !s.is_empty()));
}

#[actix_web::test]
async fn test_other_users_order_is_not_found() {
  let fx = Fixture::new().await;
  storefront::services::cart_service::add_item(&fx.state, fx.alice, fx.product_a.id, 1).await.unwrap();
  let order = storefront::services::order_service::place_order(&fx.state, fx.alice, fx.alice_address.id)
    .await
    .unwrap();
  let app = init_app!(fx);

  let req = as_user(test::TestRequest::get().uri(&format!("/api/v1/orders/{}", order.id)), fx.bob).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let req = as_user(test::TestRequest::get().uri(&format!("/api/v1/orders/{}", order.id)), fx.alice).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_error_statuses_and_bodies() {
  let fx = Fixture::new().await;
  let app = init_app!(fx);

  let req = as_user(test::TestRequest::post().uri("/api/v1/cart/items"), fx.alice)
    .set_json(json!({ "product_id": fx.last_unit_product.id, "quantity": 2 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["productId"], fx.last_unit_product.id.to_string());
  assert_eq!(body["available"], 1);

  let req = as_user(test::TestRequest::post().uri("/api/v1/cart/items"), fx.alice)
    .set_json(json!({ "product_id": fx.product_a.id, "quantity": 0 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let req = as_user(test::TestRequest::post().uri("/api/v1/orders"), fx.alice)
    .set_json(json!({ "address_id": fx.alice_address.id }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let req = as_user(test::TestRequest::delete().uri(&format!("/api/v1/cart/items/{}", Uuid::new_v4())), fx.alice)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let req = as_user(test::TestRequest::delete().uri("/api/v1/cart"), fx.alice).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn test_identity_is_checked_before_request_body_and_path() {
  let fx = Fixture::new().await;
  let app = init_app!(fx);

  let requests = vec![
    test::TestRequest::post()
      .uri("/api/v1/orders")
      .insert_header(("content-type", "application/json"))
      .set_payload("{bad")
      .to_request(),
    test::TestRequest::post().uri("/api/v1/cart/items").set_payload("quantity=1").to_request(),
    test::TestRequest::post()
      .uri("/api/v1/payments/intents")
      .set_json(json!({ "order_id": "not-a-uuid" }))
      .to_request(),
    test::TestRequest::put()
      .uri("/api/v1/cart/items/not-a-uuid")
      .set_json(json!({ "quantity": 1 }))
      .to_request(),
    test::TestRequest::get().uri("/api/v1/orders/not-a-uuid").to_request(),
  ];

  for req in requests {
    let path = req.path().to_string();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", path);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string(), "{}", path);
  }
}

#[actix_web::test]
async fn test_malformed_body_and_path_get_json_validation_errors() {
  let fx = Fixture::new().await;
  let app = init_app!(fx);

  let req = as_user(test::TestRequest::post().uri("/api/v1/orders"), fx.alice)
    .insert_header(("content-type", "application/json"))
    .set_payload("{bad")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Validation Error")));

  let req = as_user(test::TestRequest::post().uri("/api/v1/cart/items"), fx.alice)
    .set_payload("quantity=1")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].is_string());

  let req = as_user(test::TestRequest::get().uri("/api/v1/orders/not-a-uuid"), fx.alice).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Validation Error")));
}
