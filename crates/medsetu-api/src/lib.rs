//! JSON REST API for MedSetu.
//!
//! Exposes an axum [`Router`] backed by any [`medsetu_core::repo::Repository`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", medsetu_api::api_router(state))
//! ```

pub mod error;
pub mod medicines;
pub mod orders;
pub mod prescriptions;
pub mod stores;
pub mod users;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use medsetu_core::{
  lifecycle::{OrderLifecycle, StatusPolicy},
  repo::Repository,
};
use serde_json::{Value, json};

pub use error::ApiError;

// ─── State ────────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<R> {
  pub repo:   Arc<R>,
  pub orders: OrderLifecycle<R>,
}

impl<R> Clone for ApiState<R> {
  fn clone(&self) -> Self {
    Self { repo: Arc::clone(&self.repo), orders: self.orders.clone() }
  }
}

impl<R: Repository> ApiState<R> {
  pub fn new(repo: Arc<R>, policy: StatusPolicy) -> Self {
    let orders = OrderLifecycle::new(Arc::clone(&repo), policy);
    Self { repo, orders }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R>(state: ApiState<R>) -> Router<()>
where
  R: Repository + 'static,
{
  Router::new()
    .route("/health", get(health))
    // Accounts
    .route("/auth/register", post(users::register::<R>))
    .route("/users/{id}", get(users::get_one::<R>))
    // Catalog
    .route("/medicines/search", get(medicines::search::<R>))
    .route("/store/medicines", post(medicines::create::<R>))
    // Orders
    .route("/orders", post(orders::create::<R>))
    .route("/orders/{id}", get(orders::get_one::<R>))
    .route(
      "/orders/{id}/prescription",
      get(prescriptions::for_order::<R>).post(prescriptions::attach::<R>),
    )
    .route("/prescriptions/{id}/verify", post(prescriptions::verify::<R>))
    .route("/store/orders", get(orders::for_store::<R>))
    .route("/store/orders/{id}/approve", post(orders::approve::<R>))
    .route("/store/orders/{id}/reject", post(orders::reject::<R>))
    .route("/store/orders/{id}/status", post(orders::set_status::<R>))
    // Store administration
    .route("/admin/stores", get(stores::list::<R>).post(stores::register::<R>))
    .route("/admin/stores/pending", get(stores::pending::<R>))
    .route(
      "/admin/stores/{id}",
      get(stores::get_one::<R>).delete(stores::delete::<R>),
    )
    .route("/admin/stores/{id}/approve", post(stores::approve::<R>))
    .route("/admin/stores/{id}/reject", post(stores::reject::<R>))
    .route("/admin/stores/{id}/suspend", post(stores::suspend::<R>))
    .with_state(state)
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use medsetu_sqlite::SqliteBackend;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn make_state(policy: StatusPolicy) -> ApiState<SqliteBackend> {
    let backend = SqliteBackend::open_in_memory().await.unwrap();
    ApiState::new(Arc::new(backend), policy)
  }

  async fn call(
    state:  &ApiState<SqliteBackend>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let resp   = api_router(state.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value  = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn register_customer(state: &ApiState<SqliteBackend>, phone: &str) -> String {
    let (status, user) = call(
      state,
      "POST",
      "/auth/register",
      Some(json!({ "name": "Meera", "phone": phone })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "CUSTOMER");
    user["user_id"].as_str().unwrap().to_string()
  }

  async fn approved_store(
    state:    &ApiState<SqliteBackend>,
    phone:    &str,
    pincode:  &str,
    priority: i32,
  ) -> String {
    let (status, store) = call(
      state,
      "POST",
      "/admin/stores",
      Some(json!({
        "name": format!("Store {phone}"),
        "license_number": "KA-BLR-1",
        "address": "Indiranagar",
        "pincode": pincode,
        "priority": priority,
        "phone": phone,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(store["status"], "PENDING");
    let id = store["store_id"].as_str().unwrap().to_string();

    let (status, store) =
      call(state, "POST", &format!("/admin/stores/{id}/approve"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store["status"], "APPROVED");
    id
  }

  // ── Health ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_returns_ok() {
    let state = make_state(StatusPolicy::Open).await;
    let (status, body) = call(&state, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
  }

  // ── Orders ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn order_flow_assigns_preferred_store_and_tracks_status() {
    let state    = make_state(StatusPolicy::Open).await;
    let customer = register_customer(&state, "9800000001").await;
    approved_store(&state, "9800000002", "560038", 2).await;
    let preferred = approved_store(&state, "9800000003", "560038", 1).await;

    let (status, order) = call(
      &state,
      "POST",
      "/orders",
      Some(json!({ "customer_id": customer, "pincode": "560038" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "CREATED");
    assert_eq!(order["store_id"], preferred.as_str());
    let order_id = order["order_id"].as_str().unwrap().to_string();

    let (status, order) = call(
      &state,
      "POST",
      &format!("/store/orders/{order_id}/approve"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "APPROVED");

    let (status, order) = call(
      &state,
      "POST",
      &format!("/store/orders/{order_id}/status"),
      Some(json!({ "status": "SHIPPED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "SHIPPED");

    let (_, order) = call(&state, "GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(order["status"], "SHIPPED");

    let (status, listed) = call(
      &state,
      "GET",
      &format!("/store/orders?store_id={preferred}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn order_in_unserved_pincode_is_unprocessable() {
    let state    = make_state(StatusPolicy::Open).await;
    let customer = register_customer(&state, "9800000011").await;

    let (status, body) = call(
      &state,
      "POST",
      "/orders",
      Some(json!({ "customer_id": customer, "pincode": "999999" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("999999"));
  }

  #[tokio::test]
  async fn order_for_unknown_customer_is_404() {
    let state = make_state(StatusPolicy::Open).await;
    approved_store(&state, "9800000021", "560001", 1).await;

    let (status, _) = call(
      &state,
      "POST",
      "/orders",
      Some(json!({ "customer_id": Uuid::new_v4(), "pincode": "560001" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn transitions_on_unknown_order_are_404() {
    let state = make_state(StatusPolicy::Open).await;
    let id    = Uuid::new_v4();

    for path in ["approve", "reject"] {
      let (status, _) =
        call(&state, "POST", &format!("/store/orders/{id}/{path}"), None).await;
      assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
    }
    let (status, _) = call(
      &state,
      "POST",
      &format!("/store/orders/{id}/status"),
      Some(json!({ "status": "PACKING" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn closed_policy_rejects_unknown_status_with_400() {
    let state    = make_state(StatusPolicy::Closed).await;
    let customer = register_customer(&state, "9800000031").await;
    approved_store(&state, "9800000032", "560002", 1).await;

    let (_, order) = call(
      &state,
      "POST",
      "/orders",
      Some(json!({ "customer_id": customer, "pincode": "560002" })),
    )
    .await;
    let order_id = order["order_id"].as_str().unwrap().to_string();

    let (status, _) = call(
      &state,
      "POST",
      &format!("/store/orders/{order_id}/status"),
      Some(json!({ "status": "SHIPPED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn store_orders_for_unknown_store_is_empty() {
    let state = make_state(StatusPolicy::Open).await;
    let (status, listed) = call(
      &state,
      "GET",
      &format!("/store/orders?store_id={}", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
  }

  // ── Accounts ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn duplicate_phone_is_conflict() {
    let state = make_state(StatusPolicy::Open).await;
    register_customer(&state, "9800000041").await;

    let (status, _) = call(
      &state,
      "POST",
      "/auth/register",
      Some(json!({ "name": "Other", "phone": "9800000041" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  // ── Stores and catalog ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn pending_list_and_delete() {
    let state = make_state(StatusPolicy::Open).await;
    let (_, store) = call(
      &state,
      "POST",
      "/admin/stores",
      Some(json!({
        "name": "Wellness Forever",
        "license_number": "MH-PUN-7",
        "address": "FC Road",
        "pincode": "411004",
        "priority": 0,
        "phone": "9800000051",
      })),
    )
    .await;
    let id = store["store_id"].as_str().unwrap().to_string();

    let (_, pending) = call(&state, "GET", "/admin/stores/pending", None).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (_, approved) = call(&state, "GET", "/admin/stores?status=APPROVED", None).await;
    assert_eq!(approved, json!([]));

    let (status, _) = call(&state, "DELETE", &format!("/admin/stores/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&state, "GET", &format!("/admin/stores/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn medicine_search_matches_any_case() {
    let state = make_state(StatusPolicy::Open).await;
    let store = approved_store(&state, "9800000061", "560003", 1).await;

    let (status, _) = call(
      &state,
      "POST",
      "/store/medicines",
      Some(json!({
        "store_id": store,
        "name": "Azithromycin 500",
        "price": 118.5,
        "requires_prescription": true,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, hits) = call(&state, "GET", "/medicines/search?query=AZITHRO", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits[0]["name"], "Azithromycin 500");
    assert_eq!(hits[0]["requires_prescription"], true);
  }

  #[tokio::test]
  async fn prescription_attach_twice_is_conflict() {
    let state    = make_state(StatusPolicy::Open).await;
    let customer = register_customer(&state, "9800000071").await;
    approved_store(&state, "9800000072", "560004", 1).await;
    let (_, order) = call(
      &state,
      "POST",
      "/orders",
      Some(json!({ "customer_id": customer, "pincode": "560004" })),
    )
    .await;
    let order_id = order["order_id"].as_str().unwrap().to_string();
    let uri      = format!("/orders/{order_id}/prescription");

    let (status, rx) =
      call(&state, "POST", &uri, Some(json!({ "file_url": "uploads/a.jpg" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rx["verified"], false);

    let (status, _) =
      call(&state, "POST", &uri, Some(json!({ "file_url": "uploads/b.jpg" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let rx_id = rx["prescription_id"].as_str().unwrap();
    let (status, rx) =
      call(&state, "POST", &format!("/prescriptions/{rx_id}/verify"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rx["verified"], true);
  }
}
