//! Handlers for prescriptions attached to orders.
//!
//! The uploaded file itself is stored elsewhere; only its location is
//! recorded here.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use medsetu_core::{prescription::Prescription, repo::Repository};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct AttachBody {
  pub file_url: String,
}

/// `POST /orders/:id/prescription`: returns 201; 409 if one is already
/// attached.
pub async fn attach<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(order_id): Path<Uuid>,
  Json(body): Json<AttachBody>,
) -> Result<impl IntoResponse, ApiError> {
  if body.file_url.trim().is_empty() {
    return Err(ApiError::BadRequest("file_url must not be empty".into()));
  }
  let prescription = state
    .orders
    .attach_prescription(order_id, body.file_url)
    .await?;
  Ok((StatusCode::CREATED, Json(prescription)))
}

/// `GET /orders/:id/prescription`
pub async fn for_order<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(order_id): Path<Uuid>,
) -> Result<Json<Prescription>, ApiError> {
  Ok(Json(state.orders.prescription_for_order(order_id).await?))
}

/// `POST /prescriptions/:id/verify`
pub async fn verify<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Prescription>, ApiError> {
  Ok(Json(state.orders.verify_prescription(id).await?))
}
