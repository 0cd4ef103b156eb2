//! Handlers for the medicine catalog.

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use medsetu_core::{
  catalog,
  medicine::{Medicine, NewMedicine},
  repo::Repository,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  #[serde(default)]
  pub query: String,
}

/// `GET /medicines/search?query=<text>`
pub async fn search<R: Repository>(
  State(state): State<ApiState<R>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Medicine>>, ApiError> {
  Ok(Json(
    catalog::search_medicines(state.repo.as_ref(), &params.query).await?,
  ))
}

/// `POST /store/medicines` with a [`NewMedicine`] body; returns 201.
pub async fn create<R: Repository>(
  State(state): State<ApiState<R>>,
  Json(body): Json<NewMedicine>,
) -> Result<impl IntoResponse, ApiError> {
  if !body.price.is_finite() || body.price < 0.0 {
    return Err(ApiError::BadRequest(format!("invalid price: {}", body.price)));
  }
  let medicine = catalog::add_medicine(state.repo.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(medicine)))
}
