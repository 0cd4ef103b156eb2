//! Handlers for `/auth/register` and `/users`.
//!
//! Registration records the user only. There is no login or session.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use medsetu_core::{
  accounts,
  repo::Repository,
  user::{NewUser, Role, User},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:  String,
  pub phone: String,
  #[serde(default)]
  pub role:  Role,
}

/// `POST /auth/register`: returns 201; 409 if the phone is taken.
pub async fn register<R: Repository>(
  State(state): State<ApiState<R>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
  let phone = body.phone.trim();
  if phone.is_empty() {
    return Err(ApiError::BadRequest("phone must not be empty".into()));
  }
  let user = accounts::register_user(state.repo.as_ref(), NewUser {
    name:     body.name,
    phone:    phone.to_owned(),
    role:     body.role,
    store_id: None,
  })
  .await?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/:id`
pub async fn get_one<R: Repository>(
  State(state): State<ApiState<R>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
  Ok(Json(accounts::get_user(state.repo.as_ref(), id).await?))
}
