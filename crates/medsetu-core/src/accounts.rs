//! User registration and lookup.

use crate::{
  Error, Result,
  repo::Repository,
  user::{NewUser, User},
};
use uuid::Uuid;

/// Register a user. Phone numbers are unique across all users.
pub async fn register_user<R: Repository>(repo: &R, input: NewUser) -> Result<User> {
  ensure_phone_free(repo, &input.phone).await?;
  // A concurrent registration can take the phone between check and insert.
  let phone = input.phone.clone();
  let user = repo
    .add_user(input)
    .await
    .map_err(|e| Error::backend_or(e, Error::PhoneTaken(phone)))?;
  tracing::info!(user_id = %user.user_id, role = %user.role, "user registered");
  Ok(user)
}

pub async fn get_user<R: Repository>(repo: &R, user_id: Uuid) -> Result<User> {
  repo
    .get_user(user_id)
    .await
    .map_err(Error::backend)?
    .ok_or(Error::CustomerNotFound(user_id))
}

pub(crate) async fn ensure_phone_free<R: Repository>(repo: &R, phone: &str) -> Result<()> {
  let taken = repo.find_user_by_phone(phone).await.map_err(Error::backend)?;
  match taken {
    Some(_) => Err(Error::PhoneTaken(phone.to_owned())),
    None => Ok(()),
  }
}
