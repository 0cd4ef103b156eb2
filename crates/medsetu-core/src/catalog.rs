//! Medicine catalog: stores list medicines, customers search them.

use crate::{
  Error, Result,
  admin::get_store,
  medicine::{Medicine, NewMedicine},
  repo::Repository,
};

/// Add a medicine to a store's catalog. The store must exist.
pub async fn add_medicine<R: Repository>(repo: &R, input: NewMedicine) -> Result<Medicine> {
  get_store(repo, input.store_id).await?;
  repo.add_medicine(input).await.map_err(Error::backend)
}

/// Case-insensitive substring search over medicine names. The query is
/// used as given; surrounding whitespace is part of the match.
pub async fn search_medicines<R: Repository>(repo: &R, query: &str) -> Result<Vec<Medicine>> {
  repo.search_medicines(query).await.map_err(Error::backend)
}
