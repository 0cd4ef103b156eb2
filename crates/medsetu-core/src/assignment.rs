//! Order-to-store assignment.
//!
//! The candidate list handed to [`assign_store`] is expected to come from
//! [`StoreDirectory::list_approved_stores`](crate::repo::StoreDirectory::list_approved_stores):
//! already filtered to approved stores in the target pincode and sorted by
//! priority ascending. The policy trusts that ordering and does not re-check
//! store status.

use crate::store::Store;

/// Pick the store an order is assigned to: the head of `candidates`, or
/// `None` when no store is available.
pub fn assign_store(candidates: &[Store]) -> Option<&Store> {
  candidates.first()
}
