//! Core types and trait definitions for the MedSetu medicine marketplace.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`repo::Repository`]; the HTTP layer drives the
//! services in [`lifecycle`], [`admin`], [`accounts`] and [`catalog`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod accounts;
pub mod admin;
pub mod assignment;
pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod medicine;
pub mod order;
pub mod prescription;
pub mod repo;
pub mod store;
pub mod user;

pub use error::{Error, Result};
