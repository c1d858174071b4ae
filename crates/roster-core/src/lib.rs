//! Core types and controllers for the roster employee directory.
//!
//! This crate has no HTTP or database dependencies. Storage
//! backends implement [`store::RecordStore`]; everything above the store
//! (repository, listing, edit form, detail view) lives here.

// Native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod detail;
pub mod employee;
pub mod error;
pub mod form;
pub mod listing;
pub mod memory;
pub mod notice;
pub mod repository;
pub mod store;
pub mod timestamp;

pub use error::{Error, FieldErrors, Result};
pub use repository::EmployeeRepository;
