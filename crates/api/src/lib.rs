//! Lightning Stores API - storefront backend library.
//!
//! The binary in `main.rs` wires these modules into an axum server; they are
//! exposed as a library so the integration-test crate can drive the cart and
//! checkout services against its own in-memory store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
