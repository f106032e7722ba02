//! Client-side interface to the Liima REST API.
//!
//! `RestClient` is the single transport seam the workflows talk to; the
//! reqwest-backed `LiimaClient` implements it for real servers.

mod client;
mod error;
pub mod models;

pub use client::{get_json, post_json, LiimaClient, RestClient};
pub use error::ApiError;

#[cfg(test)]
pub mod testing;
