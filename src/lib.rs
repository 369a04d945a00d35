//! Rust client library for the perks API.
//!
//! This crate provides a typed client for the perk REST endpoints and a
//! debounced search-and-filter view over the public listing:
//!
//! - [`client`]: async and blocking HTTP clients.
//! - [`query`]: normalized listing parameters and their match semantics.
//! - [`source`]: the [`source::PerkSource`] seam and an in-memory backend.
//! - [`view`]: search view state and its debounced controller.
//! - [`render`]: plain-text rendering of a view.

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod render;
pub mod source;
pub mod view;
