// petstay-api: Async Rust client for the Petstay marketplace REST API

pub mod catalog;
pub mod client;
pub mod error;
pub mod orders;

pub use client::ApiClient;
pub use error::Error;
