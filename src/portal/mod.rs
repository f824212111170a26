// Portal module.
// Provides the cache-first fetcher and typed access to the schedule search pages.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{FetchMode, FetchRequest, Fetched, Fetcher};
pub use endpoints::Portal;
pub use types::*;
