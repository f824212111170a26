// bannerweb-fetch: replayable fetching and parsing of Banner course schedules.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod portal;
pub mod state;

pub use config::{FetchConfig, RetryPolicy, TermListRetry};
pub use error::{CatalogError, Result};
pub use pipeline::Harvester;
