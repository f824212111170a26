// State module.
// Progress context carried through a fetch run.

pub mod progress;

pub use progress::{FetchMetrics, FetchPhase, FetchProgress};
