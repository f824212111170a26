// Per-run progress tracking.
// Counters shared by detail workers; used for status output only.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Phase of a term fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    FetchingSubjects,
    FetchingCourseList,
    FetchingDetails,
    WritingOutput,
}

impl FetchPhase {
    pub fn display(&self) -> &'static str {
        match self {
            FetchPhase::FetchingSubjects => "Fetching subjects",
            FetchPhase::FetchingCourseList => "Fetching course list",
            FetchPhase::FetchingDetails => "Fetching course details",
            FetchPhase::WritingOutput => "Writing output",
        }
    }
}

/// Snapshot of the counters at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchMetrics {
    pub total: usize,
    pub started: usize,
    pub finished: usize,
    pub cache_hits: usize,
    pub network_fetches: usize,
}

/// Progress of one term's detail fan-out.
#[derive(Debug, Default)]
pub struct FetchProgress {
    total: AtomicUsize,
    started: AtomicUsize,
    finished: AtomicUsize,
    cache_hits: AtomicUsize,
    network_fetches: AtomicUsize,
}

impl FetchProgress {
    pub fn new(total: usize) -> Self {
        let progress = Self::default();
        progress.total.store(total, Ordering::Relaxed);
        progress
    }

    /// Mark one more item started; returns its 1-based position.
    pub fn start(&self) -> usize {
        self.started.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Mark one item finished, recording where its page came from.
    pub fn finish(&self, from_cache: bool) {
        if from_cache {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.network_fetches.fetch_add(1, Ordering::Relaxed);
        }
        self.finished.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> FetchMetrics {
        FetchMetrics {
            total: self.total(),
            started: self.started.load(Ordering::Relaxed),
            finished: self.finished.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            network_fetches: self.network_fetches.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let progress = FetchProgress::new(3);
        assert_eq!(progress.start(), 1);
        assert_eq!(progress.start(), 2);
        progress.finish(true);
        progress.finish(false);

        assert_eq!(
            progress.snapshot(),
            FetchMetrics {
                total: 3,
                started: 2,
                finished: 2,
                cache_hits: 1,
                network_fetches: 1,
            }
        );
    }

    #[test]
    fn test_phase_display() {
        let phases = [
            FetchPhase::FetchingSubjects,
            FetchPhase::FetchingCourseList,
            FetchPhase::FetchingDetails,
            FetchPhase::WritingOutput,
        ];
        let labels: Vec<&str> = phases.iter().map(FetchPhase::display).collect();
        assert_eq!(
            labels,
            vec![
                "Fetching subjects",
                "Fetching course list",
                "Fetching course details",
                "Writing output",
            ]
        );
    }
}
