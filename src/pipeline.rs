// Term fetch orchestration.
// Subjects, then one bulk course list, then bounded fan-out over detail pages.

use futures::{StreamExt, TryStreamExt, stream};
use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::config::FetchConfig;
use crate::error::{CatalogError, Result};
use crate::output::write_json_pair;
use crate::portal::{Course, Fetcher, Portal, Term};
use crate::state::{FetchPhase, FetchProgress};

/// Drives whole-term fetches against one portal.
#[derive(Debug, Clone)]
pub struct Harvester {
    portal: Portal,
    config: FetchConfig,
}

impl Harvester {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let fetcher = Fetcher::new(CacheStore::new(&config.cache_dir), config.retry)?;
        let portal = Portal::new(fetcher, &config.base_url)?;
        Ok(Self { portal, config })
    }

    /// Fetch the term list, retrying while the portal returns no terms.
    ///
    /// A non-empty list is also written to `terms.json`. Gives up with an
    /// empty list once the attempts run out.
    pub async fn fetch_term_list(&self) -> Result<Vec<Term>> {
        let retry = self.config.term_list_retry;

        for attempt in 1..=retry.max_attempts {
            let terms = self.portal.get_terms().await?;
            if !terms.is_empty() {
                write_json_pair(&self.config.out_dir, "terms", &terms)?;
                return Ok(terms);
            }

            if attempt < retry.max_attempts {
                warn!(
                    "Failed to fetch term list, trying again in {} seconds",
                    retry.delay.as_secs()
                );
                tokio::time::sleep(retry.delay).await;
            } else {
                warn!("Failed to fetch term list, retry limit reached");
            }
        }

        Ok(Vec::new())
    }

    /// Every course in `term` with its detail page merged in, ordered by CRN.
    pub async fn fetch_courses_for_term(&self, term: &str) -> Result<Vec<Course>> {
        info!(term, "{}", FetchPhase::FetchingSubjects.display());
        let subjects = self.portal.get_subjects(term).await?;

        info!(term, subjects = subjects.len(), "{}", FetchPhase::FetchingCourseList.display());
        let courses = self.portal.get_courses(term, &subjects).await?;

        info!(term, courses = courses.len(), "{}", FetchPhase::FetchingDetails.display());
        let progress = FetchProgress::new(courses.len());
        let progress = &progress;

        let mut courses: Vec<Course> = stream::iter(courses)
            .map(|course| async move { self.enrich(course, progress).await })
            .buffer_unordered(self.config.concurrency.max(1))
            .try_collect()
            .await?;

        // Completion order is arbitrary.
        courses.sort_by_key(Course::crn);

        let metrics = progress.snapshot();
        info!(
            term,
            cache_hits = metrics.cache_hits,
            network_fetches = metrics.network_fetches,
            "Fetched {} course details",
            metrics.finished
        );
        Ok(courses)
    }

    async fn enrich(&self, mut course: Course, progress: &FetchProgress) -> Result<Course> {
        let position = progress.start();
        info!("[{} / {}] {}", position, progress.total(), course.label());

        let (detail, from_cache) = self.portal.get_course_detail(&course).await?;
        course.detail.merge(detail);

        progress.finish(from_cache);
        Ok(course)
    }

    /// Fetch one term and write `<term>.json` and `<term>-pretty.json`.
    pub async fn fetch_term(&self, term: &str) -> Result<Vec<Course>> {
        let courses = self.fetch_courses_for_term(term).await?;

        info!(term, "{}", FetchPhase::WritingOutput.display());
        let path = write_json_pair(&self.config.out_dir, term, &courses)?;
        info!(term, path = %path.display(), "Wrote {} courses", courses.len());
        Ok(courses)
    }

    /// Fetch `term` after checking that the portal lists it.
    pub async fn fetch_known_term(&self, term: &str) -> Result<Vec<Course>> {
        let terms = self.fetch_term_list().await?;
        if !terms.iter().any(|t| t.code == term) {
            return Err(CatalogError::UnknownTerm(term.to_string()));
        }
        self.fetch_term(term).await
    }

    /// Fetch the `count` most recent terms, newest first.
    pub async fn fetch_last(&self, count: usize) -> Result<Vec<Term>> {
        let terms: Vec<Term> = self
            .fetch_term_list()
            .await?
            .into_iter()
            .rev()
            .take(count)
            .collect();

        for (i, term) in terms.iter().enumerate() {
            info!(
                "Fetching term {} of {}: {} ({})",
                i + 1,
                terms.len(),
                term.name,
                term.code
            );
            self.fetch_term(&term.code).await?;
        }

        Ok(terms)
    }
}
