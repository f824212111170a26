// Portal endpoint functions.
// Builds the requests the schedule search issues and parses their responses.

use url::Url;

use crate::error::Result;
use crate::parser::{extract_subjects, extract_terms, parse_course_details_page, parse_courses};

use super::client::{FetchMode, FetchRequest, Fetched, Fetcher};
use super::types::{Course, CourseDetail, Subject, Term};

const TERM_LIST_PATH: &str = "/prod/bwckschd.p_disp_dyn_sched";
const SUBJECT_LIST_PATH: &str = "/prod/bwckgens.p_proc_term_date";
const COURSE_LIST_PATH: &str = "/prod/bwckschd.p_get_crse_unsec";

/// Search form fields sent with every course list query. The `dummy`
/// entries are required by the portal.
const COURSE_SEARCH_FORM: &str = "sel_subj=dummy&sel_day=dummy\
    &sel_schd=dummy&sel_insm=dummy&sel_camp=dummy&sel_levl=dummy\
    &sel_sess=dummy&sel_instr=dummy&sel_instr=%25&sel_ptrm=dummy&sel_attr=dummy\
    &sel_crse=&sel_title=&sel_from_cred=&sel_to_cred=&begin_hh=0\
    &begin_mi=0&begin_ap=a&end_hh=0&end_mi=0&end_ap=a";

/// Schedule search portal: a base URL plus the fetcher that talks to it.
#[derive(Debug, Clone)]
pub struct Portal {
    fetcher: Fetcher,
    base_url: Url,
}

impl Portal {
    pub fn new(fetcher: Fetcher, base_url: &str) -> Result<Self> {
        Ok(Self {
            fetcher,
            base_url: Url::parse(base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<String> {
        Ok(self.base_url.join(path)?.to_string())
    }

    pub fn term_list_request(&self) -> Result<FetchRequest> {
        Ok(FetchRequest::get(self.endpoint(TERM_LIST_PATH)?))
    }

    pub fn subject_list_request(&self, term: &str) -> Result<FetchRequest> {
        let body = format!("p_calling_proc=bwckschd.p_disp_dyn_sched&p_term={}", term);
        Ok(FetchRequest::post_form(self.endpoint(SUBJECT_LIST_PATH)?, body))
    }

    /// One bulk query covering every subject in the term.
    pub fn course_list_request(&self, term: &str, subjects: &[Subject]) -> Result<FetchRequest> {
        let mut body = COURSE_SEARCH_FORM.to_string();
        for subject in subjects {
            body.push_str("&sel_subj=");
            body.push_str(&subject.code);
        }
        body.push_str("&term_in=");
        body.push_str(term);
        Ok(FetchRequest::post_form(self.endpoint(COURSE_LIST_PATH)?, body))
    }

    /// Fetch and parse the term selector. Always goes to the network.
    pub async fn get_terms(&self) -> Result<Vec<Term>> {
        let request = self.term_list_request()?;
        let fetched = self.fetcher.fetch(&request, FetchMode::Refresh).await?;
        extract_terms(&fetched.text)
    }

    pub async fn get_subjects(&self, term: &str) -> Result<Vec<Subject>> {
        let html = self.fetcher.fetch_text(&self.subject_list_request(term)?).await?;
        extract_subjects(&html)
    }

    /// Header-level course list for a term, ordered by CRN.
    pub async fn get_courses(&self, term: &str, subjects: &[Subject]) -> Result<Vec<Course>> {
        let request = self.course_list_request(term, subjects)?;
        let html = self.fetcher.fetch_text(&request).await?;
        parse_courses(&html, &self.base_url)
    }

    /// Detail page for one course, and whether it came from the cache.
    pub async fn get_course_detail(&self, course: &Course) -> Result<(CourseDetail, bool)> {
        let request = FetchRequest::get(course.header.detail_url.as_str());
        let Fetched { text, from_cache } =
            self.fetcher.fetch(&request, FetchMode::CacheFirst).await?;
        Ok((parse_course_details_page(&text, &self.base_url)?, from_cache))
    }
}
