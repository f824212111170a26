// Term and subject selectors.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::error::Result;
use crate::portal::types::{Subject, Term};

use super::html::{selector, text_of};

const TERM_OPTIONS: &str = r#"select[name="p_term"] option"#;
const SUBJECT_OPTIONS: &str = "#subj_id option";
const VIEW_ONLY_MARKER: &str = "(View only)";

static TERM_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("valid regex"));

/// Terms offered by the term selector, ascending by code.
///
/// Placeholder and malformed options are skipped.
pub fn extract_terms(html: &str) -> Result<Vec<Term>> {
    let document = Html::parse_document(html);
    let options = selector(TERM_OPTIONS)?;

    let mut terms: Vec<Term> = document
        .select(&options)
        .filter_map(|option| {
            let code = option.value().attr("value")?.trim();
            if !TERM_CODE.is_match(code) {
                return None;
            }
            let text = text_of(option);
            let name = text.trim();
            let name = name.strip_suffix(VIEW_ONLY_MARKER).unwrap_or(name).trim_end();
            Some(Term {
                code: code.to_string(),
                name: name.to_string(),
            })
        })
        .collect();

    terms.sort();
    terms.dedup_by(|a, b| a.code == b.code);
    Ok(terms)
}

/// Subjects listed for a term, in page order.
pub fn extract_subjects(html: &str) -> Result<Vec<Subject>> {
    let document = Html::parse_document(html);
    let options = selector(SUBJECT_OPTIONS)?;

    Ok(document
        .select(&options)
        .filter_map(|option| {
            let code = option.value().attr("value")?.trim();
            if code.is_empty() {
                return None;
            }
            Some(Subject {
                code: code.to_string(),
                description: text_of(option).trim().to_string(),
            })
        })
        .collect())
}
