// Course list and course detail page assembly.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

use crate::error::{CatalogError, Result};
use crate::extract::{extract_details, sequence::resolve};
use crate::portal::types::{Course, CourseDetail, CourseHeader};

use super::html::{child_elements, child_nodes, first_descendant, selector, text_of};

const LIST_TABLES: &str = "body > div.pagebodydiv > table.datadisplaytable";
const DETAIL_CELLS: &str =
    "body > div.pagebodydiv > table.datadisplaytable > tbody > tr > td.dddefault";

/// `<name> - <crn> - <subject> <code><type> - <section>`, optionally followed
/// by a syllabus link marker.
static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.+?) - ([0-9]*) - ([A-Z]*) ([0-9]*)([A-Z]*) - ([A-Z0-9]*)(?:(?:  \[ Syllabus \])?|$)",
    )
    .expect("valid regex")
});

/// Parse a course title line. Anything off-pattern means the page layout changed.
pub fn parse_course_header(text: &str, href: Option<&str>, base: &Url) -> Result<CourseHeader> {
    let malformed = || CatalogError::MalformedHeader(text.to_string());
    let caps = HEADER_PATTERN.captures(text).ok_or_else(malformed)?;

    let crn = caps[2].parse().map_err(|_| malformed())?;
    let code = caps[4].parse().map_err(|_| malformed())?;
    let detail_url = href.and_then(|h| resolve(base, h)).ok_or_else(malformed)?;
    let kind = Some(caps[5].to_string()).filter(|k| !k.is_empty());

    Ok(CourseHeader {
        name: caps[1].to_string(),
        crn,
        subject: caps[3].to_string(),
        code,
        kind,
        section: caps[6].to_string(),
        detail_url,
    })
}

fn parse_course(header: ElementRef<'_>, details: Option<ElementRef<'_>>, base: &Url) -> Result<Course> {
    let text = text_of(header);
    let href = first_descendant(header, "a").and_then(|a| a.value().attr("href"));
    let header = parse_course_header(text.trim(), href, base)?;

    let detail = match details {
        Some(details) => extract_details(&child_nodes(details), base),
        None => CourseDetail::default(),
    };

    Ok(Course::new(header, detail))
}

/// Parse every course on a course list page, ordered by CRN.
///
/// The listing table (width 100%) alternates title cells and detail cells.
pub fn parse_courses(html: &str, base: &Url) -> Result<Vec<Course>> {
    let document = Html::parse_document(html);
    let tables = selector(LIST_TABLES)?;

    let cells: Vec<ElementRef<'_>> = document
        .select(&tables)
        .filter(|table| table.value().attr("width") == Some("100%"))
        .flat_map(|table| child_elements(table, "tbody"))
        .flat_map(|tbody| child_elements(tbody, "tr"))
        .flat_map(|row| row.children().filter_map(ElementRef::wrap))
        .collect();

    let mut courses = cells
        .chunks(2)
        .map(|pair| parse_course(pair[0], pair.get(1).copied(), base))
        .collect::<Result<Vec<_>>>()?;

    courses.sort_by_key(Course::crn);
    Ok(courses)
}

/// Parse the detail cell(s) of a single course detail page.
pub fn parse_course_details_page(html: &str, base: &Url) -> Result<CourseDetail> {
    let document = Html::parse_document(html);
    let cells = selector(DETAIL_CELLS)?;

    let nodes: Vec<_> = document.select(&cells).flat_map(child_nodes).collect();
    Ok(extract_details(&nodes, base))
}
