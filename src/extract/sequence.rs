// Positional extraction over a course detail container.
//
// The portal prints detail fields as loose siblings with no schema: a label
// span, a text run, a `<br>`, sometimes a run of links, a table, or a bare
// text line with a trailing unit. Fields are recognized by position and
// literal text in one left-to-right pass with fixed lookahead.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;
use url::Url;

use crate::portal::types::CourseDetail;

use super::node::{Node, TableNode};
use super::table::{parse_availability_table, parse_schedule_table};

const CATALOG_ENTRY_CAPTION: &str = "View Catalog Entry";
const SCHEDULE_CAPTION: &str = "Scheduled Meeting Times";
const AVAILABILITY_CAPTION: &str = "Registration Availability";
const FACULTY_PREFIX: &str = "Course Offered by ";

/// A best-effort pattern over free text and the field it fills.
///
/// Rules are tried independently against the same line; any number may
/// match. This is a heuristic layer, not a grammar.
struct AttributeRule {
    pattern: Regex,
    apply: fn(&mut CourseDetail, &str),
}

static ATTRIBUTE_RULES: LazyLock<Vec<AttributeRule>> = LazyLock::new(|| {
    vec![
        AttributeRule {
            pattern: Regex::new(r"([0-9]+) ECTS").expect("valid regex"),
            apply: |detail, value| {
                if let Ok(ects) = value.parse() {
                    detail.ects = Some(ects);
                }
            },
        },
        AttributeRule {
            pattern: Regex::new(r"Lang\. of Instruction: ([a-zA-Z]+)").expect("valid regex"),
            apply: |detail, value| detail.language = Some(value.to_string()),
        },
        AttributeRule {
            pattern: Regex::new(r"Course Offered by ([A-Za-z]+)").expect("valid regex"),
            apply: |detail, value| detail.faculty = Some(value.to_string()),
        },
    ]
});

fn apply_attribute_rules(detail: &mut CourseDetail, text: &str) {
    for rule in ATTRIBUTE_RULES.iter() {
        if let Some(value) = rule.pattern.captures(text).and_then(|c| c.get(1)) {
            (rule.apply)(detail, value.as_str());
        }
    }
}

/// Extract every recognizable field from `nodes`.
///
/// Relative hrefs resolve against `base`. Unrecognized nodes are skipped,
/// so the result is a partial record.
pub fn extract_details(nodes: &[Node], base: &Url) -> CourseDetail {
    let mut detail = CourseDetail::default();
    let mut i = 0;

    while i < nodes.len() {
        i = match &nodes[i] {
            Node::Label(_) => read_labelled(nodes, i, &mut detail),
            Node::Link { text, href } => {
                if text.trim() == CATALOG_ENTRY_CAPTION {
                    detail.catalog_entry_url = href.as_deref().and_then(|h| resolve(base, h));
                }
                i + 1
            }
            Node::Table(table) => {
                read_table(table, &mut detail);
                i + 1
            }
            Node::Text(text) => {
                read_unit_line(text.trim(), &mut detail);
                i + 1
            }
            Node::LineBreak | Node::Other(_) => i + 1,
        };
    }

    detail
}

/// Handle the label at `start`; returns the index of the next unread node.
fn read_labelled(nodes: &[Node], start: usize, detail: &mut CourseDetail) -> usize {
    let label = nodes[start].content().trim();

    match (nodes.get(start + 1), nodes.get(start + 2)) {
        (Some(Node::Text(value)), Some(Node::LineBreak)) if !value.trim().is_empty() => {
            read_single_line(label, value.trim(), detail);
            start + 3
        }
        (Some(Node::Text(_)), Some(Node::LineBreak)) => {
            read_multi_line(label, nodes, start + 3, detail)
        }
        (Some(Node::LineBreak), _) => read_multi_line(label, nodes, start + 2, detail),
        _ => start + 1,
    }
}

fn read_single_line(label: &str, value: &str, detail: &mut CourseDetail) {
    match label {
        "Associated Term:" => detail.term = Some(value.to_string()),
        "Registration Dates:" => detail.registration_dates = Some(value.to_string()),
        "Levels:" => detail.levels = Some(value.split(", ").map(str::to_string).collect()),
        "Faculty:" => {
            let faculty = value.strip_prefix(FACULTY_PREFIX).unwrap_or(value);
            detail.faculty = Some(faculty.to_string());
        }
        _ => apply_attribute_rules(detail, value),
    }
}

/// Consume nodes from `from` up to the next label; returns that label's index.
fn read_multi_line(label: &str, nodes: &[Node], from: usize, detail: &mut CourseDetail) -> usize {
    let from = from.min(nodes.len());
    let end = nodes[from..]
        .iter()
        .position(Node::is_label)
        .map_or(nodes.len(), |offset| from + offset);
    let body = &nodes[from..end];

    match label {
        "Prerequisites:" => detail.prerequisites = Some(link_texts(body)),
        "Corequisites:" => detail.corequisites = Some(link_texts(body)),
        _ => {}
    }

    end
}

fn link_texts(nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::Link { text, .. } => Some(text.trim().to_string()),
            _ => None,
        })
        .collect()
}

fn read_table(table: &TableNode, detail: &mut CourseDetail) {
    match table.caption.as_deref().map(str::trim) {
        Some(SCHEDULE_CAPTION) => detail.schedule = Some(parse_schedule_table(table)),
        Some(AVAILABILITY_CAPTION) => {
            detail.availability = Some(parse_availability_table(table))
        }
        _ => {}
    }
}

/// Bare lines such as `3.000 Credits` or `Main Campus`.
fn read_unit_line(text: &str, detail: &mut CourseDetail) {
    if let Some(value) = text.strip_suffix(" Credits") {
        detail.credits = parse_credits(value);
    } else if let Some(value) = text.strip_suffix(" Schedule Type") {
        detail.schedule_type = Some(value.to_string());
    } else if let Some(value) = text.strip_suffix(" Campus") {
        detail.campus = Some(value.to_string());
    } else if let Some(value) = text.strip_suffix(" Instructional Method") {
        detail.method = Some(value.to_string());
    }
}

/// `"3.000"` is 3; fractional or garbled counts are dropped.
fn parse_credits(value: &str) -> Option<u32> {
    let credits: f64 = value.trim().parse().ok()?;
    if credits.is_finite() && credits >= 0.0 && credits.fract() == 0.0 {
        Some(credits as u32)
    } else {
        None
    }
}

pub(crate) fn resolve(base: &Url, href: &str) -> Option<String> {
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(err) => {
            warn!(href, "cannot resolve link: {}", err);
            None
        }
    }
}
