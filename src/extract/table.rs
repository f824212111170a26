// Table sub-parsers for meeting times and seat availability.
// Missing or malformed cells become `None`, never errors.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::portal::types::{AvailabilityRow, MeetingTime, Range};

use super::node::TableNode;

static REPEATED_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(" +").expect("valid regex"));

/// Long facility names and the short codes used in output.
const FACILITY_CODES: &[(&str, &str)] = &[
    ("Fac.of Arts and Social Sci.", "FASS"),
    ("Sabancı Business School", "FMAN"),
    ("Fac. of Engin. and Nat. Sci.", "FENS"),
    ("School of Languages Building", "SL"),
    ("University Center", "UC"),
];

/// Header spellings seen in the portal mapped to canonical names.
fn normalize_header(header: &str) -> String {
    match header.trim() {
        "Shedule Type" => "Schedule Type".to_string(),
        other => other.to_string(),
    }
}

/// Fold rows after the first into header-keyed maps.
///
/// Cells beyond the header row's width are dropped.
pub fn group_rows(rows: &[Vec<String>]) -> Vec<BTreeMap<String, String>> {
    let Some((headers, body)) = rows.split_first() else {
        return Vec::new();
    };
    let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    body.iter()
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .collect()
}

/// Split `"from - to"` on the literal `" - "`.
pub fn parse_range(text: &str) -> Range {
    let mut parts = text.split(" - ");
    Range {
        from: parts.next().unwrap_or_default().to_string(),
        to: parts.next().map(str::to_string),
    }
}

/// Replace known long facility names with their short codes.
pub fn shorten_facility(text: &str) -> String {
    FACILITY_CODES
        .iter()
        .fold(text.to_string(), |acc, (long, short)| acc.replace(long, short))
}

/// `"Jane  Doe (P), John Roe"` becomes `["Jane Doe", "John Roe"]`.
pub fn parse_instructors(text: &str) -> Vec<String> {
    REPEATED_SPACES
        .replace_all(text, " ")
        .replace(" (P)", "")
        .split(", ")
        .map(|name| name.trim().to_string())
        .collect()
}

fn cell<'a>(entry: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn number(entry: &BTreeMap<String, String>, key: &str) -> Option<i64> {
    cell(entry, key).and_then(|value| value.trim().parse().ok())
}

pub fn parse_schedule_table(table: &TableNode) -> Vec<MeetingTime> {
    group_rows(&table.rows)
        .iter()
        .map(|entry| MeetingTime {
            kind: cell(entry, "Type").map(str::to_string),
            time: cell(entry, "Time").map(parse_range),
            days: cell(entry, "Days").map(str::to_string),
            location: cell(entry, "Where").map(shorten_facility),
            date_range: cell(entry, "Date Range").map(parse_range),
            schedule_type: cell(entry, "Schedule Type").map(str::to_string),
            instructors: cell(entry, "Instructors").map(parse_instructors),
        })
        .collect()
}

pub fn parse_availability_table(table: &TableNode) -> Vec<AvailabilityRow> {
    group_rows(&table.rows)
        .iter()
        .map(|entry| AvailabilityRow {
            title: cell(entry, "").map(str::to_string),
            capacity: number(entry, "Capacity"),
            actual: number(entry, "Actual"),
            remaining: number(entry, "Remaining"),
        })
        .collect()
}
