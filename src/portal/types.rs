// Course catalog data types.
// Records produced by the parser and written out as JSON.

use serde::{Deserialize, Serialize};

/// An academic term from the portal's term selector.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Term {
    /// Six-digit term code, e.g. `202402`.
    #[serde(rename = "term")]
    pub code: String,
    /// Display name with any "(View only)" marker removed.
    pub name: String,
}

/// A subject offered in a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub code: String,
    pub description: String,
}

/// Fields parsed from a course title line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseHeader {
    pub name: String,
    pub crn: u32,
    pub subject: String,
    pub code: u32,
    /// Letter suffix on the course code (`R` for recitations, `L` for labs).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub section: String,
    #[serde(rename = "detailURL")]
    pub detail_url: String,
}

/// A `from - to` pair as printed by the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// One row of the "Scheduled Meeting Times" table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTime {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub time: Option<Range>,
    pub days: Option<String>,
    #[serde(rename = "where")]
    pub location: Option<String>,
    pub date_range: Option<Range>,
    pub schedule_type: Option<String>,
    pub instructors: Option<Vec<String>>,
}

/// One row of the "Registration Availability" table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub title: Option<String>,
    pub capacity: Option<i64>,
    pub actual: Option<i64>,
    pub remaining: Option<i64>,
}

/// Optional fields gathered from a course detail block.
///
/// Any field may be missing; the portal does not print every field for
/// every course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_dates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ects: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "catalogEntryURL", skip_serializing_if = "Option::is_none")]
    pub catalog_entry_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corequisites: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<MeetingTime>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Vec<AvailabilityRow>>,
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

impl CourseDetail {
    /// Merge `other` into `self`. Fields set in `other` win.
    pub fn merge(&mut self, other: CourseDetail) {
        overwrite(&mut self.term, other.term);
        overwrite(&mut self.registration_dates, other.registration_dates);
        overwrite(&mut self.levels, other.levels);
        overwrite(&mut self.faculty, other.faculty);
        overwrite(&mut self.ects, other.ects);
        overwrite(&mut self.language, other.language);
        overwrite(&mut self.catalog_entry_url, other.catalog_entry_url);
        overwrite(&mut self.credits, other.credits);
        overwrite(&mut self.schedule_type, other.schedule_type);
        overwrite(&mut self.campus, other.campus);
        overwrite(&mut self.method, other.method);
        overwrite(&mut self.prerequisites, other.prerequisites);
        overwrite(&mut self.corequisites, other.corequisites);
        overwrite(&mut self.schedule, other.schedule);
        overwrite(&mut self.availability, other.availability);
    }

    /// Whether no field has been set.
    pub fn is_empty(&self) -> bool {
        *self == CourseDetail::default()
    }
}

/// A course section: header fields plus whatever detail was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(flatten)]
    pub header: CourseHeader,
    #[serde(flatten)]
    pub detail: CourseDetail,
}

impl Course {
    pub fn new(header: CourseHeader, detail: CourseDetail) -> Self {
        Self { header, detail }
    }

    pub fn crn(&self) -> u32 {
        self.header.crn
    }

    /// Short label used in progress output, e.g. `CS201R-A1 "Intro"`.
    pub fn label(&self) -> String {
        let section = if self.header.section.is_empty() {
            "0"
        } else {
            self.header.section.as_str()
        };
        format!(
            "{}{}{}-{} \"{}\"",
            self.header.subject,
            self.header.code,
            self.header.kind.as_deref().unwrap_or(""),
            section,
            self.header.name
        )
    }
}
