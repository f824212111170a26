// Parser module.
// Locates the relevant regions of portal pages and assembles typed records.

pub mod courses;
pub mod html;
pub mod options;

pub use courses::{parse_course_details_page, parse_course_header, parse_courses};
pub use options::{extract_subjects, extract_terms};
