//! Pure extraction logic for rendered catalog pages.
//!
//! Everything in this crate is deterministic and free of I/O: given a page's
//! HTML and a set of compiled rules, it produces a
//! [`courselens_common::CourseRecord`]. The browser and storage layers live
//! elsewhere.
//!
//! - [`slug::slugify`]: title → URL path segment
//! - [`matcher::Matcher`]: one entry in an ordered strategy list (CSS
//!   selector or regex); [`matcher::first_text_match`] and
//!   [`matcher::collect_list_matches`] walk such lists first-to-last and
//!   stop at the first hit
//! - [`boilerplate::BoilerplateFilter`]: discards site-wide footer/legal copy
//! - [`audience::AudienceDetector`]: two-stage labeled-section heuristic
//!   mapped through a role vocabulary
//! - [`course::extract_course`]: assembles the full record

pub mod audience;
pub mod boilerplate;
pub mod course;
pub mod duration;
pub mod matcher;
pub mod slug;
pub mod text;

pub use course::{extract_course, ExtractionRules, SelectorLists};
pub use matcher::{Matcher, PageDocument};
pub use slug::slugify;
