//! Record assembly: rendered HTML → [`CourseRecord`].

use courselens_common::CourseRecord;
use tracing::{debug, warn};

use crate::audience::AudienceDetector;
use crate::boilerplate::BoilerplateFilter;
use crate::duration::{extract_duration, extract_level};
use crate::matcher::{
    collect_list_matches, first_text_match, ListMatchOptions, Matcher, PageDocument,
    TextMatchOptions,
};

/// Compiled extraction rules for one content type.
///
/// Selector lists arrive as configuration strings; entries that fail to
/// compile are logged and skipped so a typo in one selector does not blank
/// out the whole field.
pub struct ExtractionRules {
    pub title: Vec<Matcher>,
    pub description: Vec<Matcher>,
    pub objectives: Vec<Matcher>,
    pub outline: Vec<Matcher>,
    pub prerequisites: Vec<Matcher>,
    pub boilerplate: BoilerplateFilter,
    pub audience: AudienceDetector,
    pub min_description_length: usize,
}

impl ExtractionRules {
    pub fn compile(
        selectors: SelectorLists<'_>,
        boilerplate_phrases: &[String],
        audience_vocabulary: impl IntoIterator<Item = (String, String)>,
        min_description_length: usize,
    ) -> Self {
        Self {
            title: compile_css(selectors.title, "title"),
            description: compile_css(selectors.description, "description"),
            objectives: compile_css(selectors.objectives, "objectives"),
            outline: compile_css(selectors.outline, "outline"),
            prerequisites: compile_css(selectors.prerequisites, "prerequisites"),
            boilerplate: BoilerplateFilter::new(boilerplate_phrases),
            audience: AudienceDetector::new(audience_vocabulary),
            min_description_length,
        }
    }
}

/// Borrowed selector lists, one per field, in priority order.
pub struct SelectorLists<'a> {
    pub title: &'a [String],
    pub description: &'a [String],
    pub objectives: &'a [String],
    pub outline: &'a [String],
    pub prerequisites: &'a [String],
}

fn compile_css(selectors: &[String], field: &str) -> Vec<Matcher> {
    selectors
        .iter()
        .filter_map(|s| match Matcher::css(s) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(target: "extract.rules", %field, error = %e, "skipping selector");
                None
            }
        })
        .collect()
}

/// Extract a full record from rendered page markup.
///
/// `title` is the input title and is never replaced by page content; a page
/// heading that differs from it lands in `extracted_title`. Extraction
/// failures degrade to empty fields, never to an error.
pub fn extract_course(
    rules: &ExtractionRules,
    title: &str,
    url: &str,
    content_type: &str,
    html_source: &str,
) -> CourseRecord {
    let doc = PageDocument::parse(html_source);

    let mut record = CourseRecord::new(title, url, content_type);
    record.page_length = html_source.len();

    record.extracted_title = page_title(&doc, &rules.title, title);
    record.description = first_text_match(
        &doc,
        &rules.description,
        &rules.boilerplate,
        &TextMatchOptions::with_min_length(rules.min_description_length),
    );
    record.prerequisites = first_text_match(
        &doc,
        &rules.prerequisites,
        &rules.boilerplate,
        &TextMatchOptions::with_min_length(5),
    );
    record.objectives = collect_list_matches(
        &doc,
        &rules.objectives,
        &rules.boilerplate,
        &ListMatchOptions::default(),
    );
    record.course_outline = collect_list_matches(
        &doc,
        &rules.outline,
        &rules.boilerplate,
        &ListMatchOptions::default(),
    );
    record.target_audience = rules.audience.detect(doc.text());
    record.duration = extract_duration(doc.text());
    record.level = extract_level(doc.text());

    debug!(
        target: "extract.course",
        %url,
        has_description = record.description.is_some(),
        objectives = record.objectives.len(),
        outline = record.course_outline.len(),
        audience = record.target_audience.len(),
        "extraction finished"
    );

    record
}

/// First page heading longer than three characters that differs from the
/// input title. Only the first element per selector is considered.
fn page_title(doc: &PageDocument, matchers: &[Matcher], input_title: &str) -> Option<String> {
    for matcher in matchers {
        if let Matcher::Css(selector) = matcher {
            if let Some(element) = doc.html().select(selector).next() {
                let text =
                    crate::text::collapse_whitespace(&element.text().collect::<String>());
                if text.chars().count() > 3 && text != input_title {
                    return Some(text);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExtractionRules {
        let title = vec!["h1".to_string()];
        let description = vec![
            ".course-overview".to_string(),
            ".description".to_string(),
        ];
        let objectives = vec![".objectives li".to_string()];
        let outline = vec![".course-outline li".to_string()];
        let prerequisites = vec![".prerequisites".to_string()];
        let phrases = vec!["All rights reserved".to_string()];
        let vocab = [("agents", "Agents"), ("supervisors", "Supervisors")]
            .into_iter()
            .map(|(p, l)| (p.to_string(), l.to_string()));

        ExtractionRules::compile(
            SelectorLists {
                title: &title,
                description: &description,
                objectives: &objectives,
                outline: &outline,
                prerequisites: &prerequisites,
            },
            &phrases,
            vocab,
            20,
        )
    }

    #[test]
    fn fixture_description_is_extracted_exactly() {
        let html = r#"<html><body>
            <div class="description">Learn the basics of routing here.</div>
        </body></html>"#;
        let record = extract_course(&rules(), "Routing", "https://x/routing", "e-learning", html);
        assert_eq!(
            record.description.as_deref(),
            Some("Learn the basics of routing here.")
        );
    }

    #[test]
    fn input_title_is_never_overwritten() {
        let html = "<html><body><h1>Something Entirely Different</h1></body></html>";
        let record = extract_course(&rules(), "Routing", "https://x/routing", "e-learning", html);
        assert_eq!(record.title, "Routing");
        assert_eq!(
            record.extracted_title.as_deref(),
            Some("Something Entirely Different")
        );
    }

    #[test]
    fn matching_page_heading_is_not_duplicated() {
        let html = "<html><body><h1>Routing</h1></body></html>";
        let record = extract_course(&rules(), "Routing", "https://x/routing", "e-learning", html);
        assert_eq!(record.extracted_title, None);
    }

    #[test]
    fn full_page_assembles_every_field() {
        let html = r#"<html><body>
            <h1>Queue Management Deep Dive</h1>
            <div class="course-overview">Operate and tune ACD queues for steady service levels.</div>
            <p>Target Audience: supervisors and agents Course Objectives follow below</p>
            <ul class="objectives">
                <li>Balance load across queues</li>
                <li>Interpret service level metrics</li>
            </ul>
            <ul class="course-outline">
                <li>Module 1: Queue anatomy</li>
                <li>Module 2: Routing policies</li>
            </ul>
            <div class="prerequisites">Completion of the platform basics course.</div>
            <p>Duration: 90 minutes</p>
            <p>Level: Intermediate</p>
            <footer>All rights reserved.</footer>
        </body></html>"#;

        let record = extract_course(&rules(), "Queue Management", "https://x/q", "e-learning", html);
        assert_eq!(
            record.description.as_deref(),
            Some("Operate and tune ACD queues for steady service levels.")
        );
        assert_eq!(record.target_audience, vec!["Supervisors", "Agents"]);
        assert_eq!(record.objectives.len(), 2);
        assert_eq!(record.course_outline[0], "Module 1: Queue anatomy");
        assert_eq!(
            record.prerequisites.as_deref(),
            Some("Completion of the platform basics course.")
        );
        assert_eq!(record.duration.as_deref(), Some("90 minutes"));
        assert_eq!(record.level.as_deref(), Some("Intermediate"));
        assert!(record.error.is_none());
        assert!(record.page_length > 0);
    }

    #[test]
    fn malformed_markup_degrades_to_empty_fields() {
        let record = extract_course(
            &rules(),
            "Broken",
            "https://x/broken",
            "e-learning",
            "<div><<<>>> &&& <p unclosed",
        );
        assert_eq!(record.description, None);
        assert!(record.objectives.is_empty());
        assert!(record.target_audience.is_empty());
    }
}
