//! Two-stage target-audience extraction.
//!
//! Stage one locates a labeled section ("Target Audience:", "Designed
//! for:", …) bounded by a following known section header. Stage two scans
//! the captured span for role phrases from a fixed vocabulary and maps each
//! hit to its canonical label, deduplicated in vocabulary scan order
//! (longest phrase first, not order of appearance in the span). When the
//! header patterns find nothing, a "Prerequisites" span is scanned with the
//! same vocabulary.

use regex::Regex;

/// Header phrases that open an audience section. Each captures a span up to
/// the next known section header.
const HEADER_PATTERNS: &[&str] = &[
    r"(?is)Target\s+Audience[:\s]*([^.]+?)Course\s+(?:Objectives|Prerequisites)",
    r"(?is)Intended\s+Audience[:\s]*([^.]+?)Course\s+(?:Objectives|Prerequisites)",
    r"(?is)Who\s+Should\s+Attend[:\s]*([^.]+?)Course\s+(?:Objectives|Prerequisites)",
    r"(?is)This\s+(?:course|eLearning)\s+is\s+(?:for|intended\s+for)[:\s]*([^.]+?)Course\s+(?:Objectives|Prerequisites)",
    r"(?is)Designed\s+for[:\s]*([^.]+?)Course\s+(?:Objectives|Prerequisites)",
    r"(?is)Suitable\s+for[:\s]*([^.]+?)Course\s+(?:Objectives|Prerequisites)",
    r"(?is)Target\s+Audience[:\s]*([^.]+?)(?:Overview|Introduction)",
    r"(?is)Intended\s+Audience[:\s]*([^.]+?)(?:Overview|Introduction)",
];

const FALLBACK_PATTERNS: &[&str] = &[
    r"(?is)Course\s+Prerequisites[:\s]*([^.]+?)Course\s+Objectives",
    r"(?is)Prerequisites[:\s]*([^.]+?)Course\s+Objectives",
];

/// Role-vocabulary scanner over labeled audience sections.
#[derive(Debug, Clone)]
pub struct AudienceDetector {
    header_patterns: Vec<Regex>,
    fallback_patterns: Vec<Regex>,
    /// (word-bounded phrase regex, canonical label), longest phrase first
    /// so compound roles claim their words before generic suffixes.
    vocabulary: Vec<(Regex, String)>,
}

impl AudienceDetector {
    /// Build a detector from `(phrase, canonical label)` pairs.
    ///
    /// Phrases are matched case-insensitively on word boundaries; plain
    /// substring matching would let short entries like "it" fire inside
    /// unrelated words.
    pub fn new<I>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries: Vec<(String, String)> = vocabulary.into_iter().collect();
        entries.sort_by_key(|(phrase, _)| std::cmp::Reverse(phrase.chars().count()));

        let vocabulary = entries
            .into_iter()
            .filter_map(|(phrase, label)| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(&phrase));
                Regex::new(&pattern).ok().map(|re| (re, label))
            })
            .collect();

        // Compile-time constants; a failure here is a typo in this file.
        let header_patterns = HEADER_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("audience header pattern"))
            .collect();
        let fallback_patterns = FALLBACK_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("audience fallback pattern"))
            .collect();

        Self {
            header_patterns,
            fallback_patterns,
            vocabulary,
        }
    }

    /// Detect canonical audience labels in flattened page text.
    /// Returns an empty vec when no labeled section yields a known role.
    pub fn detect(&self, page_text: &str) -> Vec<String> {
        for pattern in &self.header_patterns {
            for caps in pattern.captures_iter(page_text) {
                let span = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                if span.chars().count() > 3 {
                    let roles = self.roles_in(span);
                    if !roles.is_empty() {
                        return roles;
                    }
                }
            }
        }

        for pattern in &self.fallback_patterns {
            for caps in pattern.captures_iter(page_text) {
                let span = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                if span.chars().count() > 10 {
                    let roles = self.roles_in(span);
                    if !roles.is_empty() {
                        return roles;
                    }
                }
            }
        }

        Vec::new()
    }

    fn roles_in(&self, span: &str) -> Vec<String> {
        let mut detected: Vec<String> = Vec::new();
        for (re, label) in &self.vocabulary {
            if re.is_match(span) && !detected.contains(label) {
                detected.push(label.clone());
            }
        }
        detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> AudienceDetector {
        AudienceDetector::new(
            [
                ("system administrators", "System Administrators"),
                ("administrators", "Administrators"),
                ("agents", "Agents"),
                ("supervisors", "Supervisors"),
                ("developers", "Developers"),
                ("it", "IT Professionals"),
            ]
            .into_iter()
            .map(|(p, l)| (p.to_string(), l.to_string())),
        )
    }

    #[test]
    fn header_span_yields_canonical_labels() {
        let text = "Target Audience: supervisors and agents Course Objectives After this course";
        assert_eq!(detector().detect(text), vec!["Supervisors", "Agents"]);
    }

    #[test]
    fn compound_role_is_detected_before_its_suffix() {
        let text =
            "Intended Audience: system administrators Course Prerequisites None required here";
        let roles = detector().detect(text);
        assert_eq!(roles[0], "System Administrators");
        // The bare word also matches inside the compound phrase, as the
        // original vocabulary intended.
        assert!(roles.contains(&"Administrators".to_string()));
    }

    #[test]
    fn short_vocabulary_entries_require_word_boundaries() {
        // "suitable" and "with" contain "it"; none of them is the IT role.
        let text = "Designed for: people comfortable with suitable tooling Course Objectives x";
        assert_eq!(detector().detect(text), Vec::<String>::new());

        let text = "Designed for: IT and developers Course Objectives x";
        assert_eq!(
            detector().detect(text),
            vec!["Developers", "IT Professionals"]
        );
    }

    #[test]
    fn labels_follow_vocabulary_scan_order_not_text_order() {
        // "agents" appears before "supervisors" in the span; the longer
        // vocabulary phrase still comes out first.
        let text = "Target Audience: agents and supervisors Course Objectives x";
        assert_eq!(detector().detect(text), vec!["Supervisors", "Agents"]);
    }

    #[test]
    fn duplicate_roles_are_reported_once() {
        let text = "Target Audience: agents, senior agents, and more agents Course Objectives x";
        assert_eq!(detector().detect(text), vec!["Agents"]);
    }

    #[test]
    fn prerequisites_fallback_is_used_when_headers_fail() {
        let text = "Prerequisites: intended for experienced supervisors in a contact center \
                    Course Objectives After completing";
        assert_eq!(detector().detect(text), vec!["Supervisors"]);
    }

    #[test]
    fn unlabeled_mentions_are_ignored() {
        let text = "This page mentions agents and supervisors but has no audience section.";
        assert_eq!(detector().detect(text), Vec::<String>::new());
    }
}
