//! Substring-based filter for site-wide footer/legal copy.

/// Discards extracted items that contain any known boilerplate phrase.
///
/// Matching is case-insensitive substring containment. The phrase table is
/// configuration data; this filter always runs before any length check.
#[derive(Debug, Clone)]
pub struct BoilerplateFilter {
    phrases: Vec<String>,
}

impl BoilerplateFilter {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_boilerplate(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.phrases.iter().any(|p| lower.contains(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> BoilerplateFilter {
        BoilerplateFilter::new([
            "All rights reserved",
            "Copyright",
            "Privacy Policy",
            "Genesys empowers more than 8,000 organizations",
        ])
    }

    #[test]
    fn matches_are_case_insensitive() {
        assert!(filter().is_boilerplate("copyright 2024 Example Corp"));
        assert!(filter().is_boilerplate("See our PRIVACY POLICY for details"));
    }

    #[test]
    fn ordinary_content_passes() {
        assert!(!filter().is_boilerplate("Learn the basics of routing."));
        assert!(!filter().is_boilerplate(""));
    }

    #[test]
    fn phrase_embedded_in_longer_text_still_matches() {
        assert!(filter().is_boilerplate(
            "Genesys empowers more than 8,000 organizations in over 100 countries."
        ));
    }
}
