//! Title → URL slug derivation.

/// Derive a URL path segment from a human-readable title.
///
/// Rules, applied in order: strip the first matching catalog prefix;
/// lowercase; replace `&` with "and"; drop every character outside ASCII
/// letters/digits/whitespace/hyphen (possessive apostrophes vanish here);
/// collapse whitespace and hyphen runs to a single hyphen; trim hyphens.
///
/// Pure and total. A title that is entirely punctuation yields "".
///
/// ```
/// use courselens_extract::slugify;
///
/// let prefixes = ["Genesys Cloud: ".to_string()];
/// assert_eq!(
///     slugify("Genesys Cloud: Agent's Guide & Setup", &prefixes),
///     "agents-guide-and-setup"
/// );
/// ```
pub fn slugify(title: &str, prefixes: &[String]) -> String {
    let mut rest = title;
    for prefix in prefixes {
        if let Some(stripped) = rest.strip_prefix(prefix.as_str()) {
            rest = stripped;
            break;
        }
    }

    let lowered = rest.to_lowercase().replace('&', "and");

    let mut cleaned = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() || ch.is_whitespace() || ch == '-' {
            cleaned.push(ch);
        }
    }

    let mut slug = String::with_capacity(cleaned.len());
    let mut pending_hyphen = false;
    for ch in cleaned.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_hyphen = !slug.is_empty();
        } else {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(ch);
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes() -> Vec<String> {
        [
            "Genesys Cloud CX: ",
            "Genesys Cloud: ",
            "Introduction to ",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn strips_only_the_first_matching_prefix() {
        assert_eq!(
            slugify("Genesys Cloud CX: Reporting Basics", &prefixes()),
            "reporting-basics"
        );
        // "Introduction to " is not at the start once another prefix matched.
        assert_eq!(
            slugify("Introduction to Genesys Cloud: Routing", &prefixes()),
            "genesys-cloud-routing"
        );
    }

    #[test]
    fn ampersand_and_possessive_apostrophe() {
        assert_eq!(
            slugify("Genesys Cloud: Agent's Guide & Setup", &prefixes()),
            "agents-guide-and-setup"
        );
    }

    #[test]
    fn output_alphabet_is_lowercase_ascii_and_hyphen() {
        let slugs = [
            slugify("Workforce  Management -- Advanced!", &prefixes()),
            slugify("Quality & Compliance (2024)", &prefixes()),
            slugify("  Spaced   Out   Title  ", &prefixes()),
        ];
        for slug in &slugs {
            assert!(
                slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "unexpected char in {slug:?}"
            );
            assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{slug:?}");
            assert!(!slug.contains("--"), "{slug:?}");
        }
    }

    #[test]
    fn underscores_are_dropped_without_a_separator() {
        assert_eq!(slugify("WFM_Basics", &prefixes()), "wfmbasics");
    }

    #[test]
    fn punctuation_only_title_yields_empty_slug() {
        assert_eq!(slugify("!?!...", &prefixes()), "");
        assert_eq!(slugify("", &prefixes()), "");
    }

    #[test]
    fn deterministic() {
        let a = slugify("Genesys Cloud: Routing & Queues", &prefixes());
        let b = slugify("Genesys Cloud: Routing & Queues", &prefixes());
        assert_eq!(a, b);
        assert_eq!(a, "routing-and-queues");
    }
}
