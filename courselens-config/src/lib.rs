//! Loader for the catalog configuration with JSON/YAML + environment overlays.
//!
//! A catalog file enumerates, per content type, an input file, a URL base,
//! ordered selector lists per field, and output destinations; run-wide
//! settings (headless mode, settle timeout, checkpoint interval) live under
//! `settings`. `COURSELENS__`-prefixed environment variables override file
//! values and `${VAR}` placeholders are expanded recursively.
//!
//! The heuristic tables (slug prefixes, boilerplate phrases, audience
//! vocabulary) were reverse-engineered against one specific catalog site.
//! They ship as defaults here precisely so deployments can replace them
//! without touching code.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    pub version: Option<String>,
    #[serde(default)]
    pub settings: RunSettings,
    #[serde(default = "default_slug_prefixes")]
    pub slug_prefixes: Vec<String>,
    #[serde(default = "default_boilerplate_phrases")]
    pub boilerplate_phrases: Vec<String>,
    #[serde(default = "default_audience_vocabulary")]
    pub audience_vocabulary: Vec<AudienceEntry>,
    pub content_types: BTreeMap<String, ContentTypeConfig>,
    #[serde(default)]
    pub combined_output: Option<OutputFiles>,
}

impl CatalogConfig {
    /// Reject configurations the batch loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_types.is_empty() {
            return Err(ConfigError::Message("no content types configured".into()));
        }
        if self.settings.checkpoint_interval == 0 {
            return Err(ConfigError::Message(
                "settings.checkpoint_interval must be at least 1".into(),
            ));
        }
        for (name, ct) in &self.content_types {
            if ct.url_base.is_empty() {
                return Err(ConfigError::Message(format!(
                    "content type '{name}' has an empty url_base"
                )));
            }
        }
        Ok(())
    }
}

/// Run-wide settings shared by every content type.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// WebDriver endpoint (chromedriver).
    pub webdriver_url: String,
    pub headless: bool,
    pub window_size: String,
    /// Bounded wait for `document.readyState == "complete"`.
    pub page_load_timeout_secs: u64,
    /// Upper bound on the content-readiness poll after navigation.
    pub settle_timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// Fixed delay between items, to rate-limit against the target site.
    pub item_delay_secs: u64,
    /// Full snapshot is rewritten every this many items.
    pub checkpoint_interval: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            window_size: "1920,1080".into(),
            page_load_timeout_secs: 10,
            settle_timeout_secs: 12,
            poll_interval_ms: 250,
            item_delay_secs: 2,
            checkpoint_interval: 20,
        }
    }
}

/// One free-text role phrase and the canonical label it maps to.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AudienceEntry {
    pub phrase: String,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputFiles {
    pub json: PathBuf,
    pub csv: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentTypeConfig {
    pub display_name: String,
    /// Title list (one per line) or a CSV/JSON file of `{title, url}` pairs.
    pub input_file: PathBuf,
    /// Prefix that the derived slug is appended to.
    pub url_base: String,
    pub output: OutputFiles,
    #[serde(default)]
    pub selectors: SelectorMap,
    /// CSS selector whose presence marks the page as settled. When unset,
    /// readiness falls back to a rendered-text length threshold.
    #[serde(default)]
    pub ready_marker: Option<String>,
    /// Minimum accepted description length, in characters.
    #[serde(default = "default_min_description_length")]
    pub min_description_length: usize,
}

/// Ordered CSS selector lists, tried first to last per field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorMap {
    pub title: Vec<String>,
    pub description: Vec<String>,
    pub objectives: Vec<String>,
    pub outline: Vec<String>,
    pub prerequisites: Vec<String>,
}

impl Default for SelectorMap {
    fn default() -> Self {
        Self {
            title: strings(&[
                "h1.course-title",
                "h1.title",
                ".course-header h1",
                ".content-header h1",
                "h1",
                ".course-name",
                ".page-title",
            ]),
            description: strings(&[
                ".course-content .description",
                ".content-body .description",
                ".course-overview",
                ".course-summary",
                ".course-details .description",
                "main .description",
                ".content .description",
                "article .description",
                ".course-intro",
                ".course-abstract",
                "div[class*=\"course\"] div[class*=\"description\"]",
                ".overview-content",
                ".description:not([class*=\"footer\"])",
            ]),
            objectives: strings(&[
                ".learning-objectives li",
                ".course-objectives li",
                ".objectives li",
                ".outcomes li",
                ".goals li",
                ".learning-outcomes li",
                "ul[class*=\"objective\"] li",
                "ul[class*=\"outcome\"] li",
                "ul[class*=\"goal\"] li",
            ]),
            outline: strings(&[
                ".course-outline li",
                ".outline li",
                ".curriculum li",
                ".course-curriculum li",
                ".syllabus li",
                ".course-content li",
                ".modules li",
                ".course-modules li",
                ".topics li",
                "ul[class*=\"outline\"] li",
                "ul[class*=\"curriculum\"] li",
                "ul[class*=\"module\"] li",
                "ul[class*=\"topic\"] li",
            ]),
            prerequisites: strings(&[
                ".prerequisites",
                ".requirements",
                ".pre-requisites",
                ".course-requirements",
                "[class*=\"prerequisite\"]",
                "[class*=\"requirement\"]",
            ]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_min_description_length() -> usize {
    50
}

fn default_slug_prefixes() -> Vec<String> {
    strings(&[
        "Genesys Cloud CX: ",
        "Genesys Cloud: ",
        "Introduction to ",
        "CX Cloud from Genesys and Salesforce: ",
        "CX Cloud from Genesys and Salesforce - ",
    ])
}

fn default_boilerplate_phrases() -> Vec<String> {
    strings(&[
        "Genesys empowers more than 8,000 organizations",
        "organizations in over 100 countries",
        "improve loyalty and business outcomes",
        "customer experience transformation",
        "All rights reserved",
        "Copyright",
        "Privacy Policy",
        "Terms of Service",
    ])
}

fn default_audience_vocabulary() -> Vec<AudienceEntry> {
    // Order matters downstream only for ties; the extractor sorts by
    // phrase length so compound roles claim their words first.
    [
        ("system administrators", "System Administrators"),
        ("system administrator", "System Administrators"),
        ("contact center administrators", "Contact Center Administrators"),
        ("contact center administrator", "Contact Center Administrators"),
        ("administrators", "Administrators"),
        ("administrator", "Administrators"),
        ("contact center agents", "Contact Center Agents"),
        ("contact center agent", "Contact Center Agents"),
        ("agents", "Agents"),
        ("agent", "Agents"),
        ("contact center managers", "Contact Center Managers"),
        ("contact center manager", "Contact Center Managers"),
        ("quality managers", "Quality Managers"),
        ("quality manager", "Quality Managers"),
        ("workforce managers", "Workforce Managers"),
        ("workforce manager", "Workforce Managers"),
        ("managers", "Managers"),
        ("manager", "Managers"),
        ("supervisors", "Supervisors"),
        ("supervisor", "Supervisors"),
        ("business users", "Business Users"),
        ("business user", "Business Users"),
        ("developers", "Developers"),
        ("developer", "Developers"),
        ("analysts", "Analysts"),
        ("analyst", "Analysts"),
        ("it professionals", "IT Professionals"),
        ("it professional", "IT Professionals"),
        ("it", "IT Professionals"),
    ]
    .into_iter()
    .map(|(phrase, label)| AudienceEntry {
        phrase: phrase.to_string(),
        label: label.to_string(),
    })
    .collect()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (file + env overrides).
pub struct CatalogConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for CatalogConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogConfigLoader {
    /// Start with the default env source: `COURSELENS__`-prefixed overrides.
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("COURSELENS").separator("__"));
        Self { builder }
    }

    /// Attach a catalog file; the `config` crate infers JSON/YAML/TOML from
    /// the suffix. A missing file surfaces as an error at [`load`] time.
    ///
    /// [`load`]: CatalogConfigLoader::load
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Merge an inline JSON snippet. Used by tests and the CLI.
    ///
    /// ```
    /// use courselens_config::CatalogConfigLoader;
    ///
    /// let cfg = CatalogConfigLoader::new()
    ///     .with_json_str(r#"{
    ///         "version": "1",
    ///         "content_types": {
    ///             "e-learning": {
    ///                 "display_name": "E-Learning",
    ///                 "input_file": "courses.txt",
    ///                 "url_base": "https://learning.example.com/courses/",
    ///                 "output": { "json": "out.json", "csv": "out.csv" }
    ///             }
    ///         }
    ///     }"#)
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("1"));
    /// assert!(cfg.settings.headless);
    /// assert_eq!(cfg.settings.checkpoint_interval, 20);
    /// ```
    pub fn with_json_str(mut self, json: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(json, config::FileFormat::Json));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// Environment variables win over file values, and `${VAR}` strings are
    /// expanded before the typed config is materialised.
    pub fn load(self) -> Result<CatalogConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: CatalogConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("CATALOG_HOST", Some("learning.example.com"), || {
            let mut v = json!("https://${CATALOG_HOST}/courses/");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("https://learning.example.com/courses/"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("OUT_DIR", Some("data")), ("RUN", Some("42"))], || {
            let mut v = json!([
                "$OUT_DIR/results.json",
                { "csv": "${OUT_DIR}/run-${RUN}.csv" },
                7,
                null
            ]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["data/results.json", { "csv": "data/run-42.csv" }, 7, null])
            );
        });
    }

    #[test]
    fn expansion_terminates_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }

    #[test]
    fn default_tables_are_pinned() {
        let prefixes = default_slug_prefixes();
        assert!(prefixes.iter().any(|p| p == "Genesys Cloud: "));
        let phrases = default_boilerplate_phrases();
        assert!(phrases.iter().any(|p| p == "Copyright"));
        let vocab = default_audience_vocabulary();
        assert!(vocab
            .iter()
            .any(|e| e.phrase == "system administrators" && e.label == "System Administrators"));
    }

    #[test]
    fn zero_checkpoint_interval_is_rejected() {
        let err = CatalogConfigLoader::new()
            .with_json_str(
                r#"{
                "settings": { "checkpoint_interval": 0 },
                "content_types": {
                    "e-learning": {
                        "display_name": "E-Learning",
                        "input_file": "courses.txt",
                        "url_base": "https://learning.example.com/courses/",
                        "output": { "json": "o.json", "csv": "o.csv" }
                    }
                }
            }"#,
            )
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("checkpoint_interval"));
    }
}
