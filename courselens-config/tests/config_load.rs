use courselens_config::CatalogConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_catalog_file_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "0.1"
settings:
  headless: true
  checkpoint_interval: 5
  item_delay_secs: 1
content_types:
  e-learning:
    display_name: E-Learning
    input_file: courses.txt
    url_base: "https://learning.example.com/courses/"
    output:
      json: data/elearning.json
      csv: data/elearning.csv
  video:
    display_name: Video
    input_file: videos.csv
    url_base: "https://learning.example.com/videos/"
    ready_marker: ".video-meta"
    output:
      json: data/video.json
      csv: data/video.csv
combined_output:
  json: data/combined.json
  csv: data/combined.csv
  "#;
    let p = write_yaml(&tmp, "courselens.yaml", file_yaml);

    let config = CatalogConfigLoader::new()
        .with_file(p)
        .load()
        .expect("load catalog config");

    assert_eq!(config.content_types.len(), 2);
    assert_eq!(config.settings.checkpoint_interval, 5);
    assert_eq!(config.settings.item_delay_secs, 1);
    // Untouched settings keep their defaults.
    assert_eq!(config.settings.settle_timeout_secs, 12);
    let video = &config.content_types["video"];
    assert_eq!(video.ready_marker.as_deref(), Some(".video-meta"));
    // Selector lists fall back to the built-in tables.
    assert!(!video.selectors.description.is_empty());
    assert!(config.combined_output.is_some());
}

#[test]
#[serial]
fn test_env_expansion_in_paths() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
content_types:
  e-learning:
    display_name: E-Learning
    input_file: "${COURSELENS_DATA_DIR}/courses.txt"
    url_base: "https://learning.example.com/courses/"
    output:
      json: "${COURSELENS_DATA_DIR}/out.json"
      csv: "${COURSELENS_DATA_DIR}/out.csv"
  "#;
    let p = write_yaml(&tmp, "courselens.yaml", file_yaml);

    temp_env::with_var("COURSELENS_DATA_DIR", Some("/tmp/catalog"), || {
        let config = CatalogConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load catalog config");
        let ct = &config.content_types["e-learning"];
        assert_eq!(ct.input_file.to_str(), Some("/tmp/catalog/courses.txt"));
        assert_eq!(ct.output.json.to_str(), Some("/tmp/catalog/out.json"));
    });
}
