use crate::config::{FileConfig, LlmConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_parse_file_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let config_content = r#"
model = "gpt-4o"
base_url = "https://llm.example.com/v1"

[llm]
request_timeout_ms = 30000
"#;
    fs::write(&config_path, config_content).unwrap();

    let s = fs::read_to_string(&config_path).unwrap();
    let cfg: FileConfig = toml::from_str(&s).unwrap();

    assert_eq!(cfg.model, Some("gpt-4o".to_string()));
    assert_eq!(cfg.base_url, Some("https://llm.example.com/v1".to_string()));
    assert_eq!(cfg.api_key, None);

    let llm = cfg.llm.unwrap();
    assert_eq!(llm.request_timeout_ms, Some(30_000));
    assert_eq!(llm.connect_timeout_ms, None);
}

#[test]
fn test_empty_file_config_is_default() {
    let cfg: FileConfig = toml::from_str("").unwrap();
    assert_eq!(cfg, FileConfig::default());
}

#[test]
fn test_llm_config_defaults() {
    let llm = LlmConfig::default();
    assert_eq!(llm.connect_timeout_ms, 5_000);
    assert_eq!(llm.request_timeout_ms, 60_000);
}
