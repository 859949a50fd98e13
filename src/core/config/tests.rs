use super::data::{path_display, Config, GenerationParameters};
use super::defaults::{DEFAULT_ENDPOINT_URL, DEFAULT_MODELS, DEFAULT_SYSTEM_PROMPT};
use super::io::ConfigError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn defaults_match_the_demo_constants() {
    let config = Config::default();
    assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT_URL);
    assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    assert_eq!(config.models, DEFAULT_MODELS);
    assert_eq!(config.generation.max_tokens, 2048);
    assert_eq!(config.generation.temperature, 0.8);
    assert_eq!(config.generation.top_p, 0.1);
    assert_eq!(config.generation.presence_penalty, 0.0);
    assert_eq!(config.generation.frequency_penalty, 0.0);
}

#[test]
fn partial_file_falls_back_to_defaults_per_field() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
models = ["gpt-4o", "Phi-4"]

[generation]
temperature = 0.2
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config.models, vec!["gpt-4o", "Phi-4"]);
    assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT_URL);
    assert_eq!(
        config.generation,
        GenerationParameters {
            temperature: 0.2,
            ..GenerationParameters::default()
        }
    );
}

#[test]
fn full_file_overrides_every_field() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
endpoint_url = "https://example.test/models/"
api_version = "2025-01-01"
models = ["a"]
system_prompt = "Answer tersely."

[generation]
max_tokens = 64
temperature = 1.0
top_p = 0.5
presence_penalty = 0.25
frequency_penalty = 0.75
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.endpoint_url, "https://example.test/models/");
    assert_eq!(config.api_version, "2025-01-01");
    assert_eq!(config.system_prompt, "Answer tersely.");
    assert_eq!(config.generation.max_tokens, 64);
    assert_eq!(config.generation.presence_penalty, 0.25);
    assert_eq!(config.generation.frequency_penalty, 0.75);
}

#[test]
fn malformed_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "models = [unterminated").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err
        .to_string()
        .starts_with(&format!("Failed to parse config at {}", path_display(&config_path))));
}

#[test]
fn empty_model_list_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "models = []\n").unwrap();

    match Config::load_from_path(&config_path) {
        Err(ConfigError::Invalid { reason, .. }) => {
            assert_eq!(reason, "models must list at least one model")
        }
        other => panic!("expected invalid config, got {other:?}"),
    }
}

#[test]
fn blank_model_identifier_is_rejected() {
    let config = Config {
        models: vec!["gpt-4o".to_string(), "  ".to_string()],
        ..Config::default()
    };
    assert_eq!(config.validate(), Err("models[1] is blank".to_string()));
}

#[test]
fn blank_endpoint_is_rejected() {
    let config = Config {
        endpoint_url: String::new(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn model_lookup_is_one_based() {
    let config = Config::default();
    assert_eq!(config.model_at(0), None);
    assert_eq!(config.model_at(1), Some("Deepseek-R1"));
    assert_eq!(config.model_at(4), Some("gpt-4o-mini"));
    assert_eq!(config.model_at(5), None);
}

#[test]
fn explicit_path_takes_precedence() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "models = [\"only\"]\n").unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    assert_eq!(config.models, vec!["only"]);
}
