use openscript::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("OPENSCRIPT_SERVER__PORT");
        env::remove_var("OPENSCRIPT_RESILIENCE__TIMEOUT_DISABLED");
        env::remove_var("CONFIG_FILE");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["openscript"]).expect("defaults should load");

    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert!(!config.resilience.timeout_disabled);
    assert_eq!(config.youtube.region_code, "US");
    assert_eq!(config.youtube.category_id, "0");
    assert_eq!(config.youtube.max_results, 5);
    assert_eq!(config.pipeline.transcribe_top_n, 3);
    assert_eq!(config.pipeline.history_tail, 10);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("OPENSCRIPT_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["openscript"]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("OPENSCRIPT_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["openscript", "--port", "7171"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 7171);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let config_content = r#"
server:
  port: 7070
pipeline:
  transcribe_top_n: 2
    "#;

    let file_path = "test_config.yaml";
    fs::write(file_path, config_content).expect("Failed to write temp config");

    let config = AppConfig::load_from_args(["openscript", "--config", file_path])
        .expect("Failed to load config from file");

    fs::remove_file(file_path).unwrap();

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.pipeline.transcribe_top_n, 2);
    // Untouched sections keep their defaults
    assert_eq!(config.youtube.region_code, "US");
}

#[test]
#[serial]
fn test_timeout_disabled_flag() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["openscript", "--timeout-disabled", "true"])
        .expect("Failed to load config");
    assert!(config.resilience.timeout_disabled);
}
