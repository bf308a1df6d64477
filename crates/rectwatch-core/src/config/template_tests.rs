use super::*;
use crate::{Config, Query};

#[test]
fn config_template_parses_as_valid_config() {
    // Arrange
    let toml_str = generate_config();

    // Act
    let result: Result<Config, _> = toml::from_str(&toml_str);

    // Assert
    assert!(
        result.is_ok(),
        "config template is not valid TOML: {result:?}"
    );
}

#[test]
fn config_template_matches_default_values() {
    // Arrange
    let toml_str = generate_config();

    // Act
    let mut config: Config = toml::from_str(&toml_str).unwrap();
    config.validate();

    // Assert
    let mut defaults = Config::default();
    defaults.validate();
    assert_eq!(config.server.bind, defaults.server.bind);
    assert_eq!(config.server.workers, defaults.server.workers);
    assert_eq!(
        config.server.read_timeout_secs,
        defaults.server.read_timeout_secs
    );
    assert_eq!(config.server.max_body_kb, defaults.server.max_body_kb);
    assert_eq!(config.storage.path, defaults.storage.path);
    assert_eq!(
        config.storage.read_pool_size,
        defaults.storage.read_pool_size
    );
    assert_eq!(
        config.storage.busy_timeout_ms,
        defaults.storage.busy_timeout_ms
    );
    assert_eq!(config.matching.clock, defaults.matching.clock);
    assert_eq!(
        config.matching.reject_negative_dimensions,
        defaults.matching.reject_negative_dimensions
    );
    assert_eq!(config.logging.enabled, defaults.logging.enabled);
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.logging.max_file_mb, defaults.logging.max_file_mb);
}

#[test]
fn query_template_is_a_valid_query() {
    // Act
    let query: Query = serde_json::from_str(&generate_query()).unwrap();

    // Assert
    assert_eq!(query.candidates.len(), 3);
    assert!(query.rectangles().all(|r| !r.has_negative_dimension()));
}
