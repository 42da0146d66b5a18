#[cfg(test)]
mod tests {
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::config::parser::{apply_api_url_override, load_config, parse_config, ConfigError};
    use crate::config::DashboardConfig;

    // Helper function to create a temporary file with content
    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_valid_configuration() {
        let config_yaml = r#"
        api:
          base_url: https://momo.example.com
          timeout_secs: 10
          limit: 500
        refresh:
          enabled: true
          transactions_interval_secs: 15
          summary_interval_secs: 120
        display:
          page_size: 25
          note_max_len: 80
          currency_code: USD
          default_window_days: 7
        "#;

        let temp_file = create_temp_file(config_yaml);
        let config = load_config(temp_file.path()).expect("Failed to load valid config");

        assert_eq!(config.api.base_url, "https://momo.example.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.limit, Some(500));
        assert!(config.refresh.enabled);
        assert_eq!(config.refresh.transactions_interval_secs, 15);
        assert_eq!(config.refresh.summary_interval_secs, 120);
        assert_eq!(config.display.page_size, 25);
        assert_eq!(config.display.note_max_len, 80);
        assert_eq!(config.display.currency_code, "USD");
        assert_eq!(config.display.default_window_days, 7);
    }

    #[test]
    fn test_minimal_configuration_uses_defaults() {
        let config_yaml = r#"
        api:
          base_url: http://localhost:8080
        "#;

        let temp_file = create_temp_file(config_yaml);
        let config = load_config(temp_file.path()).expect("Failed to load minimal config");

        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.limit, None);
        assert_eq!(config.refresh.transactions_interval_secs, 60);
        assert_eq!(config.refresh.summary_interval_secs, 300);
        assert_eq!(config.display.page_size, 10);
        assert_eq!(config.display.note_max_len, 50);
        assert_eq!(config.display.currency_code, "RWF");
        assert_eq!(config.display.default_window_days, 30);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let temp_file = create_temp_file("");
        let config = load_config(temp_file.path()).expect("Failed to load empty config");
        assert_eq!(config.api.base_url, DashboardConfig::default().api.base_url);
    }

    #[test]
    fn test_invalid_base_url() {
        let config_yaml = r#"
        api:
          base_url: not a url
        "#;

        let result = parse_config(config_yaml);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let config_yaml = r#"
        display:
          page_size: 0
        "#;

        let result = parse_config(config_yaml);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_currency_code() {
        let config_yaml = r#"
        display:
          currency_code: rwf
        "#;

        let result = parse_config(config_yaml);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_oversized_note_length() {
        let config_yaml = r#"
        display:
          note_max_len: 5000
        "#;

        let result = parse_config(config_yaml);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let at_limit = parse_config("display:\n  note_max_len: 1000\n").unwrap();
        assert_eq!(at_limit.display.note_max_len, 1000);
    }

    #[test]
    fn test_malformed_yaml() {
        let result = parse_config("api: [unclosed");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/momo-dash/config.yaml");
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_api_url_override() {
        let mut config = DashboardConfig::default();
        apply_api_url_override(&mut config, "https://override.example.com")
            .expect("Valid override should apply");
        assert_eq!(config.api.base_url, "https://override.example.com");

        let result = apply_api_url_override(&mut config, "::bad::");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
