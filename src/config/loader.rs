//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::OrderExportConfig;
use crate::domain::errors::ExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into OrderExportConfig
/// 4. Applies environment variable overrides (ORDER_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use order_export::config::loader::load_config;
///
/// let config = load_config("order-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<OrderExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: OrderExportConfig = toml::from_str(&contents)
        .map_err(|e| ExportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ExportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ExportError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comments are copied verbatim
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the ORDER_EXPORT_* prefix
///
/// Environment variables follow the pattern: ORDER_EXPORT_<SECTION>_<KEY>
/// For example: ORDER_EXPORT_SOURCE_PATH, ORDER_EXPORT_EXPORT_DRY_RUN
fn apply_env_overrides(config: &mut OrderExportConfig) {
    if let Ok(val) = std::env::var("ORDER_EXPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("ORDER_EXPORT_SOURCE_PATH") {
        config.source.path = val;
    }

    if let Ok(val) = std::env::var("ORDER_EXPORT_EXPORT_FILE_TEMPLATE") {
        config.export.file_template = val;
    }
    if let Ok(val) = std::env::var("ORDER_EXPORT_EXPORT_TEMPLATES_DIR") {
        config.export.templates_dir = val;
    }
    if let Ok(val) = std::env::var("ORDER_EXPORT_EXPORT_FILE_NAME_PATTERN") {
        config.export.file_name_pattern = val;
    }
    if let Ok(val) = std::env::var("ORDER_EXPORT_EXPORT_WRITE_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.export.write_timeout_secs = Some(secs);
        }
    }
    if let Ok(val) = std::env::var("ORDER_EXPORT_EXPORT_FAIL_FAST") {
        config.export.fail_fast = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ORDER_EXPORT_EXPORT_SKIP_EXISTING") {
        config.export.skip_existing = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ORDER_EXPORT_EXPORT_DRY_RUN") {
        config.export.dry_run = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("ORDER_EXPORT_STORAGE_ROOT") {
        config.storage.root = val;
    }

    if let Ok(val) = std::env::var("ORDER_EXPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ORDER_EXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ORDER_EXPORT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LOADER_TEST_TEMPLATE", "invoice.xml");
        let input = "file_template = \"${LOADER_TEST_TEMPLATE}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "file_template = \"invoice.xml\"\n");
        std::env::remove_var("LOADER_TEST_TEMPLATE");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LOADER_TEST_MISSING");
        let input = "root = \"${LOADER_TEST_MISSING}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("LOADER_TEST_COMMENTED");
        let input = "# root = \"${LOADER_TEST_COMMENTED}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${LOADER_TEST_COMMENTED}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[source]
path = "orders.json"

[export]
file_template = "order.xml"
file_name_pattern = "orders/{id}.xml"

[storage]
root = "out"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.export.file_template, "order.xml");
        assert_eq!(config.storage.root, "out");
    }

    #[test]
    fn test_load_config_invalid_values() {
        let toml_content = r#"
[source]
path = "orders.json"

[export]
file_template = ""
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("export.file_template"));
    }
}
