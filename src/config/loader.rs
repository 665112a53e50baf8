//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ScholarMapConfig;
use crate::domain::errors::ScholarMapError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ScholarMapConfig`]
/// 4. Applies environment variable overrides (`SCHOLARMAP_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing fails, a
/// referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use scholarmap::config::load_config;
///
/// let config = load_config("scholarmap.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ScholarMapConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScholarMapError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ScholarMapError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ScholarMapConfig = toml::from_str(&contents)
        .map_err(|e| ScholarMapError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ScholarMapError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. Missing variables are collected and
/// reported together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ScholarMapError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `SCHOLARMAP_*` prefix
///
/// Variables follow the pattern `SCHOLARMAP_<SECTION>_<KEY>`, for example
/// `SCHOLARMAP_GEOCODER_BASE_URL` or `SCHOLARMAP_DATA_AUTHORS_FILE`.
fn apply_env_overrides(config: &mut ScholarMapConfig) {
    if let Ok(val) = std::env::var("SCHOLARMAP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("SCHOLARMAP_DATA_AUTHORS_FILE") {
        config.data.authors_file = val;
    }
    if let Ok(val) = std::env::var("SCHOLARMAP_DATA_NATIONAL_REGISTRY") {
        config.data.national_registry = val;
    }
    if let Ok(val) = std::env::var("SCHOLARMAP_DATA_GLOBAL_REGISTRY") {
        config.data.global_registry = val;
    }
    if let Ok(val) = std::env::var("SCHOLARMAP_DATA_IP_LOCATION_DB") {
        config.data.ip_location_db = val;
    }
    if let Ok(val) = std::env::var("SCHOLARMAP_DATA_IP_ORG_BLOCKS") {
        config.data.ip_org_blocks = val;
    }

    if let Ok(val) = std::env::var("SCHOLARMAP_GEOCODER_BASE_URL") {
        config.geocoder.base_url = val;
    }
    if let Ok(val) = std::env::var("SCHOLARMAP_GEOCODER_USER_AGENT") {
        config.geocoder.user_agent = val;
    }
    if let Ok(val) = std::env::var("SCHOLARMAP_GEOCODER_REQUEST_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.geocoder.request_timeout_seconds = timeout;
        }
    }

    if let Ok(val) = std::env::var("SCHOLARMAP_OUTPUT_DIRECTORY") {
        config.output.directory = val;
    }
    if let Ok(val) = std::env::var("SCHOLARMAP_OUTPUT_LOCATIONS_FILE") {
        config.output.locations_file = val;
    }

    if let Ok(val) = std::env::var("SCHOLARMAP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SCHOLARMAP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
