use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0 and the body limit is positive
/// - Extensions are bare (no dot, no separator) and non-empty
/// - Staging directory and output root are distinct
/// - Pipeline timeout, when set, is positive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.server.max_body_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "server.max_body_bytes must be greater than 0".to_string(),
        ));
    }

    validate_extension("storage.document_extension", &config.storage.document_extension)?;
    validate_extension("storage.audio_extension", &config.storage.audio_extension)?;

    if config.storage.upload_dir == config.storage.output_root {
        return Err(ConfigError::ValidationError(
            "storage.upload_dir and storage.output_root must differ".to_string(),
        ));
    }

    if config.storage.bundle_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.bundle_name cannot be empty".to_string(),
        ));
    }

    if config.pipeline.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "pipeline.timeout_secs must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_extension(field: &str, ext: &str) -> Result<(), ConfigError> {
    if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError(format!(
            "{} must be a bare extension like \"pdf\", got {:?}",
            field, ext
        )));
    }
    Ok(())
}
