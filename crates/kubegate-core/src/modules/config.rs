use std::fs;
use std::path::Path;

use kubegate_types::{ConfigError, GatewayConfig};

/// Load a JSON gateway configuration file.
///
/// Missing keys take their defaults. The result is not validated yet:
/// command-line overrides are applied first, then [`GatewayConfig::check`].
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.display().to_string() });
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::from_io_error(path, &e))?;

    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

/// Read a single-value secret file such as a service-account token.
///
/// Trailing newlines written by `kubectl create secret` / projected volumes
/// are trimmed.
pub fn read_secret_file(path: &Path) -> Result<String, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::from_io_error(path, &e))?;
    Ok(raw.trim().to_string())
}
