//! Configuration file discovery and loading.
//!
//! The discovery order is:
//! 1. `FNCAST_CONFIG` environment variable (path to a file).
//! 2. `./fncast.json` in the working directory.
//! 3. `~/.fncast/config.json`
//! 4. If none found, the built-in defaults.
//!
//! Files ending in `.toml` are parsed as TOML, everything else as JSON.
//! Object keys are normalized from camelCase to snake_case before the
//! typed [`Config`] is deserialized. Finally a small set of environment
//! variables may override individual settings:
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `FNCAST_INFERENCE_MODE` | `inference.mode` |
//! | `FNCAST_SERVER_HOST` | `server.host` |
//! | `FNCAST_SERVER_PORT` | `server.port` |

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use fncast_types::config::{Config, InferenceMode};
use fncast_types::{FncastError, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FNCAST_CONFIG";
/// Override for `inference.mode`.
pub const MODE_ENV_VAR: &str = "FNCAST_INFERENCE_MODE";
/// Override for `server.host`.
pub const HOST_ENV_VAR: &str = "FNCAST_SERVER_HOST";
/// Override for `server.port`.
pub const PORT_ENV_VAR: &str = "FNCAST_SERVER_PORT";

/// Config file looked up in the working directory.
const LOCAL_CONFIG_FILE: &str = "fncast.json";

/// Discover the config file path using the fallback chain.
///
/// The env var path is returned as-is (the loader checks existence);
/// the two conventional locations are only returned if they exist.
pub fn discover_config_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR)
        && !env_path.trim().is_empty()
    {
        return Some(PathBuf::from(env_path));
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    let home = dirs::home_dir()?.join(".fncast").join("config.json");
    home.exists().then_some(home)
}

/// Load the configuration.
///
/// With `path_override`, that file must exist. Without it, the discovery
/// chain is used and a missing file falls back to defaults. Environment
/// overrides are applied in both cases.
pub async fn load_config(path_override: Option<&Path>) -> Result<Config> {
    let mut config = match path_override {
        Some(path) => {
            if !path.exists() {
                return Err(FncastError::ConfigInvalid {
                    reason: format!("config file not found: {}", path.display()),
                });
            }
            read_config_file(path).await?
        }
        None => match discover_config_path() {
            Some(path) if path.exists() => read_config_file(&path).await?,
            Some(path) => {
                warn!(path = %path.display(), "config path does not exist, using defaults");
                Config::default()
            }
            None => {
                info!("no config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Read and parse a single config file.
async fn read_config_file(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "loading config file");
    let contents = tokio::fs::read_to_string(path).await?;
    parse_config(&contents, path)
}

/// Parse config text, choosing the format from the file extension.
pub fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let raw: Value = if is_toml {
        toml::from_str(contents)?
    } else if contents.trim().is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(contents)?
    };

    Ok(serde_json::from_value(normalize_keys(raw))?)
}

/// Apply `FNCAST_*` environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(mode) = std::env::var(MODE_ENV_VAR) {
        config.inference.mode = mode
            .parse::<InferenceMode>()
            .map_err(|reason| FncastError::ConfigInvalid { reason })?;
        debug!(mode = %config.inference.mode, "inference mode overridden from environment");
    }

    if let Ok(host) = std::env::var(HOST_ENV_VAR)
        && !host.trim().is_empty()
    {
        config.server.host = host;
    }

    if let Ok(port) = std::env::var(PORT_ENV_VAR) {
        config.server.port = port.trim().parse().map_err(|_| FncastError::ConfigInvalid {
            reason: format!("{PORT_ENV_VAR} must be a port number, got '{port}'"),
        })?;
    }

    Ok(())
}

/// Convert camelCase object keys to snake_case recursively.
///
/// Values are left untouched; only object keys are rewritten.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (camel_to_snake(&key), normalize_keys(val)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Convert a single camelCase identifier to snake_case.
///
/// Acronym runs stay together: `"HTTPServer"` becomes `"http_server"`.
///
/// ```
/// # use fncast_core::config_loader::camel_to_snake;
/// assert_eq!(camel_to_snake("simulatedLatencyMs"), "simulated_latency_ms");
/// assert_eq!(camel_to_snake("corsOrigins"), "cors_origins");
/// assert_eq!(camel_to_snake("already_snake"), "already_snake");
/// assert_eq!(camel_to_snake("HTTPServer"), "http_server");
/// ```
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let starts_word = prev.is_lowercase() || prev.is_ascii_digit();
            let ends_acronym =
                prev.is_uppercase() && chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if starts_word || ends_acronym {
                out.push('_');
            }
        }
        out.extend(ch.to_lowercase());
    }
    out
}
