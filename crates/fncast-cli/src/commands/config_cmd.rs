//! `fncast config` -- display resolved configuration.
//!
//! # Examples
//!
//! ```text
//! fncast config show
//! fncast config section inference
//! ```

use fncast_types::config::Config;

/// Display the resolved configuration as formatted JSON.
pub fn config_show(config: &Config) {
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: failed to serialize config: {e}"),
    }
}

/// Display one configuration section, or list the available ones.
pub fn config_section(config: &Config, section: &str) {
    match render_section(config, section) {
        Ok(json) => println!("{json}"),
        Err(available) => {
            eprintln!("error: unknown section '{section}'");
            eprintln!("available sections: {}", available.join(", "));
        }
    }
}

/// Pretty JSON for `section`, or the list of valid section names.
fn render_section(config: &Config, section: &str) -> Result<String, Vec<String>> {
    let value = serde_json::to_value(config).unwrap_or_default();
    match value.get(section) {
        Some(v) => Ok(serde_json::to_string_pretty(v).unwrap_or_default()),
        None => Err(value
            .as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()),
    }
}
