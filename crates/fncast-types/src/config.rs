//! Configuration schema types.
//!
//! All structs accept both `snake_case` and `camelCase` field names via
//! `#[serde(alias)]`, and every section falls back to its defaults when
//! absent. Unknown fields are silently ignored for forward compatibility.
//!
//! Configuration is read once at startup and shared read-only; nothing in
//! the pipeline mutates it while events are being processed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration for fncast.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Inference stage settings.
    #[serde(default)]
    pub inference: InferenceConfig,

    /// HTTP trigger settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Queue trigger settings.
    #[serde(default)]
    pub queue: QueueConfig,
}

// ── Inference ────────────────────────────────────────────────────────────

/// The placeholder transform applied to the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum InferenceMode {
    /// Uppercase the payload.
    #[default]
    Uppercase,
    /// Lowercase the payload.
    Lowercase,
    /// Return the payload unchanged.
    Echo,
}

impl InferenceMode {
    /// All recognized modes, in declaration order.
    pub const ALL: [InferenceMode; 3] = [Self::Uppercase, Self::Lowercase, Self::Echo];

    /// Canonical name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uppercase => "Uppercase",
            Self::Lowercase => "Lowercase",
            Self::Echo => "Echo",
        }
    }

    /// Apply the transform to `input`.
    ///
    /// Case conversion maps one character at a time, with no context:
    /// `Σ` always lowercases to `σ`, and a character whose mapping would
    /// expand to several characters (`ß` to `SS`) is left unchanged. The
    /// output therefore has exactly as many characters as the input.
    pub fn apply(&self, input: &str) -> String {
        match self {
            Self::Uppercase => input.chars().map(|c| single_char(c, c.to_uppercase())).collect(),
            Self::Lowercase => input.chars().map(|c| single_char(c, c.to_lowercase())).collect(),
            Self::Echo => input.to_owned(),
        }
    }
}

/// The mapped character, or `original` when the mapping is not 1:1.
fn single_char(original: char, mut mapped: impl Iterator<Item = char>) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => c,
        _ => original,
    }
}

impl fmt::Display for InferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InferenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!("unknown inference mode '{s}' (expected Uppercase, Lowercase or Echo)")
            })
    }
}

impl TryFrom<String> for InferenceMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Inference stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceConfig {
    /// Which placeholder transform to apply.
    #[serde(default)]
    pub mode: InferenceMode,

    /// Artificial latency the placeholder executor waits before answering.
    #[serde(default = "default_simulated_latency_ms", alias = "simulatedLatencyMs")]
    pub simulated_latency_ms: u64,

    /// Upper bound on the inference stage. `None` means unbounded.
    #[serde(default, alias = "timeoutMs")]
    pub timeout_ms: Option<u64>,
}

fn default_simulated_latency_ms() -> u64 {
    25
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            mode: InferenceMode::default(),
            simulated_latency_ms: default_simulated_latency_ms(),
            timeout_ms: None,
        }
    }
}

// ── Server ───────────────────────────────────────────────────────────────

/// HTTP trigger configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. Empty means permissive.
    #[serde(default, alias = "corsOrigins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    7071
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

// ── Queue ────────────────────────────────────────────────────────────────

/// Queue trigger configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueConfig {
    /// Queue name, recorded on every event it produces.
    #[serde(default = "default_queue_name")]
    pub name: String,

    /// Bounded channel capacity.
    #[serde(default = "default_queue_capacity")]
    pub capacity: usize,
}

fn default_queue_name() -> String {
    "fncast-events".into()
}
fn default_queue_capacity() -> usize {
    1024
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: default_queue_name(),
            capacity: default_queue_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.inference.mode, InferenceMode::Uppercase);
        assert_eq!(config.inference.simulated_latency_ms, 25);
        assert!(config.inference.timeout_ms.is_none());
        assert_eq!(config.server.bind_addr(), "127.0.0.1:7071");
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.queue.name, "fncast-events");
        assert_eq!(config.queue.capacity, 1024);
    }

    #[test]
    fn empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("uppercase".parse::<InferenceMode>().unwrap(), InferenceMode::Uppercase);
        assert_eq!("LOWERCASE".parse::<InferenceMode>().unwrap(), InferenceMode::Lowercase);
        assert_eq!(" Echo ".parse::<InferenceMode>().unwrap(), InferenceMode::Echo);
        assert!("shout".parse::<InferenceMode>().is_err());
    }

    #[test]
    fn mode_serde_accepts_any_case_and_writes_canonical() {
        let config: InferenceConfig = serde_json::from_str(r#"{"mode": "echo"}"#).unwrap();
        assert_eq!(config.mode, InferenceMode::Echo);
        let json = serde_json::to_string(&InferenceMode::Lowercase).unwrap();
        assert_eq!(json, "\"Lowercase\"");
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = serde_json::from_str::<InferenceConfig>(r#"{"mode": "shout"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown inference mode"));
    }

    #[test]
    fn mode_apply() {
        assert_eq!(InferenceMode::Uppercase.apply("Hello"), "HELLO");
        assert_eq!(InferenceMode::Lowercase.apply("Hello"), "hello");
        assert_eq!(InferenceMode::Echo.apply("Hello"), "Hello");
    }

    #[test]
    fn case_mapping_is_per_character() {
        assert_eq!(InferenceMode::Uppercase.apply("straße"), "STRAßE");
        assert_eq!(InferenceMode::Uppercase.apply("ﬁle"), "ﬁLE");
        assert_eq!(InferenceMode::Uppercase.apply("grüße, ΑΒΓ δεζ"), "GRÜßE, ΑΒΓ ΔΕΖ");
        assert_eq!(InferenceMode::Lowercase.apply("ΟΔΟΣ"), "οδοσ");
        assert_eq!(InferenceMode::Lowercase.apply("İstanbul"), "İstanbul");

        for input in ["straße", "ΟΔΟΣ", "İ", "ǰ", "plain ascii"] {
            for mode in InferenceMode::ALL {
                assert_eq!(mode.apply(input).chars().count(), input.chars().count());
            }
        }
    }

    #[test]
    fn camel_case_aliases() {
        let json = r#"{
            "inference": { "mode": "Lowercase", "simulatedLatencyMs": 0, "timeoutMs": 500 },
            "server": { "host": "0.0.0.0", "port": 8080, "corsOrigins": ["http://localhost:3000"] },
            "queue": { "name": "inbound", "capacity": 16 }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.inference.mode, InferenceMode::Lowercase);
        assert_eq!(config.inference.simulated_latency_ms, 0);
        assert_eq!(config.inference.timeout_ms, Some(500));
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.server.cors_origins.len(), 1);
        assert_eq!(config.queue.name, "inbound");
        assert_eq!(config.queue.capacity, 16);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let config: Config =
            serde_json::from_str(r#"{"inference": {"mode": "Echo", "model": "x"}, "extra": 1}"#)
                .unwrap();
        assert_eq!(config.inference.mode, InferenceMode::Echo);
    }
}
