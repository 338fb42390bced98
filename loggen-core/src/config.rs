use crate::error::{LoggenError, Result};
use figment::{Figment, providers::{Format, Serialized, Yaml}};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables read at startup, in the order they are reported.
pub const ENV_KEYS: [&str; 3] = ["HOST", "LOG_FILE", "LOG_SPEED"];

/// Fully validated emitter configuration. Built once in `main` and then
/// borrowed by the generator and the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    /// Copied verbatim into every record's `host` field.
    pub host: String,
    /// Output file, opened in append mode on every tick.
    pub log_file: PathBuf,
    /// Records per second. Finite and strictly positive.
    pub log_speed: f64,
    pub vocabulary: Vocabulary,
}

/// Candidate sets the generator draws from.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Vocabulary {
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    #[serde(default = "default_uris")]
    pub uris: Vec<String>,
    /// Referrer domains; rendered as `www.<domain>/`.
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
    #[serde(default = "default_bytes_sent")]
    pub bytes_sent: String,
    #[serde(default = "default_status")]
    pub status: String,
}

// ── Defaults ──────────────────────────────────────────────────

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_methods() -> Vec<String> { strings(&["HEAD", "GET", "POST"]) }
fn default_uris() -> Vec<String> { strings(&["/index.html", "/uri", "/test"]) }
fn default_domains() -> Vec<String> { strings(&["example.com", "example.net", "example.org"]) }
fn default_user_agents() -> Vec<String> { strings(&["UA-1", "UA-2", "Test-UA", "Mozilla"]) }
fn default_bytes_sent() -> String { "585".into() }
fn default_status() -> String { "200".into() }

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            methods: default_methods(),
            uris: default_uris(),
            domains: default_domains(),
            user_agents: default_user_agents(),
            bytes_sent: default_bytes_sent(),
            status: default_status(),
        }
    }
}

impl Vocabulary {
    /// Every set non-empty, every literal non-empty.
    pub fn validate(&self) -> Result<()> {
        let sets = [
            ("methods", &self.methods),
            ("uris", &self.uris),
            ("domains", &self.domains),
            ("user_agents", &self.user_agents),
        ];
        for (name, set) in sets {
            if set.is_empty() {
                return Err(LoggenError::Config(format!("vocabulary.{name} must not be empty")));
            }
            if set.iter().any(|s| s.is_empty()) {
                return Err(LoggenError::Config(format!(
                    "vocabulary.{name} must not contain empty strings"
                )));
            }
        }
        if self.bytes_sent.is_empty() {
            return Err(LoggenError::Config("vocabulary.bytes_sent must not be empty".into()));
        }
        if self.status.is_empty() {
            return Err(LoggenError::Config("vocabulary.status must not be empty".into()));
        }
        Ok(())
    }
}

// ── Raw layer ─────────────────────────────────────────────────

/// YAML values arrive typed (`host: 10` is a number). Env values always
/// arrive as the exact text that was set.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    UInt(u64),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::UInt(n) => n.to_string(),
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Str(s) => s,
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match self {
            Scalar::UInt(n) => Some(*n as f64),
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Str(s) => s.trim().parse().ok(),
            Scalar::Bool(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    host: Option<Scalar>,
    log_file: Option<Scalar>,
    log_speed: Option<Scalar>,
    #[serde(default)]
    vocabulary: Vocabulary,
}

fn required(value: Option<Scalar>, env: &str) -> Result<String> {
    match value.map(Scalar::into_string) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(LoggenError::Config(format!("{env} is not set"))),
    }
}

impl RawConfig {
    fn validate(self) -> Result<EmitterConfig> {
        let host = required(self.host, "HOST")?;
        let log_file = PathBuf::from(required(self.log_file, "LOG_FILE")?);

        let speed = self
            .log_speed
            .ok_or_else(|| LoggenError::Config("LOG_SPEED is not set".into()))?;
        let log_speed = speed.to_f64().ok_or_else(|| {
            LoggenError::Config(format!(
                "invalid LOG_SPEED {:?}: not a number",
                speed.into_string()
            ))
        })?;

        let config = EmitterConfig {
            host,
            log_file,
            log_speed,
            vocabulary: self.vocabulary,
        };
        config.validate()?;
        Ok(config)
    }
}

/// The set variables among [`ENV_KEYS`], lowercased, values untouched.
///
/// figment's `Env` provider parses values (`007` → `7`, `[a]` → array), so
/// the text is read here and handed over as plain strings.
fn env_layer() -> Result<BTreeMap<String, String>> {
    let mut layer = BTreeMap::new();
    for key in ENV_KEYS {
        match std::env::var(key) {
            Ok(value) => {
                layer.insert(key.to_ascii_lowercase(), value);
            }
            Err(std::env::VarError::NotPresent) => {}
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(LoggenError::Config(format!("{key} is not valid UTF-8")));
            }
        }
    }
    Ok(layer)
}

// ── Impls ─────────────────────────────────────────────────────

impl EmitterConfig {
    /// Layered sources: optional YAML file, then the raw environment.
    pub fn figment(config_file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new();
        if let Some(path) = config_file {
            figment = figment.merge(Yaml::file(path));
        }
        Ok(figment.merge(Serialized::defaults(env_layer()?)))
    }

    /// Load configuration from an optional YAML file + env overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(LoggenError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
        }
        Self::from_figment(&Self::figment(config_file)?)
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let raw: RawConfig = figment.extract()?;
        raw.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.log_speed.is_finite() || self.log_speed <= 0.0 {
            return Err(LoggenError::Config(format!(
                "invalid LOG_SPEED {}: must be a positive number",
                self.log_speed
            )));
        }
        match Duration::try_from_secs_f64(1.0 / self.log_speed) {
            Ok(d) if !d.is_zero() => {}
            _ => {
                return Err(LoggenError::Config(format!(
                    "invalid LOG_SPEED {}: emission interval out of range",
                    self.log_speed
                )));
            }
        }
        self.vocabulary.validate()
    }

    /// Emission interval, `1 / log_speed` seconds.
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.log_speed).unwrap_or(Duration::MAX)
    }
}
