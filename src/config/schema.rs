//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a lookup race.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::source::SourceKind;

/// Root configuration for a lookup race.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Coordinator settings (deadline, cancellation, all-failed policy).
    pub race: RaceSettings,

    /// Shared HTTP client settings.
    pub http: HttpConfig,

    /// Address sources to race against each other.
    pub sources: Vec<SourceConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            race: RaceSettings::default(),
            http: HttpConfig::default(),
            sources: vec![
                SourceConfig::builtin(SourceKind::BrasilApi),
                SourceConfig::builtin(SourceKind::ViaCep),
            ],
            observability: ObservabilityConfig::default(),
        }
    }
}

impl RaceConfig {
    /// Sources that take part in the race.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }

    /// Enable only the named sources. Returns the names that match nothing.
    pub fn restrict_to(&mut self, names: &[String]) -> Vec<String> {
        let unknown = names
            .iter()
            .filter(|n| !self.sources.iter().any(|s| &s.name == *n))
            .cloned()
            .collect();
        for source in &mut self.sources {
            source.enabled = names.contains(&source.name);
        }
        unknown
    }
}

/// What the coordinator does when every source failed before the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AllFailedPolicy {
    /// Wait out the remaining deadline, then report a timeout.
    #[default]
    WaitForDeadline,
    /// Report every failure immediately.
    ShortCircuit,
}

/// Coordinator settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RaceSettings {
    /// Deadline for the whole race in milliseconds.
    pub global_timeout_ms: u64,

    /// Signal losing fetches to stop once a winner is picked.
    pub cancel_losers: bool,

    /// Behavior when all sources fail before the deadline.
    pub all_failed: AllFailedPolicy,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            global_timeout_ms: 1000,
            cancel_losers: true,
            all_failed: AllFailedPolicy::WaitForDeadline,
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent to every source.
    pub user_agent: String,

    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,

    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("cep-race/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_invalid_certs: true,
            connect_timeout_ms: 1000,
            system_proxy: true,
        }
    }
}

/// One address source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Unique source identifier, reported with the winning result.
    pub name: String,

    /// Response shape the source produces.
    pub kind: SourceKind,

    /// URL with a `{cep}` placeholder.
    #[serde(default)]
    pub url_template: Option<String>,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_source_timeout_ms")]
    pub timeout_ms: u64,

    /// Include this source in races (default: true).
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl SourceConfig {
    /// Source entry using the kind's public endpoint.
    pub fn builtin(kind: SourceKind) -> Self {
        Self {
            name: kind.default_name().to_string(),
            kind,
            url_template: None,
            timeout_ms: default_source_timeout_ms(),
            enabled: true,
        }
    }

    /// Configured template, falling back to the kind's default.
    pub fn template(&self) -> &str {
        self.url_template
            .as_deref()
            .unwrap_or_else(|| self.kind.default_url_template())
    }
}

fn default_source_timeout_ms() -> u64 {
    1000
}

fn default_enabled() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_races_both_services() {
        let config = RaceConfig::default();
        let kinds: Vec<_> = config.enabled_sources().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SourceKind::BrasilApi, SourceKind::ViaCep]);
        assert_eq!(config.race.global_timeout_ms, 1000);
        assert_eq!(config.race.all_failed, AllFailedPolicy::WaitForDeadline);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RaceConfig = toml::from_str(
            r#"
            [race]
            all_failed = "short_circuit"

            [[sources]]
            name = "local"
            kind = "via_cep"
            url_template = "http://127.0.0.1:9000/ws/{cep}/json"
            "#,
        )
        .unwrap();

        assert_eq!(config.race.all_failed, AllFailedPolicy::ShortCircuit);
        assert_eq!(config.race.global_timeout_ms, 1000);
        assert!(config.race.cancel_losers);
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].timeout_ms, 1000);
        assert!(config.sources[0].enabled);
        assert_eq!(config.sources[0].template(), "http://127.0.0.1:9000/ws/{cep}/json");
    }

    #[test]
    fn restrict_to_named_sources() {
        let mut config = RaceConfig::default();
        let unknown = config.restrict_to(&["viacep".to_string(), "correios".to_string()]);
        assert_eq!(unknown, vec!["correios".to_string()]);
        let names: Vec<_> = config.enabled_sources().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["viacep"]);
    }

    #[test]
    fn builtin_source_uses_kind_template() {
        let source = SourceConfig::builtin(SourceKind::ViaCep);
        assert_eq!(source.name, "viacep");
        assert_eq!(source.template(), "http://viacep.com.br/ws/{cep}/json");
    }
}
