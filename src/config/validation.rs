//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check source templates produce usable URLs
//! - Detect duplicate source names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RaceConfig → Result<(), Vec<ValidationError>>
//! - Legal but unusual settings are returned as warnings, not rejected;
//!   the caller logs them once its subscriber is installed

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::config::schema::RaceConfig;
use crate::source::CEP_PLACEHOLDER;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no enabled sources")]
    NoSources,

    #[error("duplicate source name '{0}'")]
    DuplicateSource(String),

    #[error("source #{0} has an empty name")]
    EmptyName(usize),

    #[error("source '{0}' has a zero timeout")]
    ZeroSourceTimeout(String),

    #[error("race.global_timeout_ms must be greater than zero")]
    ZeroGlobalTimeout,

    #[error("source '{name}' url template {reason}")]
    BadTemplate { name: String, reason: String },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// A legal setting that will not behave the way it reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error(
        "source '{name}' timeout ({timeout_ms}ms) exceeds the race deadline \
         ({global_timeout_ms}ms); the race will time out first"
    )]
    SourceTimeoutExceedsDeadline {
        name: String,
        timeout_ms: u64,
        global_timeout_ms: u64,
    },
}

/// All validation failures of one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &RaceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.race.global_timeout_ms == 0 {
        errors.push(ValidationError::ZeroGlobalTimeout);
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for (idx, source) in config.sources.iter().enumerate() {
        if source.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName(idx));
            continue;
        }
        if !seen.insert(source.name.as_str()) {
            errors.push(ValidationError::DuplicateSource(source.name.clone()));
        }
        if source.timeout_ms == 0 {
            errors.push(ValidationError::ZeroSourceTimeout(source.name.clone()));
        }
        if let Some(reason) = template_problem(source.template()) {
            errors.push(ValidationError::BadTemplate {
                name: source.name.clone(),
                reason,
            });
        }
    }

    if config.enabled_sources().next().is_none() {
        errors.push(ValidationError::NoSources);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Settings that pass validation but deserve a warning.
pub fn config_warnings(config: &RaceConfig) -> Vec<ValidationWarning> {
    config
        .enabled_sources()
        .filter(|source| source.timeout_ms > config.race.global_timeout_ms)
        .map(|source| ValidationWarning::SourceTimeoutExceedsDeadline {
            name: source.name.clone(),
            timeout_ms: source.timeout_ms,
            global_timeout_ms: config.race.global_timeout_ms,
        })
        .collect()
}

pub fn log_warnings(warnings: &[ValidationWarning]) {
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
}

fn template_problem(template: &str) -> Option<String> {
    if !template.contains(CEP_PLACEHOLDER) {
        return Some(format!("is missing the {} placeholder", CEP_PLACEHOLDER));
    }
    match url::Url::parse(&template.replace(CEP_PLACEHOLDER, "00000000")) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => None,
        Ok(url) => Some(format!("has unsupported scheme '{}'", url.scheme())),
        Err(e) => Some(format!("is not a valid URL: {}", e)),
    }
}
