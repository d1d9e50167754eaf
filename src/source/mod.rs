//! Address sources.
//!
//! # Responsibilities
//! - Name the sources that can take part in a race
//! - Decode each source's JSON shape into an [`Address`]
//! - Build immutable [`Endpoint`] descriptors for one CEP
//!
//! # Design Decisions
//! - Shapes stay source-specific; the race never looks inside them
//! - Missing JSON fields decode to empty strings
//! - Rendering only uses the common [`AddressSummary`] projection

pub mod brasil_api;
pub mod cep;
pub mod via_cep;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::SourceConfig;

pub use brasil_api::BrasilApiAddress;
pub use cep::{Cep, CepError};
pub use via_cep::ViaCepAddress;

/// Placeholder substituted with the CEP in URL templates.
pub const CEP_PLACEHOLDER: &str = "{cep}";

/// Response shape of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    BrasilApi,
    ViaCep,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::BrasilApi => "Brasil API",
            SourceKind::ViaCep => "VIA CEP",
        }
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            SourceKind::BrasilApi => "brasilapi",
            SourceKind::ViaCep => "viacep",
        }
    }

    pub fn default_url_template(&self) -> &'static str {
        match self {
            SourceKind::BrasilApi => "https://brasilapi.com.br/api/cep/v1/{cep}",
            SourceKind::ViaCep => "http://viacep.com.br/ws/{cep}/json",
        }
    }

    /// Decode a response body into this kind's shape.
    pub fn decode(&self, body: &[u8]) -> Result<Address, serde_json::Error> {
        match self {
            SourceKind::BrasilApi => serde_json::from_slice(body).map(Address::BrasilApi),
            SourceKind::ViaCep => serde_json::from_slice(body).map(Address::ViaCep),
        }
    }
}

/// Tag identifying which source produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId(Arc<str>);

impl SourceId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded address from one of the sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    BrasilApi(BrasilApiAddress),
    ViaCep(ViaCepAddress),
}

impl Address {
    pub fn kind(&self) -> SourceKind {
        match self {
            Address::BrasilApi(_) => SourceKind::BrasilApi,
            Address::ViaCep(_) => SourceKind::ViaCep,
        }
    }

    pub fn summary(&self) -> AddressSummary<'_> {
        match self {
            Address::BrasilApi(a) => a.summary(),
            Address::ViaCep(a) => a.summary(),
        }
    }
}

/// Fields shared by every source, borrowed from the decoded shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSummary<'a> {
    pub cep: &'a str,
    pub state: &'a str,
    pub city: &'a str,
    pub neighborhood: &'a str,
    pub street: &'a str,
}

/// Immutable descriptor of one request: who to ask, where, and how long to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub source: SourceId,
    pub kind: SourceKind,
    pub url: Url,
    pub timeout: Duration,
}

impl Endpoint {
    /// Build an endpoint by substituting the CEP into a URL template.
    pub fn from_template(
        source: SourceId,
        kind: SourceKind,
        template: &str,
        cep: &Cep,
        timeout: Duration,
    ) -> Result<Self, url::ParseError> {
        let url = Url::parse(&template.replace(CEP_PLACEHOLDER, cep.as_str()))?;
        Ok(Self {
            source,
            kind,
            url,
            timeout,
        })
    }

    pub fn from_config(config: &SourceConfig, cep: &Cep) -> Result<Self, url::ParseError> {
        Self::from_template(
            SourceId::new(&config.name),
            config.kind,
            config.template(),
            cep,
            Duration::from_millis(config.timeout_ms),
        )
    }
}
