//! CEP lookup: configuration in, rendered race out.

use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;

use crate::config::RaceConfig;
use crate::fetch::HttpFetcher;
use crate::race::{race, RaceOptions, RaceResult};
use crate::source::{Address, Cep, Endpoint};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("source '{source_name}' produced an invalid URL: {error}")]
    Endpoint {
        source_name: String,
        #[source]
        error: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Endpoint descriptors for every enabled source.
pub fn endpoints(config: &RaceConfig, cep: &Cep) -> Result<Vec<Endpoint>, LookupError> {
    config
        .enabled_sources()
        .map(|source| {
            Endpoint::from_config(source, cep).map_err(|error| LookupError::Endpoint {
                source_name: source.name.clone(),
                error,
            })
        })
        .collect()
}

/// Race every enabled source for `cep` over HTTP.
///
/// Runs inside a `lookup` span carrying the CEP, so the race span and every
/// racer event beneath it can be traced back to the code being looked up.
pub async fn lookup(config: &RaceConfig, cep: &Cep) -> Result<RaceResult<Address>, LookupError> {
    let span = tracing::info_span!("lookup", cep = %cep);
    async {
        let endpoints = endpoints(config, cep)?;
        let fetcher = Arc::new(HttpFetcher::new(&config.http)?);
        tracing::info!(sources = endpoints.len(), "Starting lookup");
        Ok::<_, LookupError>(race(fetcher, endpoints, &RaceOptions::from(&config.race)).await)
    }
    .instrument(span)
    .await
}
