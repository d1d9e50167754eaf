//! HTTP fetcher for the address services.
//!
//! # Responsibilities
//! - Issue one GET per endpoint with the endpoint's deadline
//! - Treat non-success statuses as failures
//! - Decode the body into the endpoint's source shape

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::config::schema::HttpConfig;
use crate::fetch::{FetchError, FetchOutcome, Fetcher};
use crate::source::{Address, Endpoint};

/// Fetcher backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    connect_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let connect_timeout = Duration::from_millis(config.connect_timeout_ms);
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .connect_timeout(connect_timeout);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        if config.accept_invalid_certs {
            tracing::debug!("TLS certificate verification disabled for address sources");
        }

        Ok(Self {
            client,
            connect_timeout,
        })
    }

    async fn request(&self, endpoint: &Endpoint) -> FetchOutcome<Address> {
        let response = self
            .client
            .get(endpoint.url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e, endpoint))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify(e, endpoint))?;
        endpoint.kind.decode(&body).map_err(FetchError::Decode)
    }

    fn classify(&self, err: reqwest::Error, endpoint: &Endpoint) -> FetchError {
        if err.is_timeout() {
            timeout_error(err.is_connect(), self.connect_timeout, endpoint.timeout)
        } else {
            FetchError::Transport(err)
        }
    }
}

/// A reqwest timeout while connecting belongs to the client's connect
/// deadline; any other to the endpoint's request deadline.
fn timeout_error(during_connect: bool, connect: Duration, request: Duration) -> FetchError {
    if during_connect {
        FetchError::ConnectTimeout(connect)
    } else {
        FetchError::Timeout(request)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    type Payload = Address;

    async fn fetch(&self, endpoint: &Endpoint) -> FetchOutcome<Address> {
        tracing::debug!(source = %endpoint.source, url = %endpoint.url, "Fetching");

        match timeout(endpoint.timeout, self.request(endpoint)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Timeout(endpoint.timeout)),
        }
    }
}
