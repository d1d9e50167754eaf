//! Fetch subsystem.
//!
//! # Data Flow
//! ```text
//! Endpoint (source, url, timeout)
//!     → Fetcher::fetch (one bounded request, no retries)
//!     → FetchOutcome: Ok(payload) | Err(FetchError)
//!     → consumed once by the race coordinator
//! ```
//!
//! # Design Decisions
//! - Every failure is returned as data; a fetch never aborts the process
//! - The per-request timeout is distinct from the race deadline
//! - Payload type is chosen by the fetcher, the coordinator stays generic

pub mod http;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::source::Endpoint;

pub use http::HttpFetcher;

/// Result of one fetch.
pub type FetchOutcome<T> = Result<T, FetchError>;

/// Why a fetch produced no payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or request construction failed.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The per-request deadline elapsed.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The client's connect deadline elapsed before a connection was made.
    #[error("connect timed out after {}ms", .0.as_millis())]
    ConnectTimeout(Duration),

    /// The source answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The body did not match the source's shape.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The fetch task ended without producing an outcome (panic or abort).
    #[error("fetch task failed: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Timeout(_) | FetchError::ConnectTimeout(_) => "timeout",
            FetchError::Status(_) => "status",
            FetchError::Decode(_) => "decode",
            FetchError::Aborted(_) => "aborted",
        }
    }
}

/// Performs one bounded request against one endpoint.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    type Payload: Send + 'static;

    async fn fetch(&self, endpoint: &Endpoint) -> FetchOutcome<Self::Payload>;
}
