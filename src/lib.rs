//! CEP lookup race library.
//!
//! Queries several address services for the same postal code at once and
//! keeps whichever answers first, bounded by a global deadline.
//!
//! ```text
//!  CEP ─▶ config ─▶ endpoints ─┬─▶ racer (brasilapi) ──┐
//!                              └─▶ racer (viacep) ─────┤  first Ok
//!                                                      ▼
//!                               deadline ─────▶ coordinator ─▶ RaceResult ─▶ render
//! ```

pub mod config;
pub mod fetch;
pub mod lookup;
pub mod observability;
pub mod race;
pub mod render;
pub mod source;

pub use config::RaceConfig;
pub use fetch::{FetchError, FetchOutcome, Fetcher, HttpFetcher};
pub use lookup::{lookup, LookupError};
pub use race::{race, RaceOptions, RaceResult};
pub use source::{Address, Cep, Endpoint, SourceId, SourceKind};
