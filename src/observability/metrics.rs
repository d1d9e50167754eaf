//! Metrics collection.
//!
//! # Metrics
//! - `cep_race_fetch_total` (counter): fetch outcomes by source, outcome
//! - `cep_race_fetch_duration_seconds` (histogram): fetch latency by source
//! - `cep_race_result_total` (counter): race results by result
//! - `cep_race_duration_seconds` (histogram): time to decide a race

use std::time::Duration;

use ::metrics::{counter, histogram};

use crate::source::SourceId;

/// Record one racer's outcome (`success`, a `FetchError` kind, or `cancelled`).
pub fn record_fetch(source: &SourceId, outcome: &'static str, elapsed: Duration) {
    let source = source.as_str().to_string();
    counter!("cep_race_fetch_total", "source" => source.clone(), "outcome" => outcome)
        .increment(1);
    histogram!("cep_race_fetch_duration_seconds", "source" => source)
        .record(elapsed.as_secs_f64());
}

/// Record a decided race.
pub fn record_race(result: &'static str, elapsed: Duration) {
    counter!("cep_race_result_total", "result" => result).increment(1);
    histogram!("cep_race_duration_seconds").record(elapsed.as_secs_f64());
}
