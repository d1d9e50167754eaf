//! Human-readable rendering of race results.

use std::fmt;

use crate::race::RaceResult;
use crate::source::Address;

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary();
        write!(
            f,
            "{}: Address: CEP {}, State {}, City {}, Neighborhood {}, Street {}",
            self.kind().label(),
            s.cep,
            s.state,
            s.city,
            s.neighborhood,
            s.street
        )
    }
}

/// One line for stdout.
pub fn render(result: &RaceResult<Address>) -> String {
    match result {
        RaceResult::Won { payload, .. } => payload.to_string(),
        RaceResult::TimedOut => "Timeout".to_string(),
        RaceResult::AllFailed(failures) if failures.is_empty() => "All sources failed".to_string(),
        RaceResult::AllFailed(failures) => {
            let detail: Vec<String> = failures
                .iter()
                .map(|f| format!("{} ({})", f.source, f.error.kind()))
                .collect();
            format!("All sources failed: {}", detail.join(", "))
        }
    }
}
