//! cep-race: look up a Brazilian postal code on several services at once.
//!
//! The first service to answer wins; the others are cancelled. If nobody
//! answers before the deadline the result is `Timeout`.
//!
//! # Exit codes
//! - 0: a result was printed (including `Timeout`, unless `--strict`)
//! - 1: `--strict` and no source won
//! - 2: bad input or configuration

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cep_race::config::loader::{read_config, validate};
use cep_race::config::validation::{config_warnings, log_warnings, ValidationWarning};
use cep_race::config::{AllFailedPolicy, LogFormat};
use cep_race::observability::logging::init_logging;
use cep_race::{lookup, render, Cep, RaceConfig, RaceResult};

const EXIT_NO_WINNER: u8 = 1;
const EXIT_BAD_INPUT: u8 = 2;

#[derive(Parser)]
#[command(name = "cep-race")]
#[command(about = "Race address lookup services for a CEP and print the fastest answer", long_about = None)]
#[command(version)]
struct Cli {
    /// Postal code, `NNNNNNNN` or `NNNNN-NNN`
    #[arg(default_value = "79021210")]
    cep: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Race deadline in milliseconds
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Only race these sources (repeatable)
    #[arg(short, long = "source")]
    sources: Vec<String>,

    /// Report immediately when every source failed instead of waiting for the deadline
    #[arg(long)]
    short_circuit: bool,

    /// Let losing requests run to completion
    #[arg(long)]
    no_cancel: bool,

    /// Exit with status 1 when no source wins
    #[arg(long)]
    strict: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn apply(&self, config: &mut RaceConfig) -> Result<(), String> {
        if let Some(ms) = self.timeout_ms {
            config.race.global_timeout_ms = ms;
        }
        if self.short_circuit {
            config.race.all_failed = AllFailedPolicy::ShortCircuit;
        }
        if self.no_cancel {
            config.race.cancel_losers = false;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if self.json_logs {
            config.observability.log_format = LogFormat::Json;
        }
        if !self.sources.is_empty() {
            let unknown = config.restrict_to(&self.sources);
            if !unknown.is_empty() {
                return Err(format!("unknown source(s): {}", unknown.join(", ")));
            }
        }
        Ok(())
    }
}

/// Everything `run` needs, checked before any request is made.
struct Prepared {
    cep: Cep,
    config: RaceConfig,
    warnings: Vec<ValidationWarning>,
}

/// Parse the CEP, load the file, apply flags, then validate the result.
fn prepare(cli: &Cli) -> Result<Prepared, Box<dyn Error>> {
    let cep: Cep = cli.cep.parse()?;

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => RaceConfig::default(),
    };
    cli.apply(&mut config)?;
    validate(&config)?;

    let warnings = config_warnings(&config);
    Ok(Prepared {
        cep,
        config,
        warnings,
    })
}

fn exit_code<T>(result: &RaceResult<T>, strict: bool) -> u8 {
    if strict && !result.is_won() {
        EXIT_NO_WINNER
    } else {
        0
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("cep-race: {}", e);
            ExitCode::from(EXIT_BAD_INPUT)
        }
    }
}

async fn run(cli: Cli) -> Result<u8, Box<dyn Error>> {
    let Prepared {
        cep,
        config,
        warnings,
    } = prepare(&cli)?;

    init_logging(&config.observability.log_level, config.observability.log_format)?;
    log_warnings(&warnings);

    tracing::debug!(
        global_timeout_ms = config.race.global_timeout_ms,
        cancel_losers = config.race.cancel_losers,
        all_failed = ?config.race.all_failed,
        "Configuration loaded"
    );

    let result = lookup(&config, &cep).await?;
    println!("{}", render::render(&result));

    Ok(exit_code(&result, cli.strict))
}
