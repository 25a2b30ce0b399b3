//! Add B* to TLEs using Ted Molczan's method.
//!
//! Reads TLEs, computes B* where possible and writes out the resulting
//! modified TLEs. With `-v` it also writes the orbital period, the
//! perigee/apogee heights and the epoch of each record.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::{ContextKind, ErrorKind};
use clap::Parser;
use log::{info, warn};

use tle_bstar::{FieldFilter, ProcessConfig, Processor, RecordFilter};

/// Process status for fatal errors (-1 as seen by the shell)
const EXIT_FATAL: u8 = 255;

#[derive(Parser, Debug)]
#[command(name = "tle-bstar", about = "Add BSTAR to TLEs using Ted Molczan's method")]
struct Cli {
    /// TLE catalogue to read
    #[arg(default_value = "all_tle.txt")]
    input: PathBuf,

    /// Also print perigee, apogee, orbital period and epoch
    #[arg(short = 'v')]
    verbose: bool,

    /// Only process this 5-digit NORAD catalog number
    #[arg(short = 'n', value_name = "NORAD")]
    norad: Option<String>,

    /// Only process this 5-character international designator (e.g. 98067)
    #[arg(short = 'i', value_name = "INTL")]
    intl: Option<String>,

    /// Further non-option arguments are accepted and ignored
    #[arg(hide = true)]
    extra: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_usage_error(err),
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn report_usage_error(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::UnknownArgument => {
            let arg = err
                .get(ContextKind::InvalidArg)
                .map(ToString::to_string)
                .unwrap_or_default();
            println!("'{arg}': unrecognized option");
            ExitCode::from(EXIT_FATAL)
        }
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => {
            eprintln!("{err}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    for arg in &cli.extra {
        warn!("ignoring extra argument '{arg}'");
    }
    let norad = cli.norad.as_deref().map(FieldFilter::norad).transpose()?;
    let intl = cli.intl.as_deref().map(FieldFilter::intl).transpose()?;
    if let Some(norad) = norad {
        println!("Looking for NORAD {norad}");
    }
    if let Some(intl) = intl {
        println!("Looking for international ID {intl}");
    }

    let file = File::open(&cli.input)
        .with_context(|| format!("Couldn't open '{}'", cli.input.display()))?;

    let processor = Processor::default().with_config(ProcessConfig {
        verbose: cli.verbose,
        filter: RecordFilter::new(norad, intl),
    });
    let stdout = io::stdout();
    let summary = processor
        .run(BufReader::new(file), BufWriter::new(stdout.lock()))
        .with_context(|| format!("Error while processing '{}'", cli.input.display()))?;

    info!(
        "{}: {} of {} selected records written",
        cli.input.display(),
        summary.emitted,
        summary.candidates
    );
    Ok(())
}
