//! Record selection, B* derivation and re-emission over a whole catalogue.

use std::io::{self, BufRead, Write};

use log::{debug, info, warn};
use thiserror::Error;

use crate::bstar::derive_bstar;
use crate::codec::{ElementCodec, PropagatorInit, TleCodec};
use crate::filter::RecordFilter;
use crate::metrics::OrbitMetrics;
use crate::sgp4::Sgp4Init;
use crate::tle::Tle;
use crate::window::{FramerError, LineWindow};

/// Longest line still treated as a satellite name rather than element data.
pub const MAX_TITLE_LEN: usize = 59;

/// Column legend printed once ahead of the first record in verbose mode.
pub const LEGEND: &str = "\
1 NoradU COSPAR   Epoch.epoch     dn/dt/2  d2n/dt2/6 BSTAR    T El# C
2 NoradU Inclina RAAscNode Eccent  ArgPeri MeanAno  MeanMotion Rev# C
";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Input(#[from] FramerError),

    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// What to select and how much to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessConfig {
    /// Print the legend and per-record orbit metrics.
    pub verbose: bool,
    pub filter: RecordFilter,
}

/// Counters for one pass over a catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines consumed from the input.
    pub lines_read: usize,
    /// Line pairs with '1'/'2' markers that passed the filters.
    pub candidates: usize,
    /// Records written to the output.
    pub emitted: usize,
    /// Candidates dropped because they failed to decode.
    pub skipped: usize,
    /// Emitted records whose B* was replaced by the derived value.
    pub derived: usize,
    /// The input ended on a read error instead of end of stream.
    pub truncated: bool,
}

/// Runs the select → decode → derive → encode → emit pipeline.
pub struct Processor<C, P> {
    codec: C,
    init: P,
    config: ProcessConfig,
}

impl Default for Processor<TleCodec, Sgp4Init> {
    fn default() -> Self {
        Self::new(TleCodec::default(), Sgp4Init)
    }
}

impl<C: ElementCodec, P: PropagatorInit> Processor<C, P> {
    pub fn new(codec: C, init: P) -> Self {
        Self {
            codec,
            init,
            config: ProcessConfig::default(),
        }
    }

    /// Set selection and verbosity.
    pub fn with_config(mut self, config: ProcessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Process every record of `input`, writing the results to `out`.
    ///
    /// Records that fail to decode are skipped and counted. A read error
    /// ends the input like end of stream and sets [`RunSummary::truncated`].
    /// Only over-long lines and output errors abort the run.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut out: W) -> Result<RunSummary, ProcessError> {
        let mut window = LineWindow::new(input);
        let mut summary = RunSummary::default();
        let mut legend_shown = false;

        while window.advance()? {
            let Some(frame) = window.frame() else {
                continue;
            };
            if !self.config.filter.matches(frame.line1, frame.line2) {
                continue;
            }
            summary.candidates += 1;

            let Some(mut tle) = self.decode(frame.line1, frame.line2, window.lines_read()) else {
                summary.skipped += 1;
                continue;
            };

            if self.config.verbose && !legend_shown {
                out.write_all(LEGEND.as_bytes()).map_err(ProcessError::Output)?;
                legend_shown = true;
            }

            let params = self.init.init(&tle);
            if derive_bstar(&mut tle, &params).is_some() {
                summary.derived += 1;
            }

            self.emit(&mut out, frame.title, &tle).map_err(ProcessError::Output)?;
            summary.emitted += 1;
        }

        summary.lines_read = window.lines_read();
        summary.truncated = window.read_failed();
        if summary.lines_read < 2 {
            warn!("Couldn't read from input file: fewer than two lines");
        }
        out.flush().map_err(ProcessError::Output)?;

        info!(
            "{} lines, {} candidates, {} emitted ({} with derived B*), {} skipped",
            summary.lines_read, summary.candidates, summary.emitted, summary.derived, summary.skipped
        );
        Ok(summary)
    }

    fn decode(&self, line1: &[u8], line2: &[u8], line_number: usize) -> Option<Tle> {
        let (Ok(line1), Ok(line2)) = (std::str::from_utf8(line1), std::str::from_utf8(line2)) else {
            debug!("line {line_number}: skipping record with non-UTF-8 bytes");
            return None;
        };
        match self.codec.decode(line1, line2) {
            Ok(tle) => Some(tle),
            Err(e) => {
                debug!("line {line_number}: skipping record: {e}");
                None
            }
        }
    }

    fn emit<W: Write>(&self, out: &mut W, title: Option<&[u8]>, tle: &Tle) -> io::Result<()> {
        if let Some(title) = title.filter(|t| t.len() <= MAX_TITLE_LEN) {
            out.write_all(title)?;
            out.write_all(b"\n")?;
        }
        let (line1, line2) = self.codec.encode(tle);
        writeln!(out, "{line1}")?;
        writeln!(out, "{line2}")?;
        if self.config.verbose {
            write!(out, "{}", OrbitMetrics::from_tle(tle))?;
        }
        Ok(())
    }
}
