//! # tle-bstar
//!
//! Reads catalogues of Two-Line Element sets, selects records by NORAD
//! catalog number and/or international designator, replaces each record's
//! B* drag term with one back-solved from its mean-motion decay rate
//! (Ted Molczan's method) and writes the records back out, optionally with
//! perigee, apogee, period and epoch.
//!
//! Element decoding/encoding and propagator initialisation are injected
//! through [`codec::ElementCodec`] and [`codec::PropagatorInit`];
//! [`codec::TleCodec`] and [`sgp4::Sgp4Init`] are the stock implementations.

pub mod constants;
pub mod tle;
pub mod codec;
pub mod sgp4;
pub mod window;
pub mod filter;
pub mod bstar;
pub mod metrics;
pub mod pipeline;

pub use codec::{ElementCodec, PropagatorInit, TleCodec};
pub use filter::{FieldFilter, RecordFilter};
pub use pipeline::{ProcessConfig, ProcessError, Processor, RunSummary};
pub use sgp4::{PropagationParams, Sgp4Init};
pub use tle::{Tle, TleError};
