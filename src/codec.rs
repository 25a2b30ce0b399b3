//! Capabilities the pipeline is generic over.
//!
//! Decoding/encoding of element sets and propagator initialisation are
//! injected, so the pipeline can be driven with fakes that return controlled
//! coefficients or controlled decode failures.

use crate::sgp4::PropagationParams;
use crate::tle::{Tle, TleError};

/// Converts between TLE text and structured elements.
pub trait ElementCodec {
    /// Decode a line-1/line-2 pair. An `Err` makes the pipeline skip the record.
    fn decode(&self, line1: &str, line2: &str) -> Result<Tle, TleError>;

    /// Render elements back into line 1 and line 2, without terminators.
    fn encode(&self, tle: &Tle) -> (String, String);
}

/// Derives the propagator's initialisation coefficients from an element set.
pub trait PropagatorInit {
    fn init(&self, tle: &Tle) -> PropagationParams;
}

/// The fixed-width TLE codec.
///
/// Lenient by default: checksum mismatches are logged and the record is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct TleCodec {
    verify_checksums: bool,
}

impl TleCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec that rejects records with a bad checksum digit.
    pub fn strict() -> Self {
        Self { verify_checksums: true }
    }
}

impl ElementCodec for TleCodec {
    fn decode(&self, line1: &str, line2: &str) -> Result<Tle, TleError> {
        if self.verify_checksums {
            Tle::parse(line1, line2)
        } else {
            Tle::parse_lenient(line1, line2)
        }
    }

    fn encode(&self, tle: &Tle) -> (String, String) {
        tle.to_lines()
    }
}
