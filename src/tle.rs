//! Two-Line Element (TLE) set decoding and encoding.
//!
//! Parses and renders the standard NORAD/Space-Track fixed-width layout.
//!
//! # TLE Format Reference
//! ```text
//! Line 0 (optional): Satellite Name (up to 24 chars)
//! Line 1: 1 NNNNNC NNNNNAAA NNNNN.NNNNNNNN +.NNNNNNNN +NNNNN-N +NNNNN-N N NNNNN
//! Line 2: 2 NNNNN NNN.NNNN NNN.NNNN NNNNNNN NNN.NNNN NNN.NNNN NN.NNNNNNNNNNNNNN
//! ```
//!
//! # Example
//! ```
//! use tle_bstar::tle::Tle;
//!
//! let line1 = "1 25544U 98067A   25278.49802050  .00011384  00000+0  20935-3 0  9990";
//! let line2 = "2 25544  51.6327 120.3420 0000884 206.2421 153.8523 15.49697304532279";
//!
//! let tle = Tle::parse(line1, line2).unwrap();
//! assert_eq!(tle.norad_id, 25544);
//!
//! let (out1, out2) = tle.to_lines();
//! assert_eq!(out1, line1);
//! assert_eq!(out2, line2);
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::constants::*;

/// Width of a complete TLE line, checksum included.
pub const LINE_LEN: usize = 69;

/// Shortest line accepted: everything up to the mean motion / ephemeris type column.
const MIN_LINE_LEN: usize = 63;

/// TLE parsing errors.
#[derive(Error, Debug)]
pub enum TleError {
    #[error("Line 1 must start with '1', got '{0}'")]
    InvalidLine1Start(char),

    #[error("Line 2 must start with '2', got '{0}'")]
    InvalidLine2Start(char),

    #[error("Line 1 must be at least 63 characters, got {0}")]
    InvalidLine1Length(usize),

    #[error("Line 2 must be at least 63 characters, got {0}")]
    InvalidLine2Length(usize),

    #[error("Line {0} contains non-ASCII characters")]
    NonAscii(u8),

    #[error("NORAD IDs don't match between lines: {0} vs {1}")]
    NoradIdMismatch(u32, u32),

    #[error("Checksum failed on line {line}: expected {expected}, computed {computed}")]
    ChecksumFailed {
        line: u8,
        expected: u8,
        computed: u8,
    },

    #[error("Failed to parse field '{field}': {source}")]
    ParseField {
        field: &'static str,
        source: std::num::ParseFloatError,
    },

    #[error("Failed to parse integer field '{field}': {source}")]
    ParseIntField {
        field: &'static str,
        source: std::num::ParseIntError,
    },

    #[error("Failed to parse implied-decimal field '{0}'")]
    ImpliedDecimal(String),

    #[error("Checksum column of line {line} holds '{found}', not a digit")]
    InvalidChecksumDigit { line: u8, found: char },
}

/// A parsed Two-Line Element set.
///
/// Fields keep the units printed in the TLE; the SGP4 internal units are
/// available through [`Tle::xno`] and [`Tle::xndt2o`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tle {
    /// NORAD catalog number.
    pub norad_id: u32,
    /// International designator (launch year, launch number, piece).
    pub intl_designator: String,
    /// Classification (U=unclassified, C=classified, S=secret).
    pub classification: char,
    /// Epoch year (full 4-digit year).
    pub epoch_year: u16,
    /// Epoch day of year (fractional).
    pub epoch_day: f64,
    /// First derivative of mean motion (rev/day²) / 2.
    pub mean_motion_dot: f64,
    /// Second derivative of mean motion (rev/day³) / 6.
    pub mean_motion_ddot: f64,
    /// B* drag term (1/Earth radii).
    pub bstar: f64,
    /// Ephemeris type (usually 0).
    pub ephemeris_type: u8,
    /// Element set number.
    pub element_set: u16,
    /// Inclination (degrees).
    pub inclination_deg: f64,
    /// Right ascension of ascending node (degrees).
    pub raan_deg: f64,
    /// Eccentricity (dimensionless).
    pub eccentricity: f64,
    /// Argument of perigee (degrees).
    pub arg_perigee_deg: f64,
    /// Mean anomaly (degrees).
    pub mean_anomaly_deg: f64,
    /// Mean motion (revolutions per day).
    pub mean_motion_rev_day: f64,
    /// Revolution number at epoch.
    pub rev_number: u32,
    /// Text of the provider-formatted fields as read.
    #[serde(skip)]
    source: Option<SourceFields>,
}

/// Raw columns whose spelling differs between catalogue providers
/// (`-0` vs `+0` exponents, zero-padded counters).
#[derive(Debug, Clone, PartialEq)]
struct SourceFields {
    mean_motion_dot: String,
    mean_motion_ddot: String,
    bstar: String,
    element_set: String,
    rev_number: String,
}

impl Tle {
    /// Parse a TLE, rejecting lines whose checksum digit doesn't match.
    pub fn parse(line1: &str, line2: &str) -> Result<Self, TleError> {
        Self::parse_fields(line1, line2, true)
    }

    /// Parse a TLE, logging checksum mismatches instead of failing on them.
    pub fn parse_lenient(line1: &str, line2: &str) -> Result<Self, TleError> {
        Self::parse_fields(line1, line2, false)
    }

    fn parse_fields(line1: &str, line2: &str, verify_checksums: bool) -> Result<Self, TleError> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();

        // Column slicing below needs single-byte characters
        if !line1.is_ascii() {
            return Err(TleError::NonAscii(1));
        }
        if !line2.is_ascii() {
            return Err(TleError::NonAscii(2));
        }
        if line1.len() < MIN_LINE_LEN {
            return Err(TleError::InvalidLine1Length(line1.len()));
        }
        if line2.len() < MIN_LINE_LEN {
            return Err(TleError::InvalidLine2Length(line2.len()));
        }

        // Pad so a missing element-set/rev/checksum tail reads as blanks
        let l1: String = format!("{:<w$.w$}", line1, w = LINE_LEN);
        let l2: String = format!("{:<w$.w$}", line2, w = LINE_LEN);

        // Validate line numbers
        let c1 = l1.as_bytes()[0] as char;
        let c2 = l2.as_bytes()[0] as char;
        if c1 != '1' {
            return Err(TleError::InvalidLine1Start(c1));
        }
        if c2 != '2' {
            return Err(TleError::InvalidLine2Start(c2));
        }

        verify_checksum(1, &l1, verify_checksums)?;
        verify_checksum(2, &l2, verify_checksums)?;

        // ── Parse Line 1 ──
        let norad_id_1 = l1[2..7].trim().parse::<u32>().map_err(|e| TleError::ParseIntField {
            field: "norad_id (line 1)",
            source: e,
        })?;

        let classification = l1.as_bytes()[7] as char;
        let intl_designator = l1[9..17].trim().to_string();

        let epoch_year_2d = l1[18..20].trim().parse::<u16>().map_err(|e| TleError::ParseIntField {
            field: "epoch_year",
            source: e,
        })?;
        let epoch_year = if epoch_year_2d >= 57 {
            1900 + epoch_year_2d
        } else {
            2000 + epoch_year_2d
        };

        let epoch_day = l1[20..32].trim().parse::<f64>().map_err(|e| TleError::ParseField {
            field: "epoch_day",
            source: e,
        })?;

        let mean_motion_dot = l1[33..43].trim().parse::<f64>().map_err(|e| TleError::ParseField {
            field: "mean_motion_dot",
            source: e,
        })?;

        let mean_motion_ddot = parse_implied_decimal(&l1[44..52])?;
        let bstar = parse_implied_decimal(&l1[53..61])?;

        let ephemeris_type = l1[62..63].trim().parse::<u8>().unwrap_or(0);
        let element_set = l1[64..68].trim().parse::<u16>().unwrap_or(0);

        // ── Parse Line 2 ──
        let norad_id_2 = l2[2..7].trim().parse::<u32>().map_err(|e| TleError::ParseIntField {
            field: "norad_id (line 2)",
            source: e,
        })?;

        if norad_id_1 != norad_id_2 {
            return Err(TleError::NoradIdMismatch(norad_id_1, norad_id_2));
        }

        let inclination_deg = l2[8..16].trim().parse::<f64>().map_err(|e| TleError::ParseField {
            field: "inclination",
            source: e,
        })?;

        let raan_deg = l2[17..25].trim().parse::<f64>().map_err(|e| TleError::ParseField {
            field: "raan",
            source: e,
        })?;

        // Eccentricity has implied leading decimal point
        let ecc_str = format!("0.{}", l2[26..33].trim());
        let eccentricity = ecc_str.parse::<f64>().map_err(|e| TleError::ParseField {
            field: "eccentricity",
            source: e,
        })?;

        let arg_perigee_deg = l2[34..42].trim().parse::<f64>().map_err(|e| TleError::ParseField {
            field: "arg_perigee",
            source: e,
        })?;

        let mean_anomaly_deg = l2[43..51].trim().parse::<f64>().map_err(|e| TleError::ParseField {
            field: "mean_anomaly",
            source: e,
        })?;

        let mean_motion_rev_day = l2[52..63].trim().parse::<f64>().map_err(|e| TleError::ParseField {
            field: "mean_motion",
            source: e,
        })?;

        let rev_number = l2[63..68].trim().parse::<u32>().unwrap_or(0);

        let source = SourceFields {
            mean_motion_dot: l1[33..43].to_string(),
            mean_motion_ddot: l1[44..52].to_string(),
            bstar: l1[53..61].to_string(),
            element_set: l1[64..68].to_string(),
            rev_number: l2[63..68].to_string(),
        };

        Ok(Tle {
            norad_id: norad_id_1,
            intl_designator,
            classification,
            epoch_year,
            epoch_day,
            mean_motion_dot,
            mean_motion_ddot,
            bstar,
            ephemeris_type,
            element_set,
            inclination_deg,
            raan_deg,
            eccentricity,
            arg_perigee_deg,
            mean_anomaly_deg,
            mean_motion_rev_day,
            rev_number,
            source: Some(source),
        })
    }

    /// Render both lines in the fixed-width layout, checksums recomputed.
    ///
    /// Fields still holding the value they were parsed from are written with
    /// their original text, so only changed fields are reformatted.
    pub fn to_lines(&self) -> (String, String) {
        let source = self.source.as_ref();
        let ndot = reuse_or(
            source.map(|s| s.mean_motion_dot.as_str()),
            self.mean_motion_dot,
            |s| s.trim().parse().ok(),
            format_rate,
        );
        let nddot = reuse_or(
            source.map(|s| s.mean_motion_ddot.as_str()),
            self.mean_motion_ddot,
            |s| parse_implied_decimal(s).ok(),
            format_implied_decimal,
        );
        let bstar = reuse_or(
            source.map(|s| s.bstar.as_str()),
            self.bstar,
            |s| parse_implied_decimal(s).ok(),
            format_implied_decimal,
        );
        let element_set = reuse_or(
            source.map(|s| s.element_set.as_str()),
            self.element_set,
            |s| Some(s.trim().parse().unwrap_or(0)),
            |n| format!("{:>4}", n % 10_000),
        );
        let rev_number = reuse_or(
            source.map(|s| s.rev_number.as_str()),
            self.rev_number,
            |s| Some(s.trim().parse().unwrap_or(0)),
            |n| format!("{:>5}", n % 100_000),
        );

        let intl: String = self.intl_designator.chars().take(8).collect();
        let mut line1 = format!(
            "1 {:05}{} {:<8} {:02}{:012.8} {} {} {} {} {}",
            self.norad_id % 100_000,
            self.classification,
            intl,
            self.epoch_year % 100,
            self.epoch_day,
            ndot,
            nddot,
            bstar,
            self.ephemeris_type % 10,
            element_set,
        );
        let ecc_digits = (self.eccentricity * 1e7).round().clamp(0.0, 9_999_999.0) as u32;
        let mut line2 = format!(
            "2 {:05} {:8.4} {:8.4} {:07} {:8.4} {:8.4} {:11.8}{}",
            self.norad_id % 100_000,
            self.inclination_deg,
            self.raan_deg,
            ecc_digits,
            self.arg_perigee_deg,
            self.mean_anomaly_deg,
            self.mean_motion_rev_day,
            rev_number,
        );
        push_checksum(&mut line1);
        push_checksum(&mut line2);
        (line1, line2)
    }

    /// Mean motion (rad/min), the SGP4 `xno`.
    pub fn xno(&self) -> f64 {
        self.mean_motion_rev_day * TAU / MINUTES_PER_DAY
    }

    /// Half the first derivative of mean motion (rad/min²), the SGP4 `xndt2o`.
    pub fn xndt2o(&self) -> f64 {
        self.mean_motion_dot * TAU / (MINUTES_PER_DAY * MINUTES_PER_DAY)
    }

    /// TLE epoch as a Julian date (UTC).
    pub fn epoch_jd(&self) -> f64 {
        JD_2000_JAN1 + days_since_j2000_jan1(self.epoch_year as i32) + self.epoch_day - 1.0
    }
}

/// `source` if it still parses to `value`, otherwise `value` formatted afresh.
fn reuse_or<T: PartialEq>(
    source: Option<&str>,
    value: T,
    parse: impl Fn(&str) -> Option<T>,
    format: impl Fn(T) -> String,
) -> String {
    match source {
        Some(text) if parse(text).as_ref() == Some(&value) => text.to_string(),
        _ => format(value),
    }
}

fn verify_checksum(line: u8, padded: &str, strict: bool) -> Result<(), TleError> {
    let digit = padded.as_bytes()[LINE_LEN - 1];
    let computed = compute_checksum(&padded[..LINE_LEN - 1]);
    let Some(expected) = checksum_digit(digit) else {
        if strict {
            return Err(TleError::InvalidChecksumDigit { line, found: digit as char });
        }
        warn!("line {line}: checksum column holds '{}', expected {computed}", digit as char);
        return Ok(());
    };
    if expected == computed {
        return Ok(());
    }
    if strict {
        return Err(TleError::ChecksumFailed { line, expected, computed });
    }
    if digit != b' ' {
        warn!("checksum mismatch on line {line}: expected {expected}, computed {computed}");
    }
    Ok(())
}

fn push_checksum(line: &mut String) {
    let digit = compute_checksum(line);
    line.push(char::from(b'0' + digit));
}

/// Parse the TLE "implied decimal" format: " NNNNN-N" → float.
///
/// Examples: " 16538-4" → 0.16538e-4, "-11606-4" → -0.11606e-4
fn parse_implied_decimal(s: &str) -> Result<f64, TleError> {
    let s = s.trim();
    if s.is_empty() || s == "00000-0" || s == "00000+0" {
        return Ok(0.0);
    }

    // Find the exponent sign (last + or - that isn't the leading sign)
    let bytes = s.as_bytes();
    let mut exp_pos = None;

    for i in (1..bytes.len()).rev() {
        if bytes[i] == b'+' || bytes[i] == b'-' {
            exp_pos = Some(i);
            break;
        }
    }

    match exp_pos {
        Some(pos) => {
            let mantissa_str = &s[..pos];
            let exp_str = &s[pos..];

            // Add implied leading "0."
            let sign = if mantissa_str.starts_with('-') { "-" } else { "" };
            let digits = mantissa_str.trim_start_matches(['+', '-', ' ']);

            let full = format!("{}0.{}e{}", sign, digits, exp_str);
            full.parse::<f64>()
                .map_err(|_| TleError::ImpliedDecimal(s.to_string()))
        }
        None => {
            // No exponent — try parsing with implied leading "0."
            let sign = if s.starts_with('-') { "-" } else { "" };
            let digits = s.trim_start_matches(['+', '-', ' ']);
            let full = format!("{}0.{}", sign, digits);
            full.parse::<f64>()
                .map_err(|_| TleError::ImpliedDecimal(s.to_string()))
        }
    }
}

/// Render an 8-column implied-decimal field: sign, 5-digit mantissa, signed exponent digit.
fn format_implied_decimal(value: f64) -> String {
    const ZERO: &str = " 00000+0";

    let magnitude = value.abs();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return ZERO.to_string();
    }
    let sign = if value < 0.0 { '-' } else { ' ' };

    let mut exponent = magnitude.log10().floor() as i32 + 1;
    let mut mantissa = (magnitude / 10f64.powi(exponent) * 1e5).round() as u32;
    if mantissa >= 100_000 {
        mantissa /= 10;
        exponent += 1;
    }
    if exponent < -9 {
        return ZERO.to_string();
    }
    if exponent > 9 {
        mantissa = 99_999;
        exponent = 9;
    }
    let exp_sign = if exponent < 0 { '-' } else { '+' };
    format!("{sign}{mantissa:05}{exp_sign}{}", exponent.abs())
}

/// Render the 10-column first-derivative field: sign then `.NNNNNNNN`.
fn format_rate(value: f64) -> String {
    let sign = if value < 0.0 { '-' } else { ' ' };
    let digits = format!("{:.8}", value.abs().min(0.999_999_99));
    let digits = digits.strip_prefix('0').unwrap_or(&digits);
    format!("{sign}{digits}")
}

/// Value of a checksum column: a digit, or 0 for a blank (truncated) column.
fn checksum_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b' ' => Some(0),
        _ => None,
    }
}

/// Compute TLE checksum (mod-10 of sum of digits, '-' counts as 1).
fn compute_checksum(line: &str) -> u8 {
    let sum: u32 = line
        .bytes()
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}

/// Days from 2000-01-01 to January 1 of the given year.
fn days_since_j2000_jan1(year: i32) -> f64 {
    let y = year - 2000;
    let leap_days = if y > 0 {
        (y - 1) / 4 - (y - 1) / 100 + (y - 1) / 400 + 1
    } else if y < 0 {
        y / 4 - y / 100 + y / 400
    } else {
        0
    };
    (y * 365 + leap_days) as f64
}
