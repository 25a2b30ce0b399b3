//! Selection of candidate line pairs by catalog number and international designator.

use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// Width of both filterable fields.
pub const FIELD_WIDTH: usize = 5;

/// Columns of the catalog number in line 1.
pub const NORAD_COLUMNS: Range<usize> = 2..7;

/// Columns of the launch year + launch number part of the international designator in line 1.
pub const INTL_COLUMNS: Range<usize> = 9..14;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("{field} filter '{value}' must be exactly 5 bytes, got {len}", len = .value.len())]
    InvalidLength { field: &'static str, value: String },
}

/// A fixed-width field value to compare byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFilter([u8; FIELD_WIDTH]);

impl FieldFilter {
    /// Catalog-number filter, e.g. `"25544"`.
    pub fn norad(value: &str) -> Result<Self, FilterError> {
        Self::new("NORAD", value)
    }

    /// International-designator filter, e.g. `"98067"`.
    pub fn intl(value: &str) -> Result<Self, FilterError> {
        Self::new("international ID", value)
    }

    fn new(field: &'static str, value: &str) -> Result<Self, FilterError> {
        let bytes: [u8; FIELD_WIDTH] = value.as_bytes().try_into().map_err(|_| FilterError::InvalidLength {
            field,
            value: value.to_string(),
        })?;
        Ok(Self(bytes))
    }

    fn matches(&self, line: &[u8], columns: Range<usize>) -> bool {
        line.get(columns).is_some_and(|field| field == self.0.as_slice())
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Both optional filters; an absent filter matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub norad: Option<FieldFilter>,
    pub intl: Option<FieldFilter>,
}

impl RecordFilter {
    pub fn new(norad: Option<FieldFilter>, intl: Option<FieldFilter>) -> Self {
        Self { norad, intl }
    }

    /// True if `line1`/`line2` carry the '1'/'2' line markers and pass every set filter.
    pub fn matches(&self, line1: &[u8], line2: &[u8]) -> bool {
        line1.first() == Some(&b'1')
            && line2.first() == Some(&b'2')
            && self.norad.map_or(true, |f| f.matches(line1, NORAD_COLUMNS))
            && self.intl.map_or(true, |f| f.matches(line1, INTL_COLUMNS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_LINE1: &[u8] = b"1 25544U 98067A   25278.49802050  .00011384  00000+0  20935-3 0  9990";
    const ISS_LINE2: &[u8] = b"2 25544  51.6327 120.3420 0000884 206.2421 153.8523 15.49697304532279";

    #[test]
    fn test_no_filters_checks_line_markers_only() {
        let filter = RecordFilter::default();
        assert!(filter.matches(ISS_LINE1, ISS_LINE2));
        assert!(!filter.matches(ISS_LINE2, ISS_LINE1));
        assert!(!filter.matches(b"ISS (ZARYA)", ISS_LINE1));
        assert!(!filter.matches(b"", b""));
    }

    #[test]
    fn test_norad_filter() {
        let hit = RecordFilter::new(Some(FieldFilter::norad("25544").unwrap()), None);
        let miss = RecordFilter::new(Some(FieldFilter::norad("20580").unwrap()), None);
        assert!(hit.matches(ISS_LINE1, ISS_LINE2));
        assert!(!miss.matches(ISS_LINE1, ISS_LINE2));
    }

    #[test]
    fn test_intl_filter() {
        let hit = RecordFilter::new(None, Some(FieldFilter::intl("98067").unwrap()));
        let miss = RecordFilter::new(None, Some(FieldFilter::intl("90037").unwrap()));
        assert!(hit.matches(ISS_LINE1, ISS_LINE2));
        assert!(!miss.matches(ISS_LINE1, ISS_LINE2));
    }

    #[test]
    fn test_filters_combine() {
        let norad = FieldFilter::norad("25544").unwrap();
        let wrong_intl = FieldFilter::intl("90037").unwrap();
        assert!(!RecordFilter::new(Some(norad), Some(wrong_intl)).matches(ISS_LINE1, ISS_LINE2));
    }

    #[test]
    fn test_short_line_does_not_match() {
        let filter = RecordFilter::new(Some(FieldFilter::norad("25544").unwrap()), None);
        assert!(!filter.matches(b"1 255", ISS_LINE2));
    }

    #[test]
    fn test_rejects_wrong_width() {
        assert_eq!(
            FieldFilter::norad("5"),
            Err(FilterError::InvalidLength { field: "NORAD", value: "5".into() })
        );
        assert!(FieldFilter::intl("98067A").is_err());
        assert_eq!(FieldFilter::intl("98067").unwrap().to_string(), "98067");
    }
}
