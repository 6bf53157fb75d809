//! Reader for Earth orientation tables stored as headered CSV.
//!
//! Expected header (column order is free, extra columns are ignored):
//!
//! ```text
//! mjd,ut1_minus_utc,polar_motion_x,polar_motion_y
//! 41684.0,0.8084178,0.120733,0.136966
//! ```
//!
//! Lines starting with `#` are comments, whitespace around fields is trimmed.

use std::io::Read;

use camino::Utf8Path;
use csv::{ReaderBuilder, Trim};

use super::{EopDataError, EopRecord};

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.trim(Trim::All).comment(Some(b'#'));
    builder
}

fn collect_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<EopRecord>, EopDataError> {
    reader
        .deserialize::<EopRecord>()
        .map(|row| row.map_err(EopDataError::from))
        .collect()
}

/// Read a CSV Earth orientation file.
pub fn read_csv(path: &Utf8Path) -> Result<Vec<EopRecord>, EopDataError> {
    let file = std::fs::File::open(path).map_err(|source| EopDataError::Io {
        path: path.to_owned(),
        source,
    })?;
    collect_records(reader_builder().from_reader(file))
}

/// Parse CSV Earth orientation data held in memory.
pub fn parse_csv(content: &str) -> Result<Vec<EopRecord>, EopDataError> {
    collect_records(reader_builder().from_reader(content.as_bytes()))
}

#[cfg(test)]
mod csv_reader_test {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let content = "\
# IERS C04 extract
mjd, ut1_minus_utc, polar_motion_x, polar_motion_y, source
41684.0, 0.8084178, 0.120733, 0.136966, C04
41685.0, 0.8057000, 0.121000, 0.136500, C04
";
        let records = parse_csv(content).unwrap();
        assert_eq!(
            records,
            vec![
                EopRecord::new(41684.0, 0.8084178, 0.120733, 0.136966),
                EopRecord::new(41685.0, 0.8057, 0.121, 0.1365),
            ]
        );
    }

    #[test]
    fn test_reordered_columns() {
        let content = "polar_motion_y,polar_motion_x,mjd,ut1_minus_utc\n0.2,0.1,50000,-0.3\n";
        let records = parse_csv(content).unwrap();
        assert_eq!(records, vec![EopRecord::new(50000.0, -0.3, 0.1, 0.2)]);
    }

    #[test]
    fn test_invalid_csv() {
        let content = "mjd,ut1_minus_utc,polar_motion_x,polar_motion_y\n41684.0,abc,0.1,0.2\n";
        assert!(matches!(parse_csv(content), Err(EopDataError::Csv(_))));

        let missing_column = "mjd,ut1_minus_utc,polar_motion_x\n41684.0,0.8,0.1\n";
        assert!(matches!(parse_csv(missing_column), Err(EopDataError::Csv(_))));
    }

    #[test]
    fn test_header_only() {
        let records = parse_csv("mjd,ut1_minus_utc,polar_motion_x,polar_motion_y\n").unwrap();
        assert!(records.is_empty());
    }
}
