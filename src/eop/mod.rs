//! # Earth orientation parameters
//!
//! Time-indexed table of Earth orientation parameters (UT1−UTC and polar motion) with
//! interpolated lookups, its readers, and its owner:
//!
//! * [`EopTable`]: immutable, strictly increasing sequence of [`EopRecord`]s answering
//!   [`EopTable::lookup`] with a binary search and a linear interpolation,
//! * [`finals_reader`]: IERS `finals2000A` fixed-width files,
//! * [`csv_reader`]: headered CSV files,
//! * [`provider`]: [`EopProvider`](provider::EopProvider), which owns the loaded table and
//!   publishes reloads atomically.
//!
//! Lookups never extrapolate: an epoch outside the covered range is reported as
//! [`PosAngleError::EpochOutOfRange`].

pub mod csv_reader;
pub mod finals_reader;
pub mod provider;

use camino::Utf8PathBuf;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::{ArcSec, Second, DEFAULT_MAX_EOP_GAP, MJD};
use crate::posangle_errors::PosAngleError;

/// Why an Earth orientation source could not be turned into a table.
#[derive(Error, Debug)]
pub enum EopDataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("the source holds no Earth orientation record")]
    Empty,

    #[error("record #{index} (MJD {mjd}) holds a non-finite value")]
    NonFinite { index: usize, mjd: MJD },

    #[error("record #{index}: MJD {mjd} does not strictly follow MJD {previous}")]
    NotIncreasing { index: usize, previous: MJD, mjd: MJD },

    #[error("records at MJD {before} and {after} are more than {max_gap} days apart")]
    SparseRecords { before: MJD, after: MJD, max_gap: f64 },

    #[error("unknown source descriptor '{0}', expected 'finals:<path>' or 'csv:<path>'")]
    UnknownSource(String),
}

/// One tabulated epoch of Earth orientation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EopRecord {
    /// Modified Julian Date (UTC)
    pub mjd: MJD,
    /// UT1−UTC (seconds)
    pub ut1_minus_utc: Second,
    /// x coordinate of the pole (arcseconds)
    pub polar_motion_x: ArcSec,
    /// y coordinate of the pole (arcseconds)
    pub polar_motion_y: ArcSec,
}

impl EopRecord {
    pub fn new(
        mjd: MJD,
        ut1_minus_utc: Second,
        polar_motion_x: ArcSec,
        polar_motion_y: ArcSec,
    ) -> Self {
        EopRecord {
            mjd,
            ut1_minus_utc,
            polar_motion_x,
            polar_motion_y,
        }
    }

    pub fn values(&self) -> EopValues {
        EopValues {
            ut1_minus_utc: self.ut1_minus_utc,
            polar_motion_x: self.polar_motion_x,
            polar_motion_y: self.polar_motion_y,
        }
    }

    fn is_finite(&self) -> bool {
        self.mjd.is_finite()
            && self.ut1_minus_utc.is_finite()
            && self.polar_motion_x.is_finite()
            && self.polar_motion_y.is_finite()
    }
}

/// Earth orientation parameters at one epoch, as consumed by the astrometric kernels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EopValues {
    /// UT1−UTC (seconds)
    pub ut1_minus_utc: Second,
    /// x coordinate of the pole (arcseconds)
    pub polar_motion_x: ArcSec,
    /// y coordinate of the pole (arcseconds)
    pub polar_motion_y: ArcSec,
}

/// Immutable Earth orientation table.
///
/// Invariants, checked once by [`EopTable::from_records`]:
/// * at least one record,
/// * every field finite,
/// * MJDs strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct EopTable {
    records: Vec<EopRecord>,
    max_gap: f64,
}

impl EopTable {
    /// Validate `records` and build a table.
    ///
    /// Arguments
    /// ---------
    /// * `records`: the tabulated epochs, in strictly increasing MJD order. Unsorted input is
    ///   rejected rather than sorted, so a corrupted source is reported instead of silently
    ///   reordered.
    ///
    /// Return
    /// ------
    /// * the table, or the [`EopDataError`] describing the first offending record.
    pub fn from_records(records: Vec<EopRecord>) -> Result<Self, EopDataError> {
        if records.is_empty() {
            return Err(EopDataError::Empty);
        }
        if let Some(index) = records.iter().position(|r| !r.is_finite()) {
            return Err(EopDataError::NonFinite {
                index,
                mjd: records[index].mjd,
            });
        }
        if let Some(index) = records.windows(2).position(|w| w[1].mjd <= w[0].mjd) {
            return Err(EopDataError::NotIncreasing {
                index: index + 1,
                previous: records[index].mjd,
                mjd: records[index + 1].mjd,
            });
        }

        Ok(EopTable {
            records,
            max_gap: DEFAULT_MAX_EOP_GAP,
        })
    }

    /// Set the largest spacing (days) allowed between the two records bracketing a lookup.
    pub fn with_max_gap(mut self, max_gap: f64) -> Result<Self, PosAngleError> {
        if !(max_gap.is_finite() && max_gap > 0.0) {
            return Err(PosAngleError::InvalidParameter(format!(
                "max_gap must be a positive number of days, got {max_gap}"
            )));
        }
        self.max_gap = max_gap;
        Ok(self)
    }

    pub fn records(&self) -> &[EopRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`: an empty table cannot be built.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_gap(&self) -> f64 {
        self.max_gap
    }

    /// First and last tabulated MJD.
    pub fn coverage(&self) -> (MJD, MJD) {
        (self.records[0].mjd, self.records[self.records.len() - 1].mjd)
    }

    /// Interpolated Earth orientation parameters at `epoch_mjd` (UTC).
    ///
    /// The bracketing records are found with a binary search, then each field is linearly
    /// interpolated. A lookup exactly on a tabulated epoch returns that record's values.
    ///
    /// Errors
    /// ------
    /// * [`PosAngleError::EpochOutOfRange`] if `epoch_mjd` lies outside [`EopTable::coverage`]
    ///   or is NaN,
    /// * [`PosAngleError::DataUnavailable`] with [`EopDataError::SparseRecords`] if the
    ///   bracketing records are further apart than [`EopTable::max_gap`].
    pub fn lookup(&self, epoch_mjd: MJD) -> Result<EopValues, PosAngleError> {
        let (first, last) = self.coverage();
        if !(epoch_mjd >= first && epoch_mjd <= last) {
            return Err(PosAngleError::EpochOutOfRange {
                mjd: epoch_mjd,
                first,
                last,
            });
        }

        // number of records at or before the epoch, at least one after the range check
        let upper = self.records.partition_point(|r| r.mjd <= epoch_mjd);
        let before = &self.records[upper - 1];
        if before.mjd == epoch_mjd {
            return Ok(before.values());
        }
        let after = &self.records[upper];

        let gap = after.mjd - before.mjd;
        if gap > self.max_gap {
            return Err(EopDataError::SparseRecords {
                before: before.mjd,
                after: after.mjd,
                max_gap: self.max_gap,
            }
            .into());
        }

        let frac = (epoch_mjd - before.mjd) / gap;
        let lerp = |a: f64, b: f64| a + (b - a) * frac;

        Ok(EopValues {
            ut1_minus_utc: lerp(before.ut1_minus_utc, after.ut1_minus_utc),
            polar_motion_x: lerp(before.polar_motion_x, after.polar_motion_x),
            polar_motion_y: lerp(before.polar_motion_y, after.polar_motion_y),
        })
    }
}

#[cfg(test)]
mod eop_test {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> EopTable {
        EopTable::from_records(vec![
            EopRecord::new(41684.0, 0.8075, 0.1210, 0.1360),
            EopRecord::new(41685.0, 0.8050, 0.1220, 0.1350),
            EopRecord::new(41686.0, 0.8020, 0.1240, 0.1330),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_on_records() {
        let table = table();
        assert_eq!(table.lookup(41684.0).unwrap(), table.records()[0].values());
        assert_eq!(table.lookup(41685.0).unwrap(), table.records()[1].values());
        assert_eq!(table.lookup(41686.0).unwrap(), table.records()[2].values());
    }

    #[test]
    fn test_lookup_interpolates_linearly() {
        let values = table().lookup(41685.25).unwrap();
        assert_relative_eq!(values.ut1_minus_utc, 0.80425, epsilon = 1e-12);
        assert_relative_eq!(values.polar_motion_x, 0.1225, epsilon = 1e-12);
        assert_relative_eq!(values.polar_motion_y, 0.1345, epsilon = 1e-12);
    }

    #[test]
    fn test_lookup_out_of_range() {
        let table = table();
        for mjd in [41683.999, 41686.001, f64::NAN] {
            match table.lookup(mjd) {
                Err(PosAngleError::EpochOutOfRange { first, last, .. }) => {
                    assert_eq!(first, 41684.0);
                    assert_eq!(last, 41686.0);
                }
                other => panic!("expected EpochOutOfRange for {mjd}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_single_record_table() {
        let table = EopTable::from_records(vec![EopRecord::new(41684.0, 0.8, 0.1, 0.2)]).unwrap();
        assert_eq!(table.coverage(), (41684.0, 41684.0));
        assert_eq!(table.lookup(41684.0).unwrap().ut1_minus_utc, 0.8);
        assert!(table.lookup(41684.5).is_err());
    }

    #[test]
    fn test_rejects_invalid_records() {
        assert!(matches!(
            EopTable::from_records(vec![]),
            Err(EopDataError::Empty)
        ));

        let unsorted = vec![
            EopRecord::new(41684.0, 0.8, 0.1, 0.2),
            EopRecord::new(41686.0, 0.8, 0.1, 0.2),
            EopRecord::new(41685.0, 0.8, 0.1, 0.2),
        ];
        assert!(matches!(
            EopTable::from_records(unsorted),
            Err(EopDataError::NotIncreasing { index: 2, previous, mjd })
                if previous == 41686.0 && mjd == 41685.0
        ));

        let duplicated = vec![
            EopRecord::new(41684.0, 0.8, 0.1, 0.2),
            EopRecord::new(41684.0, 0.8, 0.1, 0.2),
        ];
        assert!(matches!(
            EopTable::from_records(duplicated),
            Err(EopDataError::NotIncreasing { index: 1, .. })
        ));

        let nan = vec![
            EopRecord::new(41684.0, 0.8, 0.1, 0.2),
            EopRecord::new(41685.0, f64::NAN, 0.1, 0.2),
        ];
        assert!(matches!(
            EopTable::from_records(nan),
            Err(EopDataError::NonFinite { index: 1, .. })
        ));
    }

    #[test]
    fn test_sparse_records() {
        let table = EopTable::from_records(vec![
            EopRecord::new(41684.0, 0.8, 0.1, 0.2),
            EopRecord::new(41685.0, 0.8, 0.1, 0.2),
            EopRecord::new(41700.0, 0.7, 0.1, 0.2),
        ])
        .unwrap();

        assert!(table.lookup(41684.5).is_ok());
        assert!(matches!(
            table.lookup(41690.0),
            Err(PosAngleError::DataUnavailable(EopDataError::SparseRecords { .. }))
        ));

        let relaxed = table.with_max_gap(20.0).unwrap();
        assert_relative_eq!(
            relaxed.lookup(41692.5).unwrap().ut1_minus_utc,
            0.75,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_invalid_max_gap() {
        assert!(matches!(
            table().with_max_gap(0.0),
            Err(PosAngleError::InvalidParameter(_))
        ));
    }
}
