use thiserror::Error;

use crate::constants::MJD;
use crate::eop::EopDataError;
use crate::kernel::KernelError;

#[derive(Error, Debug)]
pub enum PosAngleError {
    #[error("Earth orientation data unavailable: {0}")]
    DataUnavailable(#[from] EopDataError),

    #[error("Epoch MJD {mjd} is outside the Earth orientation table coverage [{first}, {last}]")]
    EpochOutOfRange { mjd: MJD, first: MJD, last: MJD },

    #[error("Astrometric transform failed: {0}")]
    TransformFailure(#[from] KernelError),

    #[error("Batch arrays have mismatched lengths: epochs={epochs}, ra={ras}, dec={decs}")]
    ShapeMismatch {
        epochs: usize,
        ras: usize,
        decs: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Observation #{index} failed: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<PosAngleError>,
    },
}

impl PosAngleError {
    /// Wrap an error with the batch index of the observation that raised it.
    pub(crate) fn at_index(index: usize, source: PosAngleError) -> Self {
        PosAngleError::AtIndex {
            index,
            source: Box::new(source),
        }
    }

    /// Index of the failing observation, when the error comes from a batch call.
    pub fn failing_index(&self) -> Option<usize> {
        match self {
            PosAngleError::AtIndex { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The underlying cause, with any batch index annotation stripped.
    pub fn root(&self) -> &PosAngleError {
        match self {
            PosAngleError::AtIndex { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod posangle_errors_test {
    use super::*;

    #[test]
    fn test_index_annotation() {
        let err = PosAngleError::at_index(
            7,
            PosAngleError::EpochOutOfRange {
                mjd: 40000.0,
                first: 41684.0,
                last: 41800.0,
            },
        );

        assert_eq!(err.failing_index(), Some(7));
        assert!(matches!(
            err.root(),
            PosAngleError::EpochOutOfRange { mjd, .. } if *mjd == 40000.0
        ));
        assert_eq!(
            err.to_string(),
            "Observation #7 failed: Epoch MJD 40000 is outside the Earth orientation table coverage [41684, 41800]"
        );
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = PosAngleError::ShapeMismatch {
            epochs: 3,
            ras: 3,
            decs: 2,
        };
        assert_eq!(err.failing_index(), None);
        assert_eq!(
            err.to_string(),
            "Batch arrays have mismatched lengths: epochs=3, ra=3, dec=2"
        );
    }

    #[test]
    fn test_kernel_error_conversion() {
        let err: PosAngleError = KernelError::UnsupportedFrame("galactic".into()).into();
        assert!(matches!(err, PosAngleError::TransformFailure(_)));
    }
}
