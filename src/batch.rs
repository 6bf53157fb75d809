//! Batch evaluation of position angles over parallel arrays.
//!
//! Observations are independent: each index is evaluated on its own, in parallel on the rayon
//! pool when [`PosAngleParams::parallel`] is set. Results are returned in input order.
//!
//! A failing observation aborts the batch: the sequential path stops at the first error, the
//! parallel path skips every index above the lowest failure seen so far. Both report the
//! lowest failing index, whatever the thread scheduling.

use std::sync::atomic::{AtomicUsize, Ordering};

use itertools::izip;
use rayon::prelude::*;
use tracing::debug;

use crate::constants::{Radian, JD};
use crate::eop::EopTable;
use crate::estimator::{Observation, PositionAngle, PositionAngleEstimator};
use crate::kernel::AstrometricKernel;
use crate::params::{validate_offset, PosAngleParams};
use crate::posangle_errors::PosAngleError;
use crate::site::Site;
use crate::transform::FrameTransform;

/// Position angles of a batch of apparent places seen from one site.
///
/// Arguments
/// ---------
/// * `table`: Earth orientation snapshot used for every observation of the batch,
/// * `kernel`: apparent → reference mapping,
/// * `epochs_jd`, `ras`, `decs`: parallel arrays of epochs (JD, UTC) and apparent places
///   (radians),
/// * `site`: observing site,
/// * `frame`: reference-frame identifier handed to the kernel,
/// * `params`: probe offset and scheme, parallelism.
///
/// Return
/// ------
/// * one angle in `(-π, π]` per observation, in input order.
///
/// Errors
/// ------
/// * [`PosAngleError::ShapeMismatch`] when the arrays differ in length, before any evaluation,
/// * [`PosAngleError::InvalidParameter`] for an offset outside `(0, π/18]`,
/// * [`PosAngleError::AtIndex`] wrapping the error of the lowest failing observation.
#[allow(clippy::too_many_arguments)]
pub fn estimate_batch<K: AstrometricKernel + ?Sized>(
    table: &EopTable,
    kernel: &K,
    epochs_jd: &[JD],
    ras: &[Radian],
    decs: &[Radian],
    site: &Site,
    frame: &str,
    params: &PosAngleParams,
) -> Result<Vec<PositionAngle>, PosAngleError> {
    if epochs_jd.len() != ras.len() || ras.len() != decs.len() {
        return Err(PosAngleError::ShapeMismatch {
            epochs: epochs_jd.len(),
            ras: ras.len(),
            decs: decs.len(),
        });
    }

    validate_offset(params.offset)?;

    debug!(
        size = epochs_jd.len(),
        frame,
        offset = params.offset,
        scheme = %params.scheme,
        parallel = params.parallel,
        "position-angle batch"
    );

    let observations: Vec<Observation> = izip!(epochs_jd, ras, decs)
        .map(|(&epoch, &ra, &dec)| Observation::new(epoch, ra, dec))
        .collect();

    let estimator =
        PositionAngleEstimator::new(FrameTransform::new(table, kernel, frame), params.scheme);
    let evaluate = |index: usize, observation: &Observation| {
        estimator
            .estimate_unchecked(observation, site, params.offset)
            .map_err(|err| PosAngleError::at_index(index, err))
    };

    if !params.parallel {
        return observations
            .iter()
            .enumerate()
            .map(|(index, observation)| evaluate(index, observation))
            .collect();
    }

    // lowest index seen failing so far; later indices are skipped
    let first_failure = AtomicUsize::new(usize::MAX);
    let results: Vec<Option<Result<PositionAngle, PosAngleError>>> = observations
        .par_iter()
        .enumerate()
        .map(|(index, observation)| {
            if index > first_failure.load(Ordering::Relaxed) {
                return None;
            }
            let result = evaluate(index, observation);
            if result.is_err() {
                first_failure.fetch_min(index, Ordering::Relaxed);
            }
            Some(result)
        })
        .collect();

    // every index up to the lowest failure has been evaluated
    results.into_iter().map_while(|result| result).collect()
}
