//! # PosAngle: Earth orientation, kernel and estimator settings
//!
//! [`PosAngle`] is the entry point of the crate. It wires together:
//!
//! 1. an [`EopProvider`], the lazily loaded and explicitly reloadable Earth orientation table,
//! 2. an [`AstrometricKernel`], the apparent → reference frame mapping
//!    ([`ClassicalKernel`] unless another one is injected),
//! 3. the [`PosAngleParams`] of the finite-difference estimator.
//!
//! Each batch call takes one snapshot of the Earth orientation table and uses it for all its
//! observations, so a concurrent [`PosAngle::reload_eop`] never splits a batch between two
//! tables.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use posangle::posangle::PosAngle;
//! use posangle::site::Site;
//!
//! let posangle = PosAngle::new("finals:data/finals2000A.all").unwrap();
//! let site = Site::from_degrees(-116.5833461618117, 33.97391383157283, 1073.46).unwrap();
//!
//! let angles = posangle
//!     .estimate_batch(
//!         &[2441733.0],
//!         &[8.3_f64.to_radians()],
//!         &[16.3_f64.to_radians()],
//!         &site,
//!         "icrs",
//!         None,
//!     )
//!     .unwrap();
//! ```

use std::sync::Arc;

use crate::batch;
use crate::constants::{Radian, JD};
use crate::eop::provider::EopProvider;
use crate::eop::EopTable;
use crate::estimator::{Observation, PositionAngle, PositionAngleEstimator};
use crate::kernel::classical::ClassicalKernel;
use crate::kernel::AstrometricKernel;
use crate::params::PosAngleParams;
use crate::posangle_errors::PosAngleError;
use crate::site::Site;
use crate::transform::FrameTransform;

#[derive(Debug)]
pub struct PosAngle<K = ClassicalKernel> {
    eop: EopProvider,
    kernel: K,
    params: PosAngleParams,
}

impl PosAngle<ClassicalKernel> {
    /// Construct a context reading its Earth orientation data from `eop_source`.
    ///
    /// Arguments
    /// ---------
    /// * `eop_source`: a descriptor such as `"finals:<path>"` or `"csv:<path>"`. The file is
    ///   not read yet; it is loaded on the first estimate or by
    ///   [`EopProvider::load`] through [`PosAngle::eop`].
    ///
    /// Return
    /// ------
    /// * the context with the built-in [`ClassicalKernel`] and default parameters, or
    ///   [`PosAngleError::DataUnavailable`] for an unknown descriptor.
    pub fn new(eop_source: &str) -> Result<Self, PosAngleError> {
        Ok(Self::from_provider(EopProvider::new(eop_source)?))
    }

    pub fn from_provider(provider: EopProvider) -> Self {
        PosAngle {
            eop: provider,
            kernel: ClassicalKernel::default(),
            params: PosAngleParams::default(),
        }
    }
}

impl<K: AstrometricKernel> PosAngle<K> {
    /// Replace the astrometric kernel.
    pub fn with_kernel<K2: AstrometricKernel>(self, kernel: K2) -> PosAngle<K2> {
        PosAngle {
            eop: self.eop,
            kernel,
            params: self.params,
        }
    }

    pub fn with_params(mut self, params: PosAngleParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &PosAngleParams {
        &self.params
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn eop(&self) -> &EopProvider {
        &self.eop
    }

    /// Re-read the Earth orientation source and swap the table in, see [`EopProvider::reload`].
    pub fn reload_eop(&self) -> Result<Arc<EopTable>, PosAngleError> {
        self.eop.reload()
    }

    /// Position angle of a single observation, with the context parameters.
    pub fn estimate(
        &self,
        observation: &Observation,
        site: &Site,
        frame: &str,
    ) -> Result<PositionAngle, PosAngleError> {
        let table = self.eop.snapshot()?;
        let estimator = PositionAngleEstimator::new(
            FrameTransform::new(&table, &self.kernel, frame),
            self.params.scheme,
        );
        estimator.estimate(observation, site, self.params.offset)
    }

    /// Position angles of a batch of observations.
    ///
    /// Arguments
    /// ---------
    /// * `epochs_jd`, `ras`, `decs`: parallel arrays of epochs (JD, UTC) and apparent places,
    /// * `site`: observing site,
    /// * `frame`: reference-frame identifier handed to the kernel (`"icrs"`, `"fk5"`, …),
    /// * `offset`: probe offset overriding the context parameters for this call.
    ///
    /// Return
    /// ------
    /// * the angles in input order, or the first error as described in
    ///   [`batch::estimate_batch`].
    pub fn estimate_batch(
        &self,
        epochs_jd: &[JD],
        ras: &[Radian],
        decs: &[Radian],
        site: &Site,
        frame: &str,
        offset: Option<Radian>,
    ) -> Result<Vec<PositionAngle>, PosAngleError> {
        let params = match offset {
            Some(offset) => self.params.with_offset(offset)?,
            None => self.params,
        };
        let table = self.eop.snapshot()?;
        batch::estimate_batch(
            &table,
            &self.kernel,
            epochs_jd,
            ras,
            decs,
            site,
            frame,
            &params,
        )
    }
}

#[cfg(test)]
mod posangle_test {
    use super::*;
    use crate::eop::provider::EopSource;
    use crate::eop::{EopDataError, EopRecord};
    use crate::kernel::{KernelError, KernelRequest};
    use approx::assert_abs_diff_eq;

    fn provider() -> EopProvider {
        EopProvider::from_source(EopSource::Records(
            (0..4)
                .map(|d| EopRecord::new(41731.0 + d as f64, 0.69, 0.12, 0.14))
                .collect(),
        ))
    }

    fn identity(req: &KernelRequest<'_>) -> Result<(Radian, Radian), KernelError> {
        Ok((req.ra, req.dec))
    }

    #[test]
    fn test_unknown_source() {
        assert!(matches!(
            PosAngle::new("horizon:DE440"),
            Err(PosAngleError::DataUnavailable(EopDataError::UnknownSource(_)))
        ));
    }

    #[test]
    fn test_with_kernel_and_params() {
        let posangle = PosAngle::from_provider(provider())
            .with_kernel(identity)
            .with_params(PosAngleParams::builder().parallel(false).build().unwrap());
        assert!(!posangle.params().parallel);
        assert!(!posangle.eop().is_loaded());

        let site = Site::new(0.0, 0.0, 0.0).unwrap();
        let angles = posangle
            .estimate_batch(&[2441733.0, 2441733.5], &[0.1, 0.2], &[0.3, 0.4], &site, "icrs", None)
            .unwrap();
        assert_eq!(angles, vec![0.0, 0.0]);
        assert!(posangle.eop().is_loaded());

        let single = posangle
            .estimate(&Observation::new(2441733.0, 0.1, 0.3), &site, "icrs")
            .unwrap();
        assert_abs_diff_eq!(single, 0.0);
    }

    #[test]
    fn test_invalid_offset_override() {
        let posangle = PosAngle::from_provider(provider()).with_kernel(identity);
        let site = Site::new(0.0, 0.0, 0.0).unwrap();
        assert!(matches!(
            posangle.estimate_batch(&[2441733.0], &[0.1], &[0.3], &site, "icrs", Some(-1.0)),
            Err(PosAngleError::InvalidParameter(_))
        ));
    }
}
