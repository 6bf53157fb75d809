//! Apparent → reference frame adapter.
//!
//! [`FrameTransform`] binds one Earth orientation snapshot, one kernel and one frame
//! identifier, and maps apparent places to [`ReferencePoint`]s. It resolves the Earth
//! orientation parameters of each epoch itself, so kernels only see fully resolved requests.

use crate::constants::{Radian, MJD};
use crate::eop::EopTable;
use crate::kernel::{AstrometricKernel, KernelRequest};
use crate::posangle_errors::PosAngleError;
use crate::site::Site;

/// Direction in the reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    /// Right ascension in `[0, 2π)` (radians)
    pub ra: Radian,
    /// Declination in `[-π/2, π/2]` (radians)
    pub dec: Radian,
}

/// Stateless apparent → reference mapping for one batch.
pub struct FrameTransform<'a, K: ?Sized> {
    table: &'a EopTable,
    kernel: &'a K,
    frame: &'a str,
}

impl<'a, K: AstrometricKernel + ?Sized> FrameTransform<'a, K> {
    pub fn new(table: &'a EopTable, kernel: &'a K, frame: &'a str) -> Self {
        FrameTransform {
            table,
            kernel,
            frame,
        }
    }

    pub fn frame(&self) -> &str {
        self.frame
    }

    /// Map an apparent place seen from `site` at `epoch_mjd` (UTC) to the reference frame.
    ///
    /// Errors
    /// ------
    /// * [`PosAngleError::EpochOutOfRange`] / [`PosAngleError::DataUnavailable`] from the
    ///   Earth orientation lookup,
    /// * [`PosAngleError::TransformFailure`] wrapping the kernel diagnostic.
    pub fn transform(
        &self,
        epoch_mjd: MJD,
        ra: Radian,
        dec: Radian,
        site: &Site,
    ) -> Result<ReferencePoint, PosAngleError> {
        let eop = self.table.lookup(epoch_mjd)?;
        let request = KernelRequest {
            epoch_mjd,
            ra,
            dec,
            site,
            eop,
            frame: self.frame,
        };
        let (ra, dec) = self.kernel.apparent_to_reference(&request)?;
        Ok(ReferencePoint { ra, dec })
    }
}
