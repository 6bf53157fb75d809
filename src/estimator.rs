//! # Position-angle estimator
//!
//! The apparent north direction at an observation is not, in general, the north direction of
//! the reference frame: precession, nutation, aberration and the frame bias all rotate the
//! sky a little. The estimator measures that rotation numerically.
//!
//! 1. Probe places one small step south and north of the observed place, `(ra, dec ∓ offset)`,
//!    are mapped to the reference frame → `P−`, `P+`.
//! 2. The initial great-circle bearing from `P−` to `P+` gives the direction of the apparent
//!    north in the reference frame, measured from the reference north towards the east:
//!
//! ```text
//! Δλ = wrap(λ+ − λ−)
//! bearing = atan2(sin Δλ · cos φ+, cos φ− · sin φ+ − sin φ− · cos φ+ · cos Δλ)
//! ```
//!
//! 3. The position angle is the opposite rotation, reference frame → apparent frame:
//!    `PA = −bearing`, wrapped to `(-π, π]`.
//!
//! This is [`ProbeScheme::Straddle`], the default. [`ProbeScheme::Forward`] measures the
//! bearing from the observed place `P0` to `P+` instead, and [`ProbeScheme::Central`] averages,
//! at `P0`, the bearing towards `P+` and the reversed bearing towards `P−`. All three share the
//! sign convention above.
//!
//! A probe stepping over a pole is reflected onto the opposite meridian
//! (`dec' = ±π − dec`, `ra' = ra + π`), so it stays on the apparent great circle through the
//! pole. When the southern probe of the straddle is reflected, the bearing is taken from `P+`
//! backwards, so the path between the probes never runs over the pole the wrong way.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::constants::{Radian, JD, MJD};
use crate::kernel::AstrometricKernel;
use crate::params::{validate_offset, ProbeScheme};
use crate::posangle_errors::PosAngleError;
use crate::ref_system::{wrap_pi, wrap_two_pi};
use crate::site::Site;
use crate::time::jd_to_mjd;
use crate::transform::{FrameTransform, ReferencePoint};

/// Position angle in radians, within `(-π, π]`.
pub type PositionAngle = Radian;

/// One apparent place to evaluate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Epoch as a Julian Date (UTC)
    pub epoch: JD,
    /// Apparent right ascension (radians)
    pub apparent_ra: Radian,
    /// Apparent declination (radians)
    pub apparent_dec: Radian,
}

impl Observation {
    pub fn new(epoch: JD, apparent_ra: Radian, apparent_dec: Radian) -> Self {
        Observation {
            epoch,
            apparent_ra,
            apparent_dec,
        }
    }

    pub fn epoch_mjd(&self) -> MJD {
        jd_to_mjd(self.epoch)
    }
}

/// Initial great-circle bearing from `from` to `to`, east of north, in `(-π, π]`.
///
/// Points on opposite meridians (`Δλ = π`) get a bearing of `0` when the short path crosses
/// the north pole and `π` when it crosses the south pole.
pub fn initial_bearing(from: &ReferencePoint, to: &ReferencePoint) -> PositionAngle {
    let delta_ra = wrap_pi(to.ra - from.ra);
    let (sin_dra, cos_dra) = delta_ra.sin_cos();
    let (sin_d0, cos_d0) = from.dec.sin_cos();
    let (sin_d1, cos_d1) = to.dec.sin_cos();

    let bearing = (sin_dra * cos_d1).atan2(cos_d0 * sin_d1 - sin_d0 * cos_d1 * cos_dra);
    if bearing <= -PI {
        PI
    } else {
        bearing
    }
}

/// Place at `step` radians along the meridian of `(ra, dec)`, continued over the poles.
fn probe(ra: Radian, dec: Radian, step: Radian) -> (Radian, Radian) {
    let shifted = dec + step;
    if shifted > FRAC_PI_2 {
        (wrap_two_pi(ra + PI), PI - shifted)
    } else if shifted < -FRAC_PI_2 {
        (wrap_two_pi(ra + PI), -PI - shifted)
    } else {
        (ra, shifted)
    }
}

/// Finite-difference position-angle estimator over a [`FrameTransform`].
pub struct PositionAngleEstimator<'a, K: ?Sized> {
    transform: FrameTransform<'a, K>,
    scheme: ProbeScheme,
}

impl<'a, K: AstrometricKernel + ?Sized> PositionAngleEstimator<'a, K> {
    pub fn new(transform: FrameTransform<'a, K>, scheme: ProbeScheme) -> Self {
        PositionAngleEstimator { transform, scheme }
    }

    pub fn scheme(&self) -> ProbeScheme {
        self.scheme
    }

    /// Position angle at `observation`, seen from `site`: the rotation from the reference
    /// north to the apparent north, positive towards the east.
    ///
    /// Arguments
    /// ---------
    /// * `observation`: epoch and apparent place,
    /// * `site`: observing site,
    /// * `offset`: declination step of the probes, in `(0, π/18]` radians.
    ///
    /// Return
    /// ------
    /// * the angle in `(-π, π]`, or the first error raised by a transform
    ///   ([`PosAngleError::EpochOutOfRange`], [`PosAngleError::DataUnavailable`],
    ///   [`PosAngleError::TransformFailure`]), or [`PosAngleError::InvalidParameter`] for a bad
    ///   offset.
    pub fn estimate(
        &self,
        observation: &Observation,
        site: &Site,
        offset: Radian,
    ) -> Result<PositionAngle, PosAngleError> {
        validate_offset(offset)?;
        self.estimate_unchecked(observation, site, offset)
    }

    /// [`PositionAngleEstimator::estimate`] for an offset already validated by the caller.
    pub(crate) fn estimate_unchecked(
        &self,
        observation: &Observation,
        site: &Site,
        offset: Radian,
    ) -> Result<PositionAngle, PosAngleError> {
        let epoch_mjd = observation.epoch_mjd();
        let (ra, dec) = (observation.apparent_ra, observation.apparent_dec);

        let map = |(ra, dec): (Radian, Radian)| self.transform.transform(epoch_mjd, ra, dec, site);

        let bearing = match self.scheme {
            ProbeScheme::Straddle => {
                let south = map(probe(ra, dec, -offset))?;
                let north = map(probe(ra, dec, offset))?;
                if dec - offset < -FRAC_PI_2 {
                    wrap_pi(initial_bearing(&north, &south) + PI)
                } else {
                    initial_bearing(&south, &north)
                }
            }
            ProbeScheme::Forward => {
                let origin = map((ra, dec))?;
                initial_bearing(&origin, &map(probe(ra, dec, offset))?)
            }
            ProbeScheme::Central => {
                let origin = map((ra, dec))?;
                let ahead = initial_bearing(&origin, &map(probe(ra, dec, offset))?);
                // the trailing probe points south of the origin
                let trailing = map(probe(ra, dec, -offset))?;
                let behind = wrap_pi(initial_bearing(&origin, &trailing) + PI);
                wrap_pi(ahead + wrap_pi(behind - ahead) / 2.0)
            }
        };

        Ok(wrap_pi(-bearing))
    }
}
