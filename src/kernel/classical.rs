//! # Classical apparent → reference kernel
//!
//! An equinox-based reduction built on the crate's Earth orientation models. The apparent
//! place is understood as seen from the site: referred to the Earth-fixed pole, with the
//! true equinox of date as origin of right ascension, and affected by diurnal and annual
//! aberration. The chain applied by [`ClassicalKernel`] is:
//!
//! 1. UTC → TT with hifitime, UTC → UT1 with the tabulated UT1−UTC,
//! 2. rotation by the apparent sidereal time into the Earth-fixed frame,
//! 3. removal of polar motion (Earth-fixed → terrestrial intermediate frame),
//! 4. removal of the diurnal aberration due to the site velocity `ω × r`,
//! 5. rotation back to the true equator and equinox of date,
//! 6. removal of the annual aberration (low precision solar theory),
//! 7. inverse IAU 1980 nutation and inverse IAU 1976 precession (→ mean J2000),
//! 8. inverse frame bias for the ICRS.
//!
//! Light deflection and refraction are ignored, aberration is corrected to first order.

use nalgebra::{Matrix3, Vector3};

use crate::constants::{Radian, DPI, EARTH_ROTATION_RATE, MJD, RADEG, RADSEC, T2000, VLIGHT};
use crate::earth_orientation::{
    frame_bias_matrix, gast, nutation_matrix, obleq, polar_motion_matrix, precession_matrix,
};
use crate::kernel::{AstrometricKernel, KernelError, KernelRequest};
use crate::ref_system::{radec_to_unit, rot_x, rot_z, unit_to_radec, ReferenceFrame};
use crate::time::{utc_to_tt_mjd, utc_to_ut1_mjd};

/// Constant of aberration (arcseconds)
const ABERRATION_CONSTANT: f64 = 20.49552;

/// Built-in [`AstrometricKernel`] based on the classical IAU 1976/1980 models.
#[derive(Debug, Clone)]
pub struct ClassicalKernel {
    diurnal_aberration: bool,
    annual_aberration: bool,
    bias: Matrix3<f64>,
}

impl Default for ClassicalKernel {
    fn default() -> Self {
        ClassicalKernel {
            diurnal_aberration: true,
            annual_aberration: true,
            bias: frame_bias_matrix(),
        }
    }
}

impl ClassicalKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel treating the input as a purely geometric place (no aberration removed).
    pub fn without_aberration() -> Self {
        ClassicalKernel {
            diurnal_aberration: false,
            annual_aberration: false,
            ..Self::default()
        }
    }

    fn validate(request: &KernelRequest<'_>) -> Result<(), KernelError> {
        let fields = [
            ("epoch", request.epoch_mjd),
            ("right ascension", request.ra),
            ("declination", request.dec),
            ("UT1-UTC", request.eop.ut1_minus_utc),
            ("polar motion x", request.eop.polar_motion_x),
            ("polar motion y", request.eop.polar_motion_y),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(KernelError::NonFiniteInput { field, value });
        }
        if request.dec.abs() > std::f64::consts::FRAC_PI_2 {
            return Err(KernelError::DeclinationOutOfRange(request.dec));
        }
        Ok(())
    }
}

impl AstrometricKernel for ClassicalKernel {
    fn apparent_to_reference(
        &self,
        request: &KernelRequest<'_>,
    ) -> Result<(Radian, Radian), KernelError> {
        Self::validate(request)?;
        let frame: ReferenceFrame = request.frame.parse()?;

        let tt = utc_to_tt_mjd(request.epoch_mjd);
        let ut1 = utc_to_ut1_mjd(request.epoch_mjd, request.eop.ut1_minus_utc);

        // true of date → terrestrial intermediate frame: v_tirs = R3(GAST) · v_true
        let earth_rotation = rot_z(gast(ut1, tt));
        let polar_motion =
            polar_motion_matrix(request.eop.polar_motion_x, request.eop.polar_motion_y);

        let apparent = radec_to_unit(request.ra, request.dec);
        let mut tirs = polar_motion.transpose() * earth_rotation * apparent;

        if self.diurnal_aberration {
            let site_tirs = polar_motion.transpose() * request.site.body_fixed_position();
            let velocity = Vector3::new(0.0, 0.0, EARTH_ROTATION_RATE).cross(&site_tirs);
            tirs = (tirs - velocity / VLIGHT).normalize();
        }

        let mut true_of_date = earth_rotation.transpose() * tirs;

        if self.annual_aberration {
            true_of_date = (true_of_date - earth_velocity_over_c(tt)).normalize();
        }

        let mean_j2000 =
            precession_matrix(tt).transpose() * nutation_matrix(tt).transpose() * true_of_date;

        let reference = match frame {
            ReferenceFrame::Fk5J2000 => mean_j2000,
            ReferenceFrame::Icrs => self.bias.transpose() * mean_j2000,
        };

        Ok(unit_to_radec(&reference))
    }
}

/// Velocity of the Earth divided by the speed of light, in the mean equator and equinox of
/// date, from the geometric longitude of the Sun (Meeus, *Astronomical Algorithms*, ch. 23).
///
/// The neglected planetary perturbations stay below 0.1″ on the aberration.
fn earth_velocity_over_c(tt: MJD) -> Vector3<f64> {
    let t = (tt - T2000) / 36525.0;

    let mean_longitude = (280.46646 + 36000.76983 * t + 0.0003032 * t * t) * RADEG;
    let mean_anomaly = (357.52911 + 35999.05029 * t - 0.0001537 * t * t) * RADEG;
    let center = ((1.914602 - 0.004817 * t - 0.000014 * t * t) * mean_anomaly.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * mean_anomaly).sin()
        + 0.000289 * (3.0 * mean_anomaly).sin())
        * RADEG;
    let sun_longitude = (mean_longitude + center) % DPI;

    let eccentricity = 0.016708634 - 0.000042037 * t - 0.0000001267 * t * t;
    let perihelion = (102.93735 + 1.71946 * t + 0.00046 * t * t) * RADEG;

    let kappa = ABERRATION_CONSTANT * RADSEC;
    let ecliptic = Vector3::new(
        kappa * (sun_longitude.sin() - eccentricity * perihelion.sin()),
        kappa * (-sun_longitude.cos() + eccentricity * perihelion.cos()),
        0.0,
    );

    // ecliptic → equatorial of date
    rot_x(-obleq(tt)) * ecliptic
}
