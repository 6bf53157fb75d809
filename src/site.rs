use nalgebra::Vector3;

use crate::constants::{Degree, Meter, Radian, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, RADEG};
use crate::posangle_errors::PosAngleError;

/// Geodetic observing site, shared read-only by every observation of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    /// East longitude (radians)
    pub longitude: Radian,
    /// Geodetic latitude (radians)
    pub latitude: Radian,
    /// Height above the reference ellipsoid (meters)
    pub altitude: Meter,
}

impl Site {
    /// Build a site from geodetic coordinates in radians and meters.
    ///
    /// Return
    /// ------
    /// * the site, or [`PosAngleError::InvalidParameter`] if a coordinate is not finite or the
    ///   latitude lies outside `[-π/2, π/2]`.
    pub fn new(
        longitude: Radian,
        latitude: Radian,
        altitude: Meter,
    ) -> Result<Self, PosAngleError> {
        if !(longitude.is_finite() && latitude.is_finite() && altitude.is_finite()) {
            return Err(PosAngleError::InvalidParameter(format!(
                "site coordinates must be finite (lon={longitude}, lat={latitude}, alt={altitude})"
            )));
        }
        if latitude.abs() > std::f64::consts::FRAC_PI_2 {
            return Err(PosAngleError::InvalidParameter(format!(
                "site latitude {latitude} rad is outside [-π/2, π/2]"
            )));
        }
        Ok(Site {
            longitude,
            latitude,
            altitude,
        })
    }

    /// Build a site from longitude and latitude in degrees and altitude in meters.
    pub fn from_degrees(
        longitude: Degree,
        latitude: Degree,
        altitude: Meter,
    ) -> Result<Self, PosAngleError> {
        Site::new(longitude * RADEG, latitude * RADEG, altitude)
    }

    /// Normalized parallax coordinates `(ρ·cos φ', ρ·sin φ')` of the site, in units of the
    /// Earth equatorial radius.
    pub fn parallax_coordinates(&self) -> (f64, f64) {
        let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

        // parametric (reduced) latitude
        let u = (self.latitude.sin() * axis_ratio).atan2(self.latitude.cos());
        let height = self.altitude / EARTH_MAJOR_AXIS;

        let rho_cos_phi = u.cos() + height * self.latitude.cos();
        let rho_sin_phi = axis_ratio * u.sin() + height * self.latitude.sin();

        (rho_cos_phi, rho_sin_phi)
    }

    /// Position of the site in the Earth-fixed frame (meters).
    pub fn body_fixed_position(&self) -> Vector3<f64> {
        let (rho_cos_phi, rho_sin_phi) = self.parallax_coordinates();
        let (sin_lon, cos_lon) = self.longitude.sin_cos();

        Vector3::new(
            EARTH_MAJOR_AXIS * rho_cos_phi * cos_lon,
            EARTH_MAJOR_AXIS * rho_cos_phi * sin_lon,
            EARTH_MAJOR_AXIS * rho_sin_phi,
        )
    }
}
