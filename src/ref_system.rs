//! # Reference systems and elementary rotations
//!
//! Building blocks shared by the Earth-orientation models and the astrometric kernels:
//!
//! - [`rotmt`]: active rotation of a vector about a coordinate axis,
//! - [`rot_x`], [`rot_y`], [`rot_z`]: the corresponding **passive** (change of basis) rotations,
//!   written in the usual astrometric convention `v' = R(θ) · v`,
//! - conversions between spherical coordinates and unit vectors,
//! - angle wrapping helpers,
//! - [`ReferenceFrame`], the inertial frames understood by the built-in kernel.
//!
//! Passive rotations compose right to left: `rot_z(-z) * rot_y(theta) * rot_z(-zeta)` first
//! rotates by `-zeta` about Z, then by `theta` about Y, then by `-z` about Z.

use std::str::FromStr;

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Radian, DPI};
use crate::kernel::KernelError;

/// Coordinate axis of an elementary rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Construct a rotation matrix around one of the principal coordinate axes.
///
/// The rotation is **applied to the vector** in a fixed frame (counter-clockwise for a
/// positive `alpha` when looking down the axis towards the origin).
///
/// # Arguments
///
/// * `alpha` - Rotation angle in radians.
/// * `axis` - Axis of rotation.
///
/// # Returns
///
/// A 3×3 orthonormal rotation matrix `R` such that the rotated vector is `x' = R · x`.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Passive rotation of the coordinate axes about X by `phi`.
pub fn rot_x(phi: Radian) -> Matrix3<f64> {
    rotmt(-phi, Axis::X)
}

/// Passive rotation of the coordinate axes about Y by `theta`.
pub fn rot_y(theta: Radian) -> Matrix3<f64> {
    rotmt(-theta, Axis::Y)
}

/// Passive rotation of the coordinate axes about Z by `psi`.
pub fn rot_z(psi: Radian) -> Matrix3<f64> {
    rotmt(-psi, Axis::Z)
}

/// Unit vector pointing at the spherical coordinates `(ra, dec)`.
pub fn radec_to_unit(ra: Radian, dec: Radian) -> Vector3<f64> {
    let (sin_ra, cos_ra) = ra.sin_cos();
    let (sin_dec, cos_dec) = dec.sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}

/// Spherical coordinates of a (not necessarily normalized) vector.
///
/// Return
/// ------
/// * `(ra, dec)` with `ra` in `[0, 2π)` and `dec` in `[-π/2, π/2]`.
pub fn unit_to_radec(v: &Vector3<f64>) -> (Radian, Radian) {
    let ra = wrap_two_pi(v.y.atan2(v.x));
    let dec = v.z.atan2(v.x.hypot(v.y));
    (ra, dec)
}

/// Wrap an angle to `[0, 2π)`.
pub fn wrap_two_pi(angle: Radian) -> Radian {
    let wrapped = angle.rem_euclid(DPI);
    // rem_euclid may round up to exactly 2π for tiny negative inputs
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle to `(-π, π]`.
pub fn wrap_pi(angle: Radian) -> Radian {
    let wrapped = std::f64::consts::PI - (std::f64::consts::PI - angle).rem_euclid(DPI);
    if wrapped <= -std::f64::consts::PI {
        std::f64::consts::PI
    } else {
        wrapped
    }
}

/// Inertial reference frames produced by the built-in kernel.
///
/// Identifiers are case-insensitive: `icrs`/`gcrs` select [`ReferenceFrame::Icrs`],
/// `fk5`/`j2000` select [`ReferenceFrame::Fk5J2000`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFrame {
    /// International Celestial Reference System (mean J2000 corrected for the frame bias)
    Icrs,
    /// Mean equator and equinox of J2000.0 (dynamical, IAU 1976 precession)
    Fk5J2000,
}

impl FromStr for ReferenceFrame {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "icrs" | "gcrs" => Ok(ReferenceFrame::Icrs),
            "fk5" | "j2000" => Ok(ReferenceFrame::Fk5J2000),
            _ => Err(KernelError::UnsupportedFrame(s.to_string())),
        }
    }
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_passive_rotation_convention() {
        // Rotating the axes by +90° about Z moves the old Y axis onto the new X axis
        let v = rot_z(FRAC_PI_2) * Vector3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(v, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-15);

        let v = rot_x(FRAC_PI_2) * Vector3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(v, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-15);

        let v = rot_y(FRAC_PI_2) * Vector3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(v, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-15);
    }

    #[test]
    fn test_rotmt_is_orthonormal() {
        let m = rotmt(0.3, Axis::Y);
        assert_relative_eq!(m * m.transpose(), Matrix3::identity(), epsilon = 1e-15);
        assert_relative_eq!(rot_y(0.3), m.transpose(), epsilon = 1e-15);
    }

    #[test]
    fn test_radec_unit_round_trip() {
        let (ra, dec) = (8.3_f64.to_radians(), 16.3_f64.to_radians());
        let v = radec_to_unit(ra, dec);
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-15);

        let (ra2, dec2) = unit_to_radec(&v);
        assert_relative_eq!(ra2, ra, epsilon = 1e-15);
        assert_relative_eq!(dec2, dec, epsilon = 1e-15);

        // negative azimuth lands in [0, 2π)
        let (ra3, _) = unit_to_radec(&Vector3::new(1.0, -1.0, 0.0));
        assert_relative_eq!(ra3, 7.0 * PI / 4.0, epsilon = 1e-15);
    }

    #[test]
    fn test_wrap_pi() {
        assert_eq!(wrap_pi(PI), PI);
        assert_eq!(wrap_pi(-PI), PI);
        assert_relative_eq!(wrap_pi(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-15);
        assert_relative_eq!(wrap_pi(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-15);
        assert_relative_eq!(wrap_pi(0.25), 0.25, epsilon = 1e-15);
        assert_relative_eq!(wrap_pi(DPI + 0.25), 0.25, epsilon = 1e-14);
    }

    #[test]
    fn test_wrap_two_pi() {
        assert_eq!(wrap_two_pi(0.0), 0.0);
        assert_relative_eq!(wrap_two_pi(-0.5), DPI - 0.5, epsilon = 1e-15);
        assert!(wrap_two_pi(-1e-300) < DPI);
    }

    #[test]
    fn test_reference_frame_from_str() {
        assert_eq!("ICRS".parse::<ReferenceFrame>(), Ok(ReferenceFrame::Icrs));
        assert_eq!(" fk5 ".parse::<ReferenceFrame>(), Ok(ReferenceFrame::Fk5J2000));
        assert_eq!("J2000".parse::<ReferenceFrame>(), Ok(ReferenceFrame::Fk5J2000));
        assert_eq!(
            "galactic".parse::<ReferenceFrame>(),
            Err(KernelError::UnsupportedFrame("galactic".into()))
        );
    }
}
