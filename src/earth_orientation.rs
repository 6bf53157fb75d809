//! # Earth orientation models
//!
//! Classical (equinox based) models relating the true equator and equinox of date to the
//! mean equator and equinox of J2000 and to the Earth-fixed frame:
//!
//! - [`obleq`]: mean obliquity of the ecliptic (IAU 1976),
//! - [`nutn80`]: nutation in longitude and obliquity (IAU 1980, 106 terms),
//! - [`equequ`] and [`gast`]: equation of the equinoxes and apparent sidereal time,
//! - [`precession_matrix`], [`nutation_matrix`], [`frame_bias_matrix`], [`polar_motion_matrix`].
//!
//! Every matrix follows the passive convention of [`crate::ref_system::rot_x`]: it maps the
//! components of a vector in the source frame to its components in the target frame named
//! in the function documentation.

use nalgebra::Matrix3;

use crate::constants::{ArcSec, Radian, DPI, MJD, RADEG, RADSEC, T2000};
use crate::ref_system::{rot_x, rot_y, rot_z};
use crate::time::gmst;

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// The obliquity is a cubic polynomial in Julian centuries since J2000, evaluated with
/// Horner's method.
pub fn obleq(tjm: MJD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// One periodic term of the IAU 1980 nutation series.
///
/// Multipliers of (l, l', F, D, Ω), then the longitude and obliquity amplitudes and their
/// secular rates, in units of 0.1 mas (per Julian century for the rates).
struct NutationTerm {
    args: [i8; 5],
    psi: f64,
    psi_t: f64,
    eps: f64,
    eps_t: f64,
}

const fn term(args: [i8; 5], psi: f64, psi_t: f64, eps: f64, eps_t: f64) -> NutationTerm {
    NutationTerm {
        args,
        psi,
        psi_t,
        eps,
        eps_t,
    }
}

#[rustfmt::skip]
const NUTATION_1980: [NutationTerm; 106] = [
    term([ 0,  0,  0,  0,  1], -171996.0, -174.2, 92025.0,  8.9),
    term([ 0,  0,  0,  0,  2],    2062.0,    0.2,  -895.0,  0.5),
    term([-2,  0,  2,  0,  1],      46.0,    0.0,   -24.0,  0.0),
    term([-2,  0,  2,  0,  0],     -11.0,    0.0,     0.0,  0.0),
    term([-2,  0,  2,  0,  2],      -3.0,    0.0,     1.0,  0.0),
    term([ 1, -1,  0, -1,  0],      -3.0,    0.0,     0.0,  0.0),
    term([ 0, -2,  2, -2,  1],      -2.0,    0.0,     1.0,  0.0),
    term([ 2,  0, -2,  0,  1],       1.0,    0.0,     0.0,  0.0),
    term([ 0,  0,  2, -2,  2],  -13187.0,   -1.6,  5736.0, -3.1),
    term([ 0,  1,  0,  0,  0],    1426.0,   -3.4,    54.0, -0.1),
    term([ 0,  1,  2, -2,  2],    -517.0,    1.2,   224.0, -0.6),
    term([ 0, -1,  2, -2,  2],     217.0,   -0.5,   -95.0,  0.3),
    term([ 0,  0,  2, -2,  1],     129.0,    0.1,   -70.0,  0.0),
    term([ 2,  0,  0, -2,  0],      48.0,    0.0,     1.0,  0.0),
    term([ 0,  0,  2, -2,  0],     -22.0,    0.0,     0.0,  0.0),
    term([ 0,  2,  0,  0,  0],      17.0,   -0.1,     0.0,  0.0),
    term([ 0,  1,  0,  0,  1],     -15.0,    0.0,     9.0,  0.0),
    term([ 0,  2,  2, -2,  2],     -16.0,    0.1,     7.0,  0.0),
    term([ 0, -1,  0,  0,  1],     -12.0,    0.0,     6.0,  0.0),
    term([-2,  0,  0,  2,  1],      -6.0,    0.0,     3.0,  0.0),
    term([ 0, -1,  2, -2,  1],      -5.0,    0.0,     3.0,  0.0),
    term([ 2,  0,  0, -2,  1],       4.0,    0.0,    -2.0,  0.0),
    term([ 0,  1,  2, -2,  1],       4.0,    0.0,    -2.0,  0.0),
    term([ 1,  0,  0, -1,  0],      -4.0,    0.0,     0.0,  0.0),
    term([ 2,  1,  0, -2,  0],       1.0,    0.0,     0.0,  0.0),
    term([ 0,  0, -2,  2,  1],       1.0,    0.0,     0.0,  0.0),
    term([ 0,  1, -2,  2,  0],      -1.0,    0.0,     0.0,  0.0),
    term([ 0,  1,  0,  0,  2],       1.0,    0.0,     0.0,  0.0),
    term([-1,  0,  0,  1,  1],       1.0,    0.0,     0.0,  0.0),
    term([ 0,  1,  2, -2,  0],      -1.0,    0.0,     0.0,  0.0),
    term([ 0,  0,  2,  0,  2],   -2274.0,   -0.2,   977.0, -0.5),
    term([ 1,  0,  0,  0,  0],     712.0,    0.1,    -7.0,  0.0),
    term([ 0,  0,  2,  0,  1],    -386.0,   -0.4,   200.0,  0.0),
    term([ 1,  0,  2,  0,  2],    -301.0,    0.0,   129.0, -0.1),
    term([ 1,  0,  0, -2,  0],    -158.0,    0.0,    -1.0,  0.0),
    term([-1,  0,  2,  0,  2],     123.0,    0.0,   -53.0,  0.0),
    term([ 0,  0,  0,  2,  0],      63.0,    0.0,    -2.0,  0.0),
    term([ 1,  0,  0,  0,  1],      63.0,    0.1,   -33.0,  0.0),
    term([-1,  0,  0,  0,  1],     -58.0,   -0.1,    32.0,  0.0),
    term([-1,  0,  2,  2,  2],     -59.0,    0.0,    26.0,  0.0),
    term([ 1,  0,  2,  0,  1],     -51.0,    0.0,    27.0,  0.0),
    term([ 0,  0,  2,  2,  2],     -38.0,    0.0,    16.0,  0.0),
    term([ 2,  0,  0,  0,  0],      29.0,    0.0,    -1.0,  0.0),
    term([ 1,  0,  2, -2,  2],      29.0,    0.0,   -12.0,  0.0),
    term([ 2,  0,  2,  0,  2],     -31.0,    0.0,    13.0,  0.0),
    term([ 0,  0,  2,  0,  0],      26.0,    0.0,    -1.0,  0.0),
    term([-1,  0,  2,  0,  1],      21.0,    0.0,   -10.0,  0.0),
    term([-1,  0,  0,  2,  1],      16.0,    0.0,    -8.0,  0.0),
    term([ 1,  0,  0, -2,  1],     -13.0,    0.0,     7.0,  0.0),
    term([-1,  0,  2,  2,  1],     -10.0,    0.0,     5.0,  0.0),
    term([ 1,  1,  0, -2,  0],      -7.0,    0.0,     0.0,  0.0),
    term([ 0,  1,  2,  0,  2],       7.0,    0.0,    -3.0,  0.0),
    term([ 0, -1,  2,  0,  2],      -7.0,    0.0,     3.0,  0.0),
    term([ 1,  0,  2,  2,  2],      -8.0,    0.0,     3.0,  0.0),
    term([ 1,  0,  0,  2,  0],       6.0,    0.0,     0.0,  0.0),
    term([ 2,  0,  2, -2,  2],       6.0,    0.0,    -3.0,  0.0),
    term([ 0,  0,  0,  2,  1],      -6.0,    0.0,     3.0,  0.0),
    term([ 0,  0,  2,  2,  1],      -7.0,    0.0,     3.0,  0.0),
    term([ 1,  0,  2, -2,  1],       6.0,    0.0,    -3.0,  0.0),
    term([ 0,  0,  0, -2,  1],      -5.0,    0.0,     3.0,  0.0),
    term([ 1, -1,  0,  0,  0],       5.0,    0.0,     0.0,  0.0),
    term([ 2,  0,  2,  0,  1],      -5.0,    0.0,     3.0,  0.0),
    term([ 0,  1,  0, -2,  0],      -4.0,    0.0,     0.0,  0.0),
    term([ 1,  0, -2,  0,  0],       4.0,    0.0,     0.0,  0.0),
    term([ 0,  0,  0,  1,  0],      -4.0,    0.0,     0.0,  0.0),
    term([ 1,  1,  0,  0,  0],      -3.0,    0.0,     0.0,  0.0),
    term([ 1,  0,  2,  0,  0],       3.0,    0.0,     0.0,  0.0),
    term([ 1, -1,  2,  0,  2],      -3.0,    0.0,     1.0,  0.0),
    term([-1, -1,  2,  2,  2],      -3.0,    0.0,     1.0,  0.0),
    term([-2,  0,  0,  0,  1],      -2.0,    0.0,     1.0,  0.0),
    term([ 3,  0,  2,  0,  2],      -3.0,    0.0,     1.0,  0.0),
    term([ 0, -1,  2,  2,  2],      -3.0,    0.0,     1.0,  0.0),
    term([ 1,  1,  2,  0,  2],       2.0,    0.0,    -1.0,  0.0),
    term([-1,  0,  2, -2,  1],      -2.0,    0.0,     1.0,  0.0),
    term([ 2,  0,  0,  0,  1],       2.0,    0.0,    -1.0,  0.0),
    term([ 1,  0,  0,  0,  2],      -2.0,    0.0,     1.0,  0.0),
    term([ 3,  0,  0,  0,  0],       2.0,    0.0,     0.0,  0.0),
    term([ 0,  0,  2,  1,  2],       2.0,    0.0,    -1.0,  0.0),
    term([-1,  0,  0,  0,  2],       1.0,    0.0,    -1.0,  0.0),
    term([ 1,  0,  0, -4,  0],      -1.0,    0.0,     0.0,  0.0),
    term([-2,  0,  2,  2,  2],       1.0,    0.0,    -1.0,  0.0),
    term([-1,  0,  2,  4,  2],      -2.0,    0.0,     1.0,  0.0),
    term([ 2,  0,  0, -4,  0],      -1.0,    0.0,     0.0,  0.0),
    term([ 1,  1,  2, -2,  2],       1.0,    0.0,    -1.0,  0.0),
    term([ 1,  0,  2,  2,  1],      -1.0,    0.0,     1.0,  0.0),
    term([-2,  0,  2,  4,  2],      -1.0,    0.0,     1.0,  0.0),
    term([-1,  0,  4,  0,  2],       1.0,    0.0,     0.0,  0.0),
    term([ 1, -1,  0, -2,  0],       1.0,    0.0,     0.0,  0.0),
    term([ 2,  0,  2, -2,  1],       1.0,    0.0,    -1.0,  0.0),
    term([ 2,  0,  2,  2,  2],      -1.0,    0.0,     0.0,  0.0),
    term([ 1,  0,  0,  2,  1],      -1.0,    0.0,     0.0,  0.0),
    term([ 0,  0,  4, -2,  2],       1.0,    0.0,     0.0,  0.0),
    term([ 3,  0,  2, -2,  2],       1.0,    0.0,     0.0,  0.0),
    term([ 1,  0,  2, -2,  0],      -1.0,    0.0,     0.0,  0.0),
    term([ 0,  1,  2,  0,  1],       1.0,    0.0,     0.0,  0.0),
    term([-1, -1,  0,  2,  1],       1.0,    0.0,     0.0,  0.0),
    term([ 0,  0, -2,  0,  1],      -1.0,    0.0,     0.0,  0.0),
    term([ 0,  0,  2, -1,  2],      -1.0,    0.0,     0.0,  0.0),
    term([ 0,  1,  0,  2,  0],      -1.0,    0.0,     0.0,  0.0),
    term([ 1,  0, -2, -2,  0],      -1.0,    0.0,     0.0,  0.0),
    term([ 0, -1,  2,  0,  1],      -1.0,    0.0,     0.0,  0.0),
    term([ 1,  1,  0, -2,  1],      -1.0,    0.0,     0.0,  0.0),
    term([ 1,  0, -2,  2,  0],      -1.0,    0.0,     0.0,  0.0),
    term([ 2,  0,  0,  2,  0],       1.0,    0.0,     0.0,  0.0),
    term([ 0,  0,  2,  4,  2],      -1.0,    0.0,     0.0,  0.0),
    term([ 0,  1,  0,  1,  0],       1.0,    0.0,     0.0,  0.0),
];

/// Compute the nutation angles in longitude and obliquity using the IAU 1980 (Wahr) model.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (in TT time scale).
///
/// Returns
/// --------
/// * A tuple `(Δψ, Δε)` in arcseconds.
///
/// The five fundamental arguments (mean anomalies of the Moon and the Sun, argument of
/// latitude of the Moon, mean elongation of the Moon, longitude of the lunar node) are cubic
/// polynomials in Julian centuries; the angles are the sums of the 106 periodic terms of
/// [`NUTATION_1980`].
pub fn nutn80(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = (tjm - T2000) / 36525.0;
    let t2 = t * t;
    let t3 = t2 * t;

    let fundamental = [
        (485866.733 + 1717915922.633 * t + 31.310 * t2 + 0.064 * t3) * RADSEC % DPI,
        (1287099.804 + 129596581.224 * t - 0.577 * t2 - 0.012 * t3) * RADSEC % DPI,
        (335778.877 + 1739527263.137 * t - 13.257 * t2 + 0.011 * t3) * RADSEC % DPI,
        (1072261.307 + 1602961601.328 * t - 6.891 * t2 + 0.019 * t3) * RADSEC % DPI,
        (450160.280 - 6962890.539 * t + 7.455 * t2 + 0.008 * t3) * RADSEC % DPI,
    ];

    // smallest terms first to limit the rounding of the large ones
    let (dpsi, deps) = NUTATION_1980
        .iter()
        .rev()
        .fold((0.0, 0.0), |(dpsi, deps), term| {
            let arg: f64 = term
                .args
                .iter()
                .zip(fundamental.iter())
                .map(|(&k, &a)| f64::from(k) * a)
                .sum();
            let (sin_arg, cos_arg) = arg.sin_cos();
            (
                dpsi + (term.psi + term.psi_t * t) * sin_arg,
                deps + (term.eps + term.eps_t * t) * cos_arg,
            )
        });

    (dpsi * 1e-4, deps * 1e-4)
}

/// Equation of the equinoxes `Δψ·cos(ε)` in radians (IAU 1982 form, without the
/// complementary terms).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
pub fn equequ(tjm: MJD) -> Radian {
    let (dpsi, _deps) = nutn80(tjm);
    RADSEC * dpsi * obleq(tjm).cos()
}

/// Greenwich apparent sidereal time in radians, normalized to `[0, 2π)`.
///
/// Arguments
/// ---------
/// * `ut1`: Modified Julian Date in UT1, drives the Earth rotation.
/// * `tt`: the same instant in TT, drives the equation of the equinoxes.
pub fn gast(ut1: MJD, tt: MJD) -> Radian {
    (gmst(ut1) + equequ(tt)).rem_euclid(DPI)
}

/// Precession matrix from the mean equator and equinox of J2000 to the mean equator and
/// equinox of date (IAU 1976, Lieske et al. 1977).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date in TT scale.
///
/// Returns
/// --------
/// * `P = R3(−z) · R2(θ) · R3(−ζ)`, such that `v_date = P · v_J2000`.
pub fn precession_matrix(tjm: MJD) -> Matrix3<f64> {
    let t = (tjm - T2000) / 36525.0;

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    rot_z(-z) * rot_y(theta) * rot_z(-zeta)
}

/// Nutation matrix from the mean equator and equinox of date to the true equator and
/// equinox of date (IAU 1980).
///
/// Returns `N = R1(−(ε + Δε)) · R3(−Δψ) · R1(ε)`, such that `v_true = N · v_mean`.
pub fn nutation_matrix(tjm: MJD) -> Matrix3<f64> {
    let epsm = obleq(tjm);
    let (dpsi, deps) = nutn80(tjm);
    let epst = epsm + deps * RADSEC;

    rot_x(-epst) * rot_z(-dpsi * RADSEC) * rot_x(epsm)
}

/// Frame bias matrix from the ICRS to the mean equator and equinox of J2000
/// (IAU 2000 offsets of the pole and of the equinox).
///
/// Returns `B`, such that `v_J2000 = B · v_ICRS`.
pub fn frame_bias_matrix() -> Matrix3<f64> {
    const DPSI_BIAS: ArcSec = -0.041775;
    const DEPS_BIAS: ArcSec = -0.0068192;
    const DRA0: ArcSec = -0.0146;
    const EPS0: ArcSec = 84381.448;

    let sin_eps0 = (EPS0 * RADSEC).sin();

    rot_x(-DEPS_BIAS * RADSEC) * rot_y(DPSI_BIAS * sin_eps0 * RADSEC) * rot_z(DRA0 * RADSEC)
}

/// Polar motion matrix from the terrestrial intermediate frame (pole = CIP) to the
/// Earth-fixed frame (pole = IERS reference pole), neglecting the TIO locator.
///
/// Arguments
/// ---------
/// * `xp`, `yp`: pole coordinates in arcseconds, as tabulated by the IERS.
///
/// Returns `W = R1(−yp) · R2(−xp)`, such that `v_ITRS = W · v_TIRS`.
pub fn polar_motion_matrix(xp: ArcSec, yp: ArcSec) -> Matrix3<f64> {
    rot_x(-yp * RADSEC) * rot_y(-xp * RADSEC)
}
