use hifitime::Epoch;

use crate::constants::{Second, DPI, JD, JDTOMJD, MJD, SECONDS_PER_DAY, T2000};

/// Transformation from julian date (JD) in modified julian date (MJD)
///
/// Both dates share the same time scale, the conversion is a pure offset.
///
/// Argument
/// --------
/// * `jd`: a julian date
///
/// Return
/// ------
/// * the corresponding MJD
pub fn jd_to_mjd(jd: JD) -> MJD {
    jd - JDTOMJD
}

/// Transformation from a UTC modified julian date to a TT modified julian date
///
/// The leap second table shipped with hifitime is used for TAI−UTC, then TT = TAI + 32.184 s.
///
/// Argument
/// --------
/// * `mjd_utc`: a MJD in the UTC time scale
///
/// Return
/// ------
/// * the same instant as a MJD in the TT time scale
pub fn utc_to_tt_mjd(mjd_utc: MJD) -> MJD {
    Epoch::from_mjd_utc(mjd_utc).to_mjd_tt_days()
}

/// Transformation from a UTC modified julian date to a UT1 modified julian date
///
/// Argument
/// --------
/// * `mjd_utc`: a MJD in the UTC time scale
/// * `ut1_minus_utc`: the UT1−UTC offset in seconds, as interpolated from the EOP table
///
/// Return
/// ------
/// * the same instant as a MJD in the UT1 time scale
pub fn utc_to_ut1_mjd(mjd_utc: MJD, ut1_minus_utc: Second) -> MJD {
    mjd_utc + ut1_minus_utc / SECONDS_PER_DAY
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let day = tjm.floor();
    let t = (day - T2000) / 36525.0;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;

    (gmst0 + (tjm - day) * DPI * RAP).rem_euclid(DPI)
}
