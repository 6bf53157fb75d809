//! # Constants and type definitions for posangle
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants (Earth ellipsoid, rotation rate, speed of light)
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians, JD ↔ MJD)
//! - Type aliases documenting the unit carried by a bare `f64`
//! - Bounds of the finite-difference probe offset

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (GRS1980/WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Nominal Earth rotation rate in rad/s (IERS conventions)
pub const EARTH_ROTATION_RATE: f64 = 7.292_115_146_706_979e-5;

/// Speed of light in m/s
pub const VLIGHT: f64 = 2.99792458e8;

// -------------------------------------------------------------------------------------------------
// Finite-difference probe
// -------------------------------------------------------------------------------------------------

/// Default declination offset of the position-angle probe (0.5°)
pub const DEFAULT_OFFSET: Radian = std::f64::consts::PI / 360.0;

/// Largest accepted probe offset (10°)
pub const MAX_OFFSET: Radian = std::f64::consts::PI / 18.0;

/// Recommended offset window: outside it the estimate is still computed but a warning is logged
pub const RECOMMENDED_OFFSET_RANGE: (Radian, Radian) =
    (std::f64::consts::PI / 3600.0, std::f64::consts::PI / 180.0);

/// Default largest spacing (days) between two EOP records bracketing a lookup
pub const DEFAULT_MAX_EOP_GAP: f64 = 5.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Time offset in seconds
pub type Second = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Julian Date (days)
pub type JD = f64;
