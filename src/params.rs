//! # Position-angle estimation parameters
//!
//! [`PosAngleParams`] gathers the tunables of the finite-difference estimator and of the
//! batch driver:
//!
//! - `offset`: declination step of the probe points (radians). Accepted in `(0, π/18]`; values
//!   outside `[π/3600, π/180]` are still used but logged as a warning when an estimate runs,
//!   since a too small step amplifies rounding noise and a too large one the curvature of the
//!   frame rotation,
//! - `scheme`: straddle (bearing between probes on both sides, the default), forward (one
//!   probe) or central (two probes, bearings averaged at the observed place),
//! - `parallel`: spread a batch over the rayon thread pool.
//!
//! ```rust
//! use posangle::params::{PosAngleParams, ProbeScheme};
//!
//! let params = PosAngleParams::builder()
//!     .offset(std::f64::consts::PI / 720.0)
//!     .scheme(ProbeScheme::Central)
//!     .parallel(false)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.scheme, ProbeScheme::Central);
//! ```

use std::fmt;

use tracing::warn;

use crate::constants::{Radian, DEFAULT_OFFSET, MAX_OFFSET, RECOMMENDED_OFFSET_RANGE};
use crate::posangle_errors::PosAngleError;

/// Placement of the probe points around the observed declination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeScheme {
    /// Bearing from `dec - offset` to `dec + offset`
    #[default]
    Straddle,
    /// Bearing from the observation to `dec + offset`
    Forward,
    /// Mean of the bearings towards `dec + offset` and away from `dec - offset`
    Central,
}

impl fmt::Display for ProbeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeScheme::Straddle => write!(f, "straddle"),
            ProbeScheme::Forward => write!(f, "forward"),
            ProbeScheme::Central => write!(f, "central"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosAngleParams {
    /// Declination offset of the probe point (radians)
    pub offset: Radian,
    pub scheme: ProbeScheme,
    /// Evaluate batches on the rayon thread pool
    pub parallel: bool,
}

impl Default for PosAngleParams {
    fn default() -> Self {
        PosAngleParams {
            offset: DEFAULT_OFFSET,
            scheme: ProbeScheme::Straddle,
            parallel: true,
        }
    }
}

impl PosAngleParams {
    pub fn builder() -> PosAngleParamsBuilder {
        PosAngleParamsBuilder::new()
    }

    /// Same parameters with another offset, validated.
    pub fn with_offset(&self, offset: Radian) -> Result<Self, PosAngleError> {
        PosAngleParamsBuilder { params: *self }.offset(offset).build()
    }
}

impl fmt::Display for PosAngleParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Position-angle parameters")?;
        writeln!(f, "-------------------------")?;
        writeln!(
            f,
            "  offset   = {:.3e} rad ({:.4}°)",
            self.offset,
            self.offset.to_degrees()
        )?;
        writeln!(f, "  scheme   = {}", self.scheme)?;
        write!(f, "  parallel = {}", self.parallel)
    }
}

/// Check a probe offset without logging.
///
/// Return
/// ------
/// * `Ok(true)` when the offset lies in the recommended window, `Ok(false)` when it is
///   accepted but outside it, [`PosAngleError::InvalidParameter`] otherwise.
pub fn check_offset(offset: Radian) -> Result<bool, PosAngleError> {
    if !(offset.is_finite() && offset > 0.0 && offset <= MAX_OFFSET) {
        return Err(PosAngleError::InvalidParameter(format!(
            "offset must lie in (0, π/18] rad, got {offset}"
        )));
    }
    let (low, high) = RECOMMENDED_OFFSET_RANGE;
    Ok((low..=high).contains(&offset))
}

/// [`check_offset`], logging a warning for an accepted offset outside the recommended window.
pub(crate) fn validate_offset(offset: Radian) -> Result<(), PosAngleError> {
    if !check_offset(offset)? {
        let (low, high) = RECOMMENDED_OFFSET_RANGE;
        warn!(
            offset,
            recommended_min = low,
            recommended_max = high,
            "probe offset outside the recommended range"
        );
    }
    Ok(())
}

/// Builder for [`PosAngleParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct PosAngleParamsBuilder {
    params: PosAngleParams,
}

impl PosAngleParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, v: Radian) -> Self {
        self.params.offset = v;
        self
    }

    pub fn scheme(mut self, v: ProbeScheme) -> Self {
        self.params.scheme = v;
        self
    }

    pub fn parallel(mut self, v: bool) -> Self {
        self.params.parallel = v;
        self
    }

    /// Validate and return the parameters.
    ///
    /// Errors
    /// ------
    /// * [`PosAngleError::InvalidParameter`] if the offset is not in `(0, π/18]`.
    pub fn build(self) -> Result<PosAngleParams, PosAngleError> {
        check_offset(self.params.offset)?;
        Ok(self.params)
    }
}

#[cfg(test)]
mod params_test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_defaults() {
        let params = PosAngleParams::builder().build().unwrap();
        assert_eq!(params, PosAngleParams::default());
        assert_eq!(params.offset, PI / 360.0);
        assert_eq!(params.scheme, ProbeScheme::Straddle);
        assert!(params.parallel);
    }

    #[test]
    fn test_offset_bounds() {
        assert!(check_offset(PI / 360.0).unwrap());
        assert!(check_offset(PI / 3600.0).unwrap());
        assert!(!check_offset(1e-7).unwrap());
        assert!(!check_offset(PI / 18.0).unwrap());

        for bad in [0.0, -1e-3, PI / 17.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    PosAngleParams::builder().offset(bad).build(),
                    Err(PosAngleError::InvalidParameter(_))
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_unusual_offset_is_only_reported_at_evaluation() {
        // accepted silently by the builder, validated with a warning by the estimators
        let params = PosAngleParams::builder().offset(1e-7).build().unwrap();
        assert_eq!(params.offset, 1e-7);
        assert!(validate_offset(params.offset).is_ok());
        assert!(validate_offset(0.0).is_err());
    }

    #[test]
    fn test_with_offset_keeps_other_fields() {
        let params = PosAngleParams::builder()
            .scheme(ProbeScheme::Central)
            .parallel(false)
            .build()
            .unwrap();
        let overridden = params.with_offset(PI / 1800.0).unwrap();

        assert_eq!(overridden.offset, PI / 1800.0);
        assert_eq!(overridden.scheme, ProbeScheme::Central);
        assert!(!overridden.parallel);
        assert!(params.with_offset(1.0).is_err());
    }

    #[test]
    fn test_display() {
        let output = format!("{}", PosAngleParams::default());
        assert!(output.contains("scheme   = straddle"));
        assert!(output.contains("parallel = true"));
        assert!(output.contains("(0.5000°)"));
    }
}
