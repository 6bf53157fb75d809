//! # Astrometric kernels
//!
//! The position-angle engine never hard-codes an astrometric library: it talks to an
//! [`AstrometricKernel`], a single capability mapping an apparent place seen from a site at
//! a given epoch to a place in an inertial reference frame.
//!
//! Two kinds of kernels are available:
//!
//! * [`ClassicalKernel`](crate::kernel::classical::ClassicalKernel), the built-in equinox-based
//!   reduction (IAU 1976 precession, IAU 1980 nutation, first-order aberration),
//! * any closure `Fn(&KernelRequest) -> Result<(Radian, Radian), KernelError>`, which makes it
//!   easy to plug an external backend or a test double.
//!
//! ```rust
//! use posangle::kernel::{AstrometricKernel, KernelError, KernelRequest};
//!
//! // A kernel leaving coordinates untouched
//! let identity = |req: &KernelRequest<'_>| -> Result<(f64, f64), KernelError> {
//!     Ok((req.ra, req.dec))
//! };
//! # fn takes_kernel<K: AstrometricKernel>(_: &K) {}
//! # takes_kernel(&identity);
//! ```

pub mod classical;

use thiserror::Error;

use crate::constants::{Radian, MJD};
use crate::eop::EopValues;
use crate::site::Site;

/// Diagnostic reported by a kernel that rejected its inputs or failed internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("non-finite {field}: {value}")]
    NonFiniteInput { field: &'static str, value: f64 },

    #[error("declination {0} rad is outside [-π/2, π/2]")]
    DeclinationOutOfRange(Radian),

    #[error("unsupported reference frame '{0}'")]
    UnsupportedFrame(String),

    #[error("backend failure: {0}")]
    Backend(String),
}

/// Everything a kernel needs to map one apparent place to the reference frame.
#[derive(Debug, Clone, Copy)]
pub struct KernelRequest<'a> {
    /// Epoch as a Modified Julian Date in UTC
    pub epoch_mjd: MJD,
    /// Apparent right ascension (radians)
    pub ra: Radian,
    /// Apparent declination (radians)
    pub dec: Radian,
    /// Observing site
    pub site: &'a Site,
    /// Earth orientation parameters interpolated at `epoch_mjd`
    pub eop: EopValues,
    /// Reference-frame identifier, interpreted by the kernel only
    pub frame: &'a str,
}

/// Apparent → reference frame mapping used by the frame transform adapter.
///
/// Implementations must be pure: identical requests give identical results. They are
/// shared across the worker threads of a batch, hence the `Send + Sync` bound.
pub trait AstrometricKernel: Send + Sync {
    /// Map the apparent place of `request` to `(ra, dec)` in the reference frame.
    fn apparent_to_reference(
        &self,
        request: &KernelRequest<'_>,
    ) -> Result<(Radian, Radian), KernelError>;
}

impl<F> AstrometricKernel for F
where
    F: Fn(&KernelRequest<'_>) -> Result<(Radian, Radian), KernelError> + Send + Sync,
{
    fn apparent_to_reference(
        &self,
        request: &KernelRequest<'_>,
    ) -> Result<(Radian, Radian), KernelError> {
        self(request)
    }
}
