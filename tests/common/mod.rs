#![allow(dead_code)]

use std::f64::consts::PI;

use camino::Utf8PathBuf;
use posangle::eop::provider::EopProvider;
use posangle::estimator::Observation;
use posangle::kernel::{KernelError, KernelRequest};
use posangle::posangle::PosAngle;
use posangle::site::Site;

pub const FINALS_1973: &str = "finals:tests/data/finals2000A_1973.txt";
pub const CSV_1973: &str = "csv:tests/data/eop_1973.csv";

/// JD 2441733.0 (1973-02-21 12:00 UTC)
pub const SCENARIO_EPOCH: f64 = 2441733.0;

pub fn palomar() -> Site {
    Site::from_degrees(-116.5833461618117, 33.97391383157283, 1073.4610445341686).unwrap()
}

pub fn scenario_observation() -> Observation {
    Observation::new(SCENARIO_EPOCH, 8.3_f64.to_radians(), 16.3_f64.to_radians())
}

pub fn posangle_1973() -> PosAngle {
    PosAngle::new(FINALS_1973).unwrap()
}

pub fn provider_1973() -> EopProvider {
    EopProvider::new(FINALS_1973).unwrap()
}

pub fn identity(req: &KernelRequest<'_>) -> Result<(f64, f64), KernelError> {
    Ok((req.ra, req.dec))
}

/// Absolute difference of two angles, modulo 2π.
pub fn angle_abs_diff(a: f64, b: f64) -> f64 {
    let tau = 2.0 * PI;
    let mut d = (a - b) % tau;
    if d > PI {
        d -= tau;
    }
    if d < -PI {
        d += tau;
    }
    d.abs()
}

/// Unique scratch file path under the system temporary directory.
pub fn scratch_path(name: &str) -> Utf8PathBuf {
    let dir = Utf8PathBuf::from_path_buf(std::env::temp_dir()).unwrap();
    dir.join(format!("posangle-{}-{name}", std::process::id()))
}
