use std::f64::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_abs_diff_eq;
use nalgebra::{Rotation3, Vector3};
use posangle::kernel::{KernelError, KernelRequest};
use posangle::params::{PosAngleParams, ProbeScheme};
use posangle::posangle::PosAngle;
use posangle::posangle_errors::PosAngleError;
use posangle::ref_system::{radec_to_unit, unit_to_radec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

mod common;
use common::{angle_abs_diff, identity, palomar, provider_1973, SCENARIO_EPOCH};

/// Kernel applying a fixed rotation of the sky about the x axis (active, angle `alpha`).
fn tilted(
    alpha: f64,
) -> impl Fn(&KernelRequest<'_>) -> Result<(f64, f64), KernelError> + Send + Sync {
    let rotation = Rotation3::from_axis_angle(&Vector3::x_axis(), alpha);
    move |req: &KernelRequest<'_>| -> Result<(f64, f64), KernelError> {
        Ok(unit_to_radec(&(rotation * radec_to_unit(req.ra, req.dec))))
    }
}

#[test]
fn test_identity_kernel_gives_zero() {
    let posangle = PosAngle::from_provider(provider_1973()).with_kernel(identity);
    let mut rng = StdRng::seed_from_u64(42);
    let n = 200;

    let epochs: Vec<f64> = (0..n).map(|_| rng.random_range(2441685.0..2441799.0)).collect();
    let ras: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..2.0 * PI)).collect();
    let decs: Vec<f64> = (0..n).map(|_| rng.random_range(-1.5..1.5)).collect();

    let angles = posangle
        .estimate_batch(&epochs, &ras, &decs, &palomar(), "icrs", None)
        .unwrap();
    for pa in angles {
        assert_abs_diff_eq!(pa, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_pure_rotation_gives_analytic_angle() {
    // a point of the x axis is left in place while its north direction turns by -alpha,
    // so the reference north sits at +alpha from the apparent north
    for alpha in [0.01, 0.3, -1.1, 2.5] {
        for (scheme, tolerance) in [
            (ProbeScheme::Forward, 1e-10),
            (ProbeScheme::Central, 1e-10),
            // the bearing is taken at the southern probe, off the rotation axis
            (ProbeScheme::Straddle, 5e-5),
        ] {
            let posangle = PosAngle::from_provider(provider_1973())
                .with_kernel(tilted(alpha))
                .with_params(PosAngleParams::builder().scheme(scheme).build().unwrap());

            let angles = posangle
                .estimate_batch(&[SCENARIO_EPOCH], &[0.0], &[0.0], &palomar(), "icrs", None)
                .unwrap();
            assert!(
                angle_abs_diff(angles[0], alpha) < tolerance,
                "alpha={alpha} scheme={scheme}: {}",
                angles[0]
            );
        }
    }
}

#[test]
fn test_range_invariant() {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let n = 500;

    for alpha in [0.2, 1.9, -3.0] {
        let posangle = PosAngle::from_provider(provider_1973()).with_kernel(tilted(alpha));
        let epochs = vec![SCENARIO_EPOCH; n];
        let ras: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..2.0 * PI)).collect();
        let decs: Vec<f64> = (0..n)
            .map(|_| rng.random_range(-PI / 2.0..=PI / 2.0))
            .collect();

        let angles = posangle
            .estimate_batch(&epochs, &ras, &decs, &palomar(), "icrs", None)
            .unwrap();
        assert_eq!(angles.len(), n);
        for pa in angles {
            assert!(pa.is_finite());
            assert!(pa > -PI && pa <= PI, "{pa}");
        }
    }
}

#[test]
fn test_shape_mismatch_never_calls_the_kernel() {
    let calls = AtomicUsize::new(0);
    let counting = |req: &KernelRequest<'_>| -> Result<(f64, f64), KernelError> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok((req.ra, req.dec))
    };
    let posangle = PosAngle::from_provider(provider_1973()).with_kernel(counting);

    let err = posangle
        .estimate_batch(
            &[SCENARIO_EPOCH, SCENARIO_EPOCH],
            &[0.1],
            &[0.2, 0.3],
            &palomar(),
            "icrs",
            None,
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Batch arrays have mismatched lengths: epochs=2, ra=1, dec=2"
    );
    assert_eq!(err.failing_index(), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_kernel_failure_reports_its_index() {
    let failing = |req: &KernelRequest<'_>| -> Result<(f64, f64), KernelError> {
        if req.ra > 3.0 {
            Err(KernelError::Backend(format!("cannot reduce ra={}", req.ra)))
        } else {
            Ok((req.ra, req.dec))
        }
    };
    let posangle = PosAngle::from_provider(provider_1973()).with_kernel(failing);

    let err = posangle
        .estimate_batch(
            &[SCENARIO_EPOCH; 5],
            &[0.5, 1.0, 1.5, 3.5, 4.0],
            &[0.1; 5],
            &palomar(),
            "icrs",
            None,
        )
        .unwrap_err();

    assert_eq!(err.failing_index(), Some(3));
    assert!(matches!(
        err.root(),
        PosAngleError::TransformFailure(KernelError::Backend(msg)) if msg == "cannot reduce ra=3.5"
    ));
}
