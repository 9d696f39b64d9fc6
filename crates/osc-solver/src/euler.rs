//! Adaptive Euler integrator (Euler/Heun embedded pair).

use osc_core::Tolerances;
use osc_model::{StateVectorModel, StepSample};
use tracing::debug;

use crate::error::{SolverError, SolverResult};

/// Adaptive first-order integrator: forward Euler predictor with a Heun
/// (trapezoidal) corrector as the higher-order reference for step-size
/// control. Advances with the Heun solution.
///
/// Included as a cheap low-accuracy reference; same outer contract as
/// the Dormand-Prince solver (exact interval tiling, bounded rejections,
/// one sample per accepted micro-step).
#[derive(Clone, Copy, Debug)]
pub struct AdaptiveEuler {
    /// Local error tolerances (absolute and relative).
    pub tol: Tolerances,
}

impl Default for AdaptiveEuler {
    fn default() -> Self {
        Self {
            tol: Tolerances {
                abs: 1e-7,
                rel: 1e-4,
            },
        }
    }
}

const MAX_REJECTS: u32 = 20;
const MAX_MICRO_STEPS: usize = 10_000;

impl AdaptiveEuler {
    pub fn step<M: StateVectorModel>(
        &self,
        model: &mut M,
        t: f64,
        dt: f64,
    ) -> SolverResult<Vec<StepSample>> {
        if dt == 0.0 {
            return Ok(Vec::new());
        }
        if !(dt > 0.0) {
            return Err(SolverError::InvalidArg {
                what: "dt must be non-negative and finite",
            });
        }

        let mut y = model.state();
        let n = y.len();
        let mut covered = 0.0_f64;
        let mut h = dt;
        let mut samples = Vec::new();

        let mut y_euler = vec![0.0; n];
        let mut y_heun = vec![0.0; n];

        let mut rejects = 0_u32;
        let mut accepted = 0_usize;

        loop {
            let remaining = dt - covered;
            if remaining <= 4.0 * f64::EPSILON * dt {
                break;
            }
            let exhausted = accepted >= MAX_MICRO_STEPS;
            if exhausted {
                h = remaining;
            } else {
                h = h.min(remaining);
            }
            let t_local = t + covered;

            // Predictor: forward Euler
            let k1 = model.derivatives(t_local, &y);
            for i in 0..n {
                y_euler[i] = y[i] + h * k1[i];
            }

            // Corrector: Heun (order 2 reference)
            let k2 = model.derivatives(t_local + h, &y_euler);
            for i in 0..n {
                y_heun[i] = y[i] + 0.5 * h * (k1[i] + k2[i]);
            }

            // Error estimate: predictor/corrector difference
            let mut err_norm = 0.0;
            for i in 0..n {
                let ei = y_heun[i] - y_euler[i];
                let sc = self.tol.abs + self.tol.rel * y[i].abs().max(y_heun[i].abs());
                err_norm += (ei / sc) * (ei / sc);
            }
            err_norm = (err_norm / n as f64).sqrt();

            let force_accept = rejects >= MAX_REJECTS || exhausted;
            if err_norm <= 1.0 || force_accept {
                if force_accept && err_norm > 1.0 {
                    debug!(err_norm, h, "adaptive euler: force-accepting micro-step");
                }
                covered += h;
                y.copy_from_slice(&y_heun);
                samples.push(model.sample(t + covered, &y));
                rejects = 0;
                accepted += 1;
            } else {
                rejects += 1;
            }

            // First-order controller: exponent -1/2
            let factor = if err_norm == 0.0 {
                5.0
            } else {
                (0.9 * err_norm.powf(-0.5)).clamp(0.2, 5.0)
            };
            h *= factor;
        }

        model.set_state(&y)?;
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc_model::{OscillatorModel, OscillatorParams};

    fn damped() -> OscillatorModel {
        let params = OscillatorParams {
            mass: 1.0,
            spring_constant: 100.0,
            damping: 2.0,
            ..Default::default()
        };
        OscillatorModel::with_initial(params, 0.1, 0.0)
    }

    #[test]
    fn zero_dt_is_identity() {
        let mut m = damped();
        let before = m.state();
        let samples = AdaptiveEuler::default().step(&mut m, 0.0, 0.0).unwrap();
        assert!(samples.is_empty());
        assert_eq!(m.state(), before);
    }

    #[test]
    fn lands_exactly_at_t_plus_dt() {
        let mut m = damped();
        let samples = AdaptiveEuler::default().step(&mut m, 1.0, 0.1).unwrap();
        assert!(!samples.is_empty());
        assert!((samples.last().unwrap().time - 1.1).abs() < 1e-9);
    }

    #[test]
    fn loosely_tracks_the_closed_form() {
        // Low-accuracy reference: expect coarse agreement only.
        let mut m = damped();
        let mut t = 0.0;
        for _ in 0..50 {
            AdaptiveEuler::default().step(&mut m, t, 0.01).unwrap();
            t += 0.01;
        }
        let (w0, zeta) = (10.0, 0.1);
        let wd = w0 * (1.0_f64 - zeta * zeta).sqrt();
        let expected = 0.1
            * (-zeta * w0 * t).exp()
            * ((wd * t).cos() + zeta * w0 / wd * (wd * t).sin());
        assert!((m.position() - expected).abs() < 1e-3);
    }

    #[test]
    fn subdivides_more_than_rk45() {
        let euler_count = {
            let mut m = damped();
            AdaptiveEuler::default().step(&mut m, 0.0, 0.1).unwrap().len()
        };
        let rk45_count = {
            let mut m = damped();
            crate::AdaptiveRk45::default()
                .step(&mut m, 0.0, 0.1)
                .unwrap()
                .len()
        };
        assert!(
            euler_count > rk45_count,
            "low-order pair should need more micro-steps ({euler_count} vs {rk45_count})"
        );
    }
}
