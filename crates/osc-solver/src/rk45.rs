//! Adaptive Dormand-Prince 4(5) integrator.

use osc_core::Tolerances;
use osc_model::{StateVectorModel, StepSample};
use tracing::debug;

use crate::error::{SolverError, SolverResult};

// Dormand-Prince coefficients
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (advancing solution, local extrapolation)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// 4th-order embedded weights
const BE1: f64 = 5179.0 / 57600.0;
const BE3: f64 = 7571.0 / 16695.0;
const BE4: f64 = 393.0 / 640.0;
const BE5: f64 = -92097.0 / 339200.0;
const BE6: f64 = 187.0 / 2100.0;
const BE7: f64 = 1.0 / 40.0;

// Error weights: 5th-order minus 4th-order
const E1: f64 = B1 - BE1;
const E3: f64 = B3 - BE3;
const E4: f64 = B4 - BE4;
const E5: f64 = B5 - BE5;
const E6: f64 = B6 - BE6;
const E7: f64 = -BE7;

/// Adaptive Dormand-Prince 4(5) embedded pair (FSAL).
///
/// Grows/shrinks an internal micro-step to keep the estimated local
/// error under tolerance while the micro-steps exactly tile the outer
/// `[t, t+dt]` interval. Rejections per micro-step are bounded, so the
/// call always terminates and always lands exactly at `t + dt`. One
/// `StepSample` is emitted per accepted micro-step.
#[derive(Clone, Copy, Debug)]
pub struct AdaptiveRk45 {
    /// Local error tolerances (absolute and relative).
    pub tol: Tolerances,
}

impl Default for AdaptiveRk45 {
    fn default() -> Self {
        Self {
            tol: Tolerances {
                abs: 1e-9,
                rel: 1e-6,
            },
        }
    }
}

/// Consecutive rejections allowed before a micro-step is force-accepted.
const MAX_REJECTS: u32 = 20;
/// Hard bound on accepted micro-steps within one outer step.
const MAX_MICRO_STEPS: usize = 10_000;

impl AdaptiveRk45 {
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

        let y0 = model.state();
        let n = y0.len();
        let mut y = y0;
        let mut covered = 0.0_f64;
        let mut h = dt;
        let mut samples = Vec::new();

        let mut y_tmp = vec![0.0; n];
        let mut y_new = vec![0.0; n];
        let mut k7;

        let mut k1 = model.derivatives(t, &y);
        let mut rejects = 0_u32;
        let mut accepted = 0_usize;

        loop {
            let remaining = dt - covered;
            if remaining <= 4.0 * f64::EPSILON * dt {
                break;
            }
            // Past the micro-step budget: finish in one forced stride.
            let exhausted = accepted >= MAX_MICRO_STEPS;
            if exhausted {
                h = remaining;
            } else {
                h = h.min(remaining);
            }
            let t_local = t + covered;

            for i in 0..n {
                y_tmp[i] = y[i] + h * A21 * k1[i];
            }
            let k2 = model.derivatives(t_local + h / 5.0, &y_tmp);

            for i in 0..n {
                y_tmp[i] = y[i] + h * (A31 * k1[i] + A32 * k2[i]);
            }
            let k3 = model.derivatives(t_local + 3.0 * h / 10.0, &y_tmp);

            for i in 0..n {
                y_tmp[i] = y[i] + h * (A41 * k1[i] + A42 * k2[i] + A43 * k3[i]);
            }
            let k4 = model.derivatives(t_local + 4.0 * h / 5.0, &y_tmp);

            for i in 0..n {
                y_tmp[i] = y[i] + h * (A51 * k1[i] + A52 * k2[i] + A53 * k3[i] + A54 * k4[i]);
            }
            let k5 = model.derivatives(t_local + 8.0 * h / 9.0, &y_tmp);

            for i in 0..n {
                y_tmp[i] = y[i]
                    + h * (A61 * k1[i] + A62 * k2[i] + A63 * k3[i] + A64 * k4[i] + A65 * k5[i]);
            }
            let k6 = model.derivatives(t_local + h, &y_tmp);

            for i in 0..n {
                y_new[i] =
                    y[i] + h * (B1 * k1[i] + B3 * k3[i] + B4 * k4[i] + B5 * k5[i] + B6 * k6[i]);
            }

            // FSAL stage: first evaluation of the next step
            k7 = model.derivatives(t_local + h, &y_new);

            let mut err_norm = 0.0;
            for i in 0..n {
                let ei = h
                    * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i] + E7 * k7[i]);
                let sc = self.tol.abs + self.tol.rel * y[i].abs().max(y_new[i].abs());
                err_norm += (ei / sc) * (ei / sc);
            }
            err_norm = (err_norm / n as f64).sqrt();

            let force_accept = rejects >= MAX_REJECTS || exhausted;
            if err_norm <= 1.0 || force_accept {
                if force_accept && err_norm > 1.0 {
                    debug!(err_norm, h, "rk45: force-accepting micro-step");
                }
                covered += h;
                y.copy_from_slice(&y_new);
                k1.copy_from_slice(&k7);
                samples.push(model.sample(t + covered, &y));
                rejects = 0;
                accepted += 1;
            } else {
                rejects += 1;
            }

            let factor = if err_norm == 0.0 {
                5.0
            } else {
                (0.9 * err_norm.powf(-0.2)).clamp(0.2, 5.0)
            };
            h *= factor;
        }

        model.set_state(&y)?;
        Ok(samples)
    }
}
