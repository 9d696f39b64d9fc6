//! Fixed-step classical Runge-Kutta integrator.

use osc_model::{StateVectorModel, StepSample};

use crate::error::SolverResult;

/// Classical 4th-order Runge-Kutta over the full `dt`.
///
/// Deterministic, no error estimate, no internal subdivision. Error
/// accumulates as O(dt^4) per step; stable for the reference oscillator
/// up to the harness dt cap.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedRk4;

impl FixedRk4 {
    pub fn step<M: StateVectorModel>(
        &self,
        model: &mut M,
        t: f64,
        dt: f64,
    ) -> SolverResult<Vec<StepSample>> {
        if dt == 0.0 {
            return Ok(Vec::new());
        }
        let y = model.state();
        let y_new = rk4_step(model, t, &y, dt);
        model.set_state(&y_new)?;
        Ok(Vec::new())
    }
}

/// One RK4 step on a raw state vector. Shared with the analytical
/// solver's degenerate-parameter fallback and the adaptive tests.
pub(crate) fn rk4_step<M: StateVectorModel>(model: &M, t: f64, y: &[f64], dt: f64) -> Vec<f64> {
    let n = y.len();

    let k1 = model.derivatives(t, y);

    let mut y_tmp = vec![0.0; n];
    for i in 0..n {
        y_tmp[i] = y[i] + 0.5 * dt * k1[i];
    }
    let k2 = model.derivatives(t + 0.5 * dt, &y_tmp);

    for i in 0..n {
        y_tmp[i] = y[i] + 0.5 * dt * k2[i];
    }
    let k3 = model.derivatives(t + 0.5 * dt, &y_tmp);

    for i in 0..n {
        y_tmp[i] = y[i] + dt * k3[i];
    }
    let k4 = model.derivatives(t + dt, &y_tmp);

    // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
    let mut y_new = vec![0.0; n];
    for i in 0..n {
        y_new[i] = y[i] + dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    y_new
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc_model::{OscillatorModel, OscillatorParams};

    fn shm() -> OscillatorModel {
        let params = OscillatorParams {
            mass: 1.0,
            spring_constant: 100.0,
            damping: 0.0,
            ..Default::default()
        };
        OscillatorModel::with_initial(params, 0.1, 0.0)
    }

    #[test]
    fn zero_dt_is_identity() {
        let mut m = shm();
        let before = m.state();
        let samples = FixedRk4.step(&mut m, 0.0, 0.0).unwrap();
        assert!(samples.is_empty());
        assert_eq!(m.state(), before);
    }

    #[test]
    fn no_subdivision_means_no_samples() {
        let mut m = shm();
        let samples = FixedRk4.step(&mut m, 0.0, 0.01).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn small_steps_track_cosine() {
        // x(t) = 0.1*cos(10 t) for the undamped reference.
        let mut m = shm();
        let dt = 1e-4;
        for i in 0..10_000 {
            FixedRk4.step(&mut m, i as f64 * dt, dt).unwrap();
        }
        let expected = 0.1 * (10.0_f64 * 1.0).cos();
        assert!((m.position() - expected).abs() < 1e-6);
    }

    #[test]
    fn energy_conserved_over_many_steps() {
        let mut m = shm();
        let e0 = m.total_energy();
        let dt = 1e-3;
        for i in 0..5_000 {
            FixedRk4.step(&mut m, i as f64 * dt, dt).unwrap();
        }
        let drift = (m.total_energy() - e0).abs() / e0;
        assert!(drift < 1e-3, "relative energy drift {drift}");
    }

    #[test]
    fn stable_at_dt_cap() {
        let mut m = shm();
        for i in 0..100 {
            FixedRk4.step(&mut m, i as f64 * 0.1, 0.1).unwrap();
        }
        assert!(m.position().is_finite());
        assert!(m.position().abs() < 1.0);
    }
}
