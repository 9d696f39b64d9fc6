//! Exact closed-form integrator for the driven damped oscillator.

use osc_model::{OscillatorModel, StateVectorModel, StepSample, idx};

use crate::error::SolverResult;
use crate::rk4::rk4_step;

/// Half-width of the damping-ratio band treated as critically damped.
/// Inside the band the underdamped/overdamped formulas divide by a
/// vanishing omega_d and become ill-conditioned.
const CRITICAL_BAND: f64 = 1e-6;

/// Exact solver for the linear, possibly driven, damped oscillator.
///
/// All regime-dependent constants are recomputed from the parameters and
/// state vector on every call, and nothing is retained between calls, so
/// live parameter edits are picked up on the next step. The result is
/// exact for constant parameters over the interval; there is no
/// discretization error in position and velocity.
///
/// Degenerate parameter sets that do not describe an oscillator
/// (non-positive mass or spring constant, or an undamped system driven
/// exactly at resonance, where the steady-state response is unbounded)
/// fall back to a single RK4 step so the solver stays defined for any
/// finite input.
#[derive(Clone, Copy, Debug, Default)]
pub struct Analytical;

impl Analytical {
    pub fn step(&self, model: &mut OscillatorModel, t: f64, dt: f64) -> SolverResult<Vec<StepSample>> {
        if dt == 0.0 {
            return Ok(Vec::new());
        }
        let p = model.params;
        let state = model.state();

        if p.mass <= 0.0 || p.spring_constant <= 0.0 {
            let y_new = rk4_step(model, t, &state, dt);
            model.set_state(&y_new)?;
            return Ok(Vec::new());
        }

        let w0 = (p.spring_constant / p.mass).sqrt();
        let zeta = p.damping / (2.0 * (p.mass * p.spring_constant).sqrt());
        let decay = zeta * w0; // = b / (2m)

        let phi0 = state[idx::PHASE];

        // Steady-state particular solution. The driving phase is an
        // integrated state component, so the particular solution is
        // anchored to it rather than to absolute time.
        let gravity_offset = -p.mass * p.gravity / p.spring_constant;
        let drive = if p.driving {
            let w = p.drive_omega();
            let stiffness = p.spring_constant - p.mass * w * w;
            let denom =
                (stiffness * stiffness + p.damping * p.damping * w * w).sqrt();
            if denom == 0.0 {
                // Undamped at exact resonance: secular growth, no
                // bounded particular solution.
                let y_new = rk4_step(model, t, &state, dt);
                model.set_state(&y_new)?;
                return Ok(Vec::new());
            }
            Some(DriveTerm {
                amplitude: p.spring_constant * p.drive_amplitude / denom,
                omega: w,
                phi0,
                delta: (p.damping * w).atan2(stiffness),
            })
        } else {
            None
        };
        let particular = Particular {
            gravity_offset,
            drive,
        };

        // Transient initial conditions: subtract the particular solution.
        let (xp0, vp0) = particular.eval(0.0);
        let xt0 = state[idx::POSITION] - xp0;
        let vt0 = state[idx::VELOCITY] - vp0;

        let transient = if zeta < 1.0 - CRITICAL_BAND {
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            Transient::Under {
                decay,
                wd,
                c1: xt0,
                c2: (vt0 + decay * xt0) / wd,
            }
        } else if zeta <= 1.0 + CRITICAL_BAND {
            Transient::Critical {
                w0,
                c1: xt0,
                c2: vt0 + w0 * xt0,
            }
        } else {
            let s = w0 * (zeta * zeta - 1.0).sqrt();
            let (r1, r2) = (-decay + s, -decay - s);
            let c1 = (vt0 - r2 * xt0) / (r1 - r2);
            Transient::Over {
                r1,
                r2,
                c1,
                c2: xt0 - c1,
            }
        };

        let solution = Solution {
            transient,
            particular,
        };

        let (x_new, v_new) = solution.eval(dt);

        // Advance the bookkeeping accumulators by Simpson's rule on the
        // closed-form trajectory. These are diagnostics, not dynamics,
        // so quadrature accuracy is sufficient.
        let (x_mid, v_mid) = solution.eval(0.5 * dt);
        let (x_0, v_0) = (state[idx::POSITION], state[idx::VELOCITY]);
        let simpson = |f0: f64, fm: f64, f1: f64| dt / 6.0 * (f0 + 4.0 * fm + f1);

        let drive_power = |tau: f64, v: f64| {
            if p.driving {
                model.drive_force_at(phi0 + p.drive_omega() * tau) * v
            } else {
                0.0
            }
        };

        let mut y_new = state.clone();
        y_new[idx::POSITION] = x_new;
        y_new[idx::VELOCITY] = v_new;
        y_new[idx::PHASE] = if p.driving {
            phi0 + p.drive_omega() * dt
        } else {
            phi0
        };
        y_new[idx::DRIVER_ENERGY] += simpson(
            drive_power(0.0, v_0),
            drive_power(0.5 * dt, v_mid),
            drive_power(dt, v_new),
        );
        y_new[idx::THERMAL_ENERGY] +=
            simpson(p.damping * v_0 * v_0, p.damping * v_mid * v_mid, p.damping * v_new * v_new);
        y_new[idx::SUM_X_SQUARED] += simpson(x_0 * x_0, x_mid * x_mid, x_new * x_new);
        y_new[idx::SUM_V_SQUARED] += simpson(v_0 * v_0, v_mid * v_mid, v_new * v_new);

        model.set_state(&y_new)?;
        Ok(Vec::new())
    }
}

/// Steady-state part of the solution: static gravity offset plus the
/// driven sinusoid (when driving is enabled).
struct Particular {
    gravity_offset: f64,
    drive: Option<DriveTerm>,
}

struct DriveTerm {
    amplitude: f64,
    omega: f64,
    phi0: f64,
    delta: f64,
}

impl Particular {
    /// (x_p, x_p') at offset `tau` into the step.
    fn eval(&self, tau: f64) -> (f64, f64) {
        match &self.drive {
            Some(d) => {
                let arg = d.phi0 + d.omega * tau - d.delta;
                (
                    self.gravity_offset + d.amplitude * arg.sin(),
                    d.amplitude * d.omega * arg.cos(),
                )
            }
            None => (self.gravity_offset, 0.0),
        }
    }
}

/// Homogeneous (transient) part, one variant per damping regime.
enum Transient {
    Under { decay: f64, wd: f64, c1: f64, c2: f64 },
    Critical { w0: f64, c1: f64, c2: f64 },
    Over { r1: f64, r2: f64, c1: f64, c2: f64 },
}

impl Transient {
    /// (x_t, x_t') at offset `tau` into the step.
    fn eval(&self, tau: f64) -> (f64, f64) {
        match *self {
            Transient::Under { decay, wd, c1, c2 } => {
                let env = (-decay * tau).exp();
                let (s, c) = (wd * tau).sin_cos();
                let x = env * (c1 * c + c2 * s);
                let v = env * ((wd * c2 - decay * c1) * c - (wd * c1 + decay * c2) * s);
                (x, v)
            }
            Transient::Critical { w0, c1, c2 } => {
                let env = (-w0 * tau).exp();
                let x = (c1 + c2 * tau) * env;
                let v = (c2 - w0 * (c1 + c2 * tau)) * env;
                (x, v)
            }
            Transient::Over { r1, r2, c1, c2 } => {
                let (e1, e2) = ((r1 * tau).exp(), (r2 * tau).exp());
                (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
            }
        }
    }
}

struct Solution {
    transient: Transient,
    particular: Particular,
}

impl Solution {
    fn eval(&self, tau: f64) -> (f64, f64) {
        let (xt, vt) = self.transient.eval(tau);
        let (xp, vp) = self.particular.eval(tau);
        (xt + xp, vt + vp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc_model::{OscillatorModel, OscillatorParams};

    fn model(k: f64, b: f64, x0: f64, v0: f64) -> OscillatorModel {
        let params = OscillatorParams {
            mass: 1.0,
            spring_constant: k,
            damping: b,
            ..Default::default()
        };
        OscillatorModel::with_initial(params, x0, v0)
    }

    #[test]
    fn zero_dt_is_identity() {
        let mut m = model(100.0, 2.0, 0.3, -0.7);
        let before = m.state();
        let samples = Analytical.step(&mut m, 0.0, 0.0).unwrap();
        assert!(samples.is_empty());
        assert_eq!(m.state(), before);
    }

    #[test]
    fn underdamped_textbook_form() {
        // zeta = 0.1, x0 = 1, v0 = 0:
        // x(t) = e^(-z w0 t)(cos(wd t) + (z w0/wd) sin(wd t))
        let mut m = model(100.0, 2.0, 1.0, 0.0);
        Analytical.step(&mut m, 0.0, 0.5).unwrap();

        let (w0, zeta) = (10.0_f64, 0.1_f64);
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let t = 0.5;
        let expected =
            (-zeta * w0 * t).exp() * ((wd * t).cos() + zeta * w0 / wd * (wd * t).sin());
        assert!((m.position() - expected).abs() < 1e-8);
    }

    #[test]
    fn critically_damped_textbook_form() {
        // zeta = 1, x0 = 1, v0 = 0: x(t) = (1 + w0 t) e^(-w0 t)
        let mut m = model(100.0, 20.0, 1.0, 0.0);
        Analytical.step(&mut m, 0.0, 0.2).unwrap();

        let w0 = 10.0_f64;
        let t = 0.2;
        let expected = (1.0 + w0 * t) * (-w0 * t).exp();
        assert!((m.position() - expected).abs() < 1e-8);
    }

    #[test]
    fn overdamped_decays_without_oscillation() {
        let mut m = model(100.0, 50.0, 1.0, 0.0); // zeta = 2.5
        let mut prev = m.position();
        for i in 0..50 {
            Analytical.step(&mut m, i as f64 * 0.05, 0.05).unwrap();
            assert!(m.position() <= prev + 1e-15, "no overshoot");
            assert!(m.position() >= 0.0, "no sign change");
            prev = m.position();
        }
        assert!(m.position() < 0.1);
    }

    #[test]
    fn regime_boundary_never_divides_by_zero() {
        // Just inside and outside the critical band.
        for b in [20.0 * (1.0 - 1e-9), 20.0, 20.0 * (1.0 + 1e-9)] {
            let mut m = model(100.0, b, 1.0, 0.0);
            Analytical.step(&mut m, 0.0, 0.1).unwrap();
            assert!(m.position().is_finite());
            assert!(m.velocity().is_finite());
        }
    }

    #[test]
    fn undamped_energy_exact_over_many_steps() {
        let mut m = model(100.0, 0.0, 0.1, 0.0);
        let e0 = m.total_energy();
        for i in 0..1_000 {
            Analytical.step(&mut m, i as f64 * 0.01, 0.01).unwrap();
        }
        assert!((m.total_energy() - e0).abs() / e0 < 1e-8);
    }

    #[test]
    fn driven_phase_advances_exactly() {
        let mut p = OscillatorParams {
            mass: 1.0,
            spring_constant: 100.0,
            damping: 2.0,
            driving: true,
            drive_amplitude: 0.1,
            drive_frequency: 1.5,
            ..Default::default()
        };
        p.validate().unwrap();
        let mut m = OscillatorModel::new(p);
        Analytical.step(&mut m, 0.0, 0.25).unwrap();
        let expected = 2.0 * std::f64::consts::PI * 1.5 * 0.25;
        assert!((m.phase() - expected).abs() < 1e-12);
    }

    #[test]
    fn driven_converges_to_steady_state() {
        // After many decay times the response must be the steady-state
        // sinusoid: amplitude X, lagging the drive phase by delta.
        let params = OscillatorParams {
            mass: 1.0,
            spring_constant: 100.0,
            damping: 4.0,
            driving: true,
            drive_amplitude: 0.1,
            drive_frequency: 1.0,
            ..Default::default()
        };
        let mut m = OscillatorModel::new(params);
        let dt = 0.05;
        for i in 0..2_000 {
            Analytical.step(&mut m, i as f64 * dt, dt).unwrap();
        }
        let x_expected =
            params.steady_state_amplitude() * (m.phase() - params.phase_lag()).sin();
        assert!((m.position() - x_expected).abs() < 1e-6);
    }

    #[test]
    fn gravity_shifts_the_equilibrium() {
        let params = OscillatorParams {
            mass: 1.0,
            spring_constant: 100.0,
            damping: 15.0,
            gravity: 9.81,
            ..Default::default()
        };
        let mut m = OscillatorModel::new(params);
        for i in 0..400 {
            Analytical.step(&mut m, i as f64 * 0.05, 0.05).unwrap();
        }
        // Settles at -m*g/k.
        assert!((m.position() + 9.81 / 100.0).abs() < 1e-9);
        assert!(m.velocity().abs() < 1e-9);
    }

    #[test]
    fn degenerate_spring_falls_back_numerically() {
        let params = OscillatorParams {
            mass: 1.0,
            spring_constant: 0.0,
            damping: 0.0,
            gravity: 9.81,
            ..Default::default()
        };
        let mut m = OscillatorModel::new(params);
        Analytical.step(&mut m, 0.0, 0.1).unwrap();
        // Free fall: v = -g*t (RK4 is exact for constant acceleration).
        assert!((m.velocity() + 0.981).abs() < 1e-12);
        assert!(m.position().is_finite());
    }

    #[test]
    fn thermal_energy_tracks_dissipation() {
        // Energy balance: E(0) - E(t) == dissipated heat (undriven).
        let mut m = model(100.0, 2.0, 0.5, 0.0);
        let e0 = m.total_energy();
        for i in 0..200 {
            Analytical.step(&mut m, i as f64 * 0.01, 0.01).unwrap();
        }
        let lost = e0 - m.total_energy();
        assert!(
            (m.thermal_energy() - lost).abs() < 1e-4 * e0,
            "thermal {} vs lost {}",
            m.thermal_energy(),
            lost
        );
    }
}
