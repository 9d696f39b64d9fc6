//! Driven damped mass-spring oscillator model.

use crate::error::{ModelError, ModelResult};
use crate::params::OscillatorParams;
use crate::state::{StateVectorModel, StepSample};

/// Number of state components.
pub const STATE_LEN: usize = 7;

/// State vector component indices. The order is fixed for the life of a
/// run and shared by `state`, `set_state`, and `derivatives`.
pub mod idx {
    /// Position (m).
    pub const POSITION: usize = 0;
    /// Velocity (m/s).
    pub const VELOCITY: usize = 1;
    /// Driving phase (rad), integrated alongside the mechanical state.
    pub const PHASE: usize = 2;
    /// Energy delivered by the driver so far (J).
    pub const DRIVER_ENERGY: usize = 3;
    /// Energy dissipated by damping so far (J).
    pub const THERMAL_ENERGY: usize = 4;
    /// Running integral of x^2 (m^2 * s), for RMS displacement readouts.
    pub const SUM_X_SQUARED: usize = 5;
    /// Running integral of v^2 (m^2/s), for RMS velocity readouts.
    pub const SUM_V_SQUARED: usize = 6;
}

/// The concrete `StateVectorModel`: a mass on a spring with viscous
/// damping, optional gravity, and an optional sinusoidal driver whose
/// phase is itself an integrated state component.
///
/// Sign convention: position is measured upward, gravity contributes
/// `-m*g` to the force sum. Validated by the energy-conservation and
/// resonance phase tests.
#[derive(Debug, Clone)]
pub struct OscillatorModel {
    /// Physical parameters; mutable at any time by the owner.
    pub params: OscillatorParams,
    state: [f64; STATE_LEN],
}

impl OscillatorModel {
    pub fn new(params: OscillatorParams) -> Self {
        Self {
            params,
            state: [0.0; STATE_LEN],
        }
    }

    /// Model with the given initial position and velocity, everything
    /// else zeroed.
    pub fn with_initial(params: OscillatorParams, position: f64, velocity: f64) -> Self {
        let mut m = Self::new(params);
        m.state[idx::POSITION] = position;
        m.state[idx::VELOCITY] = velocity;
        m
    }

    pub fn position(&self) -> f64 {
        self.state[idx::POSITION]
    }

    pub fn velocity(&self) -> f64 {
        self.state[idx::VELOCITY]
    }

    /// Current driving phase (rad).
    pub fn phase(&self) -> f64 {
        self.state[idx::PHASE]
    }

    pub fn driver_energy(&self) -> f64 {
        self.state[idx::DRIVER_ENERGY]
    }

    pub fn thermal_energy(&self) -> f64 {
        self.state[idx::THERMAL_ENERGY]
    }

    pub fn set_position(&mut self, x: f64) {
        self.state[idx::POSITION] = x;
    }

    pub fn set_velocity(&mut self, v: f64) {
        self.state[idx::VELOCITY] = v;
    }

    /// RMS displacement over the elapsed time, from the running integral.
    pub fn rms_position(&self, elapsed: f64) -> f64 {
        if elapsed > 0.0 {
            (self.state[idx::SUM_X_SQUARED] / elapsed).sqrt()
        } else {
            0.0
        }
    }

    /// RMS velocity over the elapsed time, from the running integral.
    pub fn rms_velocity(&self, elapsed: f64) -> f64 {
        if elapsed > 0.0 {
            (self.state[idx::SUM_V_SQUARED] / elapsed).sqrt()
        } else {
            0.0
        }
    }

    /// Driving force at the given phase (N). Zero when driving is off.
    pub fn drive_force_at(&self, phase: f64) -> f64 {
        if self.params.driving {
            self.params.spring_constant * self.params.drive_amplitude * phase.sin()
        } else {
            0.0
        }
    }

    /// Instantaneous kinetic energy 1/2 m v^2 (J).
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.params.mass * self.velocity() * self.velocity()
    }

    /// Instantaneous potential energy: spring 1/2 k x^2 plus
    /// gravitational m g x (J).
    pub fn potential_energy(&self) -> f64 {
        let x = self.position();
        0.5 * self.params.spring_constant * x * x + self.params.mass * self.params.gravity * x
    }

    /// Instantaneous total mechanical energy (J).
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.potential_energy()
    }
}

impl StateVectorModel for OscillatorModel {
    fn state_len(&self) -> usize {
        STATE_LEN
    }

    fn state(&self) -> Vec<f64> {
        self.state.to_vec()
    }

    fn set_state(&mut self, state: &[f64]) -> ModelResult<()> {
        if state.len() != STATE_LEN {
            return Err(ModelError::StateLen {
                expected: STATE_LEN,
                got: state.len(),
            });
        }
        self.state.copy_from_slice(state);
        Ok(())
    }

    fn derivatives(&self, _t: f64, state: &[f64]) -> Vec<f64> {
        let p = &self.params;
        let x = state[idx::POSITION];
        let v = state[idx::VELOCITY];
        let phase = state[idx::PHASE];

        let f_spring = -p.spring_constant * x;
        let f_damping = -p.damping * v;
        let f_gravity = -p.mass * p.gravity;
        let f_drive = self.drive_force_at(phase);

        let accel = (f_spring + f_damping + f_gravity + f_drive) / p.mass;
        let dphase = if p.driving { p.drive_omega() } else { 0.0 };

        let mut dxdt = [0.0; STATE_LEN];
        dxdt[idx::POSITION] = v;
        dxdt[idx::VELOCITY] = accel;
        dxdt[idx::PHASE] = dphase;
        dxdt[idx::DRIVER_ENERGY] = f_drive * v;
        dxdt[idx::THERMAL_ENERGY] = p.damping * v * v;
        dxdt[idx::SUM_X_SQUARED] = x * x;
        dxdt[idx::SUM_V_SQUARED] = v * v;
        dxdt.to_vec()
    }

    fn sample(&self, t: f64, state: &[f64]) -> StepSample {
        let dxdt = self.derivatives(t, state);
        StepSample {
            time: t,
            position: state[idx::POSITION],
            velocity: state[idx::VELOCITY],
            acceleration: dxdt[idx::VELOCITY],
            applied_force: self.drive_force_at(state[idx::PHASE]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> OscillatorParams {
        OscillatorParams {
            mass: 1.0,
            spring_constant: 100.0,
            damping: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn state_round_trip_is_lossless() {
        let mut m = OscillatorModel::new(reference());
        let original = vec![0.1, -0.2, 1.5, 0.01, 0.02, 0.3, 0.4];
        m.set_state(&original).unwrap();
        assert_eq!(m.state(), original);
    }

    #[test]
    fn set_state_rejects_wrong_length() {
        let mut m = OscillatorModel::new(reference());
        let err = m.set_state(&[1.0, 2.0]).unwrap_err();
        match err {
            ModelError::StateLen { expected, got } => {
                assert_eq!(expected, STATE_LEN);
                assert_eq!(got, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn derivatives_are_pure() {
        let m = OscillatorModel::with_initial(reference(), 0.5, 0.0);
        // The given state argument wins over the stored state.
        let probe = vec![0.1, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let d1 = m.derivatives(0.0, &probe);
        let d2 = m.derivatives(0.0, &probe);
        assert_eq!(d1, d2);
        assert_eq!(d1[idx::POSITION], 1.0);
        // a = (-k*x - b*v) / m = (-100*0.1 - 2*1) / 1
        assert!((d1[idx::VELOCITY] - (-12.0)).abs() < 1e-12);
    }

    #[test]
    fn undriven_phase_is_frozen() {
        let m = OscillatorModel::with_initial(reference(), 0.1, 0.0);
        let d = m.derivatives(0.0, &m.state());
        assert_eq!(d[idx::PHASE], 0.0);
        assert_eq!(d[idx::DRIVER_ENERGY], 0.0);
    }

    #[test]
    fn driven_phase_advances_at_two_pi_f() {
        let mut p = reference();
        p.driving = true;
        p.drive_frequency = 2.0;
        let m = OscillatorModel::new(p);
        let d = m.derivatives(0.0, &m.state());
        assert!((d[idx::PHASE] - 4.0 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn accumulator_derivatives_track_power() {
        let mut p = reference();
        p.driving = true;
        let m = OscillatorModel::new(p);
        let mut s = m.state();
        s[idx::POSITION] = 0.2;
        s[idx::VELOCITY] = 0.5;
        s[idx::PHASE] = std::f64::consts::FRAC_PI_2;
        let d = m.derivatives(0.0, &s);
        // Driver power = k*A*sin(phase) * v = 100*0.1*1*0.5
        assert!((d[idx::DRIVER_ENERGY] - 5.0).abs() < 1e-12);
        // Dissipation = b*v^2 = 2*0.25
        assert!((d[idx::THERMAL_ENERGY] - 0.5).abs() < 1e-12);
        assert!((d[idx::SUM_X_SQUARED] - 0.04).abs() < 1e-12);
        assert!((d[idx::SUM_V_SQUARED] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn gravity_pulls_downward() {
        let mut p = reference();
        p.damping = 0.0;
        p.gravity = 9.81;
        let m = OscillatorModel::new(p);
        let d = m.derivatives(0.0, &m.state());
        assert!((d[idx::VELOCITY] + 9.81).abs() < 1e-12);
    }

    #[test]
    fn sample_reports_drive_force() {
        let mut p = reference();
        p.driving = true;
        let m = OscillatorModel::new(p);
        let mut s = m.state();
        s[idx::PHASE] = std::f64::consts::FRAC_PI_2;
        let sample = m.sample(1.0, &s);
        // F = k*A*sin(pi/2) = 100*0.1
        assert!((sample.applied_force - 10.0).abs() < 1e-12);
        assert_eq!(sample.time, 1.0);
    }

    #[test]
    fn energy_bookkeeping_from_state() {
        let m = OscillatorModel::with_initial(reference(), 0.1, 2.0);
        assert!((m.kinetic_energy() - 2.0).abs() < 1e-12);
        assert!((m.potential_energy() - 0.5).abs() < 1e-12);
        assert!((m.total_energy() - 2.5).abs() < 1e-12);
    }
}
