//! osc-demo: drive the oscillator engine from the terminal.
//!
//! Steps the simulation at a fixed frame rate and prints periodic
//! readouts plus the steady-state diagnostics. Presentation glue only;
//! all logic lives in the library crates.

use clap::{Parser, ValueEnum};
use osc_model::{OscillatorModel, OscillatorParams};
use osc_sim::SimulationClock;
use osc_solver::SolverKind;

#[derive(Parser)]
#[command(name = "osc-demo")]
#[command(about = "Driven damped oscillator simulation demo", long_about = None)]
struct Cli {
    /// Time-stepping strategy
    #[arg(long, value_enum, default_value_t = SolverArg::Rk4)]
    solver: SolverArg,
    /// Simulated duration in seconds
    #[arg(long, default_value_t = 5.0)]
    duration: f64,
    /// Frame delta in seconds
    #[arg(long, default_value_t = 0.016)]
    frame_dt: f64,
    /// Enable the sinusoidal driver
    #[arg(long)]
    drive: bool,
    /// Driving frequency (Hz)
    #[arg(long, default_value_t = 0.5)]
    drive_frequency: f64,
    /// Spring constant (N/m)
    #[arg(long, default_value_t = 10.0)]
    spring: f64,
    /// Damping coefficient (N*s/m)
    #[arg(long, default_value_t = 0.5)]
    damping: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum SolverArg {
    Rk4,
    Rk45,
    Euler,
    Midpoint,
    Analytical,
}

impl From<SolverArg> for SolverKind {
    fn from(arg: SolverArg) -> Self {
        match arg {
            SolverArg::Rk4 => SolverKind::FixedRk4,
            SolverArg::Rk45 => SolverKind::AdaptiveRk45,
            SolverArg::Euler => SolverKind::AdaptiveEuler,
            SolverArg::Midpoint => SolverKind::ModifiedMidpoint,
            SolverArg::Analytical => SolverKind::Analytical,
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let params = OscillatorParams {
        spring_constant: cli.spring,
        damping: cli.damping,
        driving: cli.drive,
        drive_frequency: cli.drive_frequency,
        ..Default::default()
    };
    if let Err(e) = params.validate() {
        eprintln!("invalid parameters: {e}");
        std::process::exit(1);
    }

    let kind: SolverKind = cli.solver.into();
    let mut clock = SimulationClock::new(kind);
    let mut model = OscillatorModel::with_initial(params, 0.2, 0.0);

    println!(
        "solver={kind}  f0={:.3} Hz  zeta={:.3}  Q={:.2}",
        params.natural_frequency() / (2.0 * std::f64::consts::PI),
        params.damping_ratio(),
        params.quality_factor(),
    );

    let mut next_report = 0.0;
    while clock.time() < cli.duration {
        if let Err(e) = clock.step(&mut model, cli.frame_dt, false) {
            eprintln!("step failed: {e}");
            std::process::exit(1);
        }
        if clock.time() >= next_report {
            println!(
                "t={:6.2}s  x={:+.5} m  v={:+.5} m/s  E={:.5} J",
                clock.time(),
                model.position(),
                model.velocity(),
                model.total_energy(),
            );
            next_report += 0.5;
        }
    }

    if cli.drive {
        println!(
            "steady state: X={:.5} m  phase lag={:.3} rad  <P>={:.5} W",
            params.steady_state_amplitude(),
            params.phase_lag(),
            params.average_drive_power(),
        );
    }
}
