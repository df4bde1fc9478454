use clap::{Args, Parser, Subcommand};
use dip_controllers::{ControllerKind, get_gain_bounds};
use dip_core::state_from_slice;
use dip_dynamics::{DynamicsModel, Equilibrium, IntegratorType, linear_eigenvalues};
use dip_plant::{PlantConfiguration, load_file, preset_names};
use dip_pso::{
    Bounds, CostPolicy, GainFitness, Horizon, IterationProgress, Objective, PsoConfig,
    optimise_with_progress, simulate_closed_loop,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "dip-cli")]
#[command(about = "Sliding-mode control of a double inverted pendulum, tuned by particle swarm", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in plant presets
    Presets,
    /// Show derived constants and consistency checks of a plant
    Check {
        #[command(flatten)]
        plant: PlantArgs,
    },
    /// Linearize the plant about an equilibrium
    Linearize {
        #[command(flatten)]
        plant: PlantArgs,
        /// upright or downward
        #[arg(long, default_value = "upright")]
        equilibrium: Equilibrium,
    },
    /// Run a closed-loop simulation with fixed gains
    Simulate {
        #[command(flatten)]
        plant: PlantArgs,
        #[command(flatten)]
        horizon: HorizonArgs,
        /// Controller kind (classical, adaptive, sta, hybrid)
        #[arg(long)]
        controller: ControllerKind,
        /// Comma-separated gain vector
        #[arg(long, value_delimiter = ',', required = true)]
        gains: Vec<f64>,
        /// Comma-separated initial state [x, θ1, θ2, ẋ, θ̇1, θ̇2]; defaults to the tuning states
        #[arg(long, value_delimiter = ',')]
        initial: Option<Vec<f64>>,
    },
    /// Tune controller gains with particle swarm optimization
    Tune {
        #[command(flatten)]
        plant: PlantArgs,
        #[command(flatten)]
        horizon: HorizonArgs,
        /// Controller kind (classical, adaptive, sta, hybrid)
        #[arg(long)]
        controller: ControllerKind,
        #[arg(long, default_value_t = 30)]
        particles: usize,
        #[arg(long, default_value_t = 100)]
        iterations: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 0.7)]
        inertia: f64,
        #[arg(long, default_value_t = 1.5)]
        cognitive: f64,
        #[arg(long, default_value_t = 1.5)]
        social: f64,
        /// Evaluate particles on all cores
        #[arg(long)]
        parallel: bool,
    },
}

#[derive(Args)]
struct PlantArgs {
    /// Built-in preset name
    #[arg(long, default_value = "default", conflicts_with = "config")]
    preset: String,
    /// Plant configuration file (.yaml, .yml or .json)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl PlantArgs {
    fn load(&self) -> CliResult<PlantConfiguration> {
        match &self.config {
            Some(path) => {
                info!(path = %path.display(), "loading plant configuration");
                Ok(load_file(path)?)
            }
            None => {
                info!(preset = %self.preset, "using plant preset");
                Ok(PlantConfiguration::create_preset(&self.preset)?)
            }
        }
    }
}

#[derive(Args)]
struct HorizonArgs {
    /// Simulation steps per run
    #[arg(long, default_value_t = 500)]
    steps: usize,
    /// Time step in seconds
    #[arg(long, default_value_t = 0.01)]
    dt: f64,
    /// euler or rk4
    #[arg(long, default_value = "euler")]
    integrator: IntegratorType,
}

impl HorizonArgs {
    fn policy(&self) -> CostPolicy {
        CostPolicy {
            horizon: Horizon {
                dt: self.dt,
                steps: self.steps,
                integrator: self.integrator,
                ..Horizon::default()
            },
            ..CostPolicy::default()
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Presets => cmd_presets(),
        Commands::Check { plant } => cmd_check(&plant),
        Commands::Linearize { plant, equilibrium } => cmd_linearize(&plant, equilibrium),
        Commands::Simulate {
            plant,
            horizon,
            controller,
            gains,
            initial,
        } => cmd_simulate(&plant, &horizon, controller, &gains, initial.as_deref()),
        Commands::Tune {
            plant,
            horizon,
            controller,
            particles,
            iterations,
            seed,
            inertia,
            cognitive,
            social,
            parallel,
        } => {
            let config = PsoConfig {
                n_particles: particles,
                max_iterations: iterations,
                inertia,
                cognitive,
                social,
                seed,
                parallel,
                ..PsoConfig::default()
            };
            cmd_tune(&plant, &horizon, controller, &config)
        }
    }
}

fn cmd_presets() -> CliResult<()> {
    for name in preset_names() {
        let cfg = PlantConfiguration::create_preset(name)?;
        println!(
            "{:<16} mode={:<15} coupling={}",
            name,
            cfg.dynamics_mode(),
            cfg.matrix_coupling()
        );
    }
    Ok(())
}

fn cmd_check(plant: &PlantArgs) -> CliResult<()> {
    let cfg = plant.load()?;
    println!("Total mass:            {:.4} kg", cfg.total_mass());
    println!("Natural frequency 1:   {:.4} rad/s", cfg.pendulum1_natural_frequency());
    println!("Natural frequency 2:   {:.4} rad/s", cfg.pendulum2_natural_frequency());
    println!("Coupling strength:     {:.4}", cfg.coupling_strength());
    println!("Dynamics mode:         {}", cfg.dynamics_mode());
    println!("Matrix coupling:       {}", cfg.matrix_coupling());
    println!();

    let mut all_ok = true;
    for (check, ok) in cfg.check_physical_consistency() {
        all_ok &= ok;
        println!("{} {}", if ok { "✓" } else { "✗" }, check);
    }
    if !all_ok {
        println!("\nSome consistency checks failed");
    }
    Ok(())
}

fn cmd_linearize(plant: &PlantArgs, equilibrium: Equilibrium) -> CliResult<()> {
    let model = DynamicsModel::new(plant.load()?)?;
    let (a, b) = model.get_linearized_system(equilibrium)?;

    println!("Linearization about {equilibrium}");
    println!("A ={a}");
    println!("B ={b}");
    println!("Eigenvalues:");
    for ev in linear_eigenvalues(&a).iter() {
        let tag = if ev.re > 1e-9 { "unstable" } else { "" };
        println!("  {:>12.6} {:+12.6}i  {}", ev.re, ev.im, tag);
    }
    Ok(())
}

fn cmd_simulate(
    plant: &PlantArgs,
    horizon: &HorizonArgs,
    kind: ControllerKind,
    gains: &[f64],
    initial: Option<&[f64]>,
) -> CliResult<()> {
    let mut policy = horizon.policy();
    if let Some(values) = initial {
        policy.initial_states = vec![state_from_slice(values)?];
    }
    let fitness = GainFitness::new(kind, Arc::new(plant.load()?), policy)?;
    let mut controller = fitness.build_controller(gains)?;

    for (i, x0) in fitness.policy().initial_states.iter().enumerate() {
        println!("Run {} from {}", i + 1, x0.transpose());
        match simulate_closed_loop(
            fitness.model(),
            controller.as_mut(),
            *x0,
            &fitness.policy().horizon,
        ) {
            Ok(record) => {
                println!("  steps:        {}", record.steps());
                println!(
                    "  time:         {:.3} of {:.3} s",
                    record.duration(),
                    fitness.policy().horizon.duration()
                );
                println!("  cost:         {:.6}", fitness.policy().trajectory_cost(&record));
                println!("  max |angle|:  {:.6} rad", record.max_abs_angle());
                println!("  max |force|:  {:.6} N", record.max_abs_control());
                println!("  final state:  {}", record.final_state().transpose());
            }
            Err(e) => println!("  failed: {e}"),
        }
    }

    match fitness.evaluate(gains) {
        Ok(cost) => println!("\nFitness: {cost:.6}"),
        Err(e) => println!("\nFitness: {} (penalty, {e})", fitness.penalty()),
    }
    Ok(())
}

fn cmd_tune(
    plant: &PlantArgs,
    horizon: &HorizonArgs,
    kind: ControllerKind,
    config: &PsoConfig,
) -> CliResult<()> {
    let fitness = GainFitness::new(kind, Arc::new(plant.load()?), horizon.policy())?;
    let (lower, upper) = get_gain_bounds(kind);
    let bounds = Bounds::new(lower, upper)?;

    let mut report = |p: &IterationProgress<'_>| {
        if p.iteration % 10 == 0 {
            println!(
                "iter {:>4}  best {:>14.6}  mean {:>14.6}  penalized {}",
                p.iteration, p.best_cost, p.mean_cost, p.failed
            );
        }
    };
    let result = optimise_with_progress(&fitness, &bounds, config, Some(&mut report))?;

    println!();
    println!("Controller:   {kind}");
    println!("Termination:  {} after {} iterations", result.termination, result.iterations);
    println!("Evaluations:  {} ({} penalized)", result.evaluations, result.failed_evaluations);
    println!("Best cost:    {:.6}", result.best_cost);
    println!("Best gains:");
    for (name, g) in kind.gain_names().iter().zip(&result.best_gains) {
        println!("  {name:<8} = {g:.6}");
    }
    let joined: Vec<String> = result.best_gains.iter().map(|g| g.to_string()).collect();
    println!("\n--gains {}", joined.join(","));
    Ok(())
}
