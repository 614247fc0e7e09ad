//! Wayfinder navigation episode CLI.
//!
//! Provides two modes of operation:
//! - `headless`: Run N grid-world episodes through the navigation task and
//!   print per-episode metrics plus aggregate statistics
//! - `info`: Print workspace crate versions and the active configuration

mod grid;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, warn};
use wayfinder_core::prelude::*;
use wayfinder_task::prelude::*;

use grid::{GridFollower, GridWorld};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Episodic navigation tasks over a built-in grid world.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run episodes locally and print metrics.
    Headless {
        /// Number of episodes to run.
        #[arg(short = 'n', long, default_value_t = 1)]
        episodes: u32,

        /// Maximum steps per episode (overrides the config file).
        #[arg(short, long)]
        max_steps: Option<u32>,

        /// Random seed.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Task variant (overrides the config file).
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Who picks the actions.
        #[arg(short, long, value_enum, default_value_t = Policy::Expert)]
        policy: Policy,

        /// Grid side length, in cells.
        #[arg(long, default_value_t = 12)]
        grid_size: usize,

        /// Fraction of cells that are obstacles.
        #[arg(long, default_value_t = 0.2)]
        obstacle_density: f64,

        /// TOML task configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print each episode's metrics as a JSON line.
        #[arg(long)]
        json: bool,
    },

    /// Print crate information.
    Info {
        /// TOML task configuration to display.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    PointNav,
    ObjectNav,
}

impl From<KindArg> for TaskKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::PointNav => Self::PointNav,
            KindArg::ObjectNav => Self::ObjectNav,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Follow the expert oracle.
    Expert,
    /// Uniformly random actions.
    Random,
}

/// Everything `headless` needs besides the task configuration.
struct RunOptions {
    episodes: u32,
    seed: u64,
    policy: Policy,
    grid_size: usize,
    obstacle_density: f64,
    json: bool,
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn load_config(path: Option<&PathBuf>, kind: Option<KindArg>) -> Result<TaskConfig, ConfigError> {
    let mut config = match path {
        Some(path) => TaskConfig::from_file(path)?,
        None => TaskConfig::default(),
    };
    if let Some(kind) = kind {
        config.kind = kind.into();
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_episode(
    config: &TaskConfig,
    options: &RunOptions,
    episode: u32,
    rng: &mut ChaCha8Rng,
) -> Result<EpisodeMetrics, Box<dyn Error>> {
    let world = GridWorld::generate(
        options.grid_size,
        options.obstacle_density,
        options.seed.wrapping_add(u64::from(episode)),
        config.success_distance,
    );
    let target = world.goal_point();
    let follower = GridFollower::new(world.map());
    let sensors = SensorSuite::new()
        .with(AgentPoseSensor)
        .with(FrameSensor::rgb())
        .with(FrameSensor::depth());
    let info = TaskInfo::new(target)
        .with_extra("grid_size", options.grid_size)
        .with_extra("episode_index", episode);

    let mut task = NavTask::new(world, follower, sensors, TaskSpec::from_config(config), info);
    let n_actions = task.action_space().n();

    while !task.is_done() {
        let action = match options.policy {
            Policy::Expert => {
                let expert = task.query_expert();
                if expert.is_valid {
                    expert.action
                } else {
                    warn!(episode_id = task.episode_id(), "no expert label, stopping");
                    task.actions().index_of(NavAction::End).unwrap_or_default()
                }
            }
            Policy::Random => rng.random_range(0..n_actions),
        };
        task.step(action)?;
    }

    let termination = task.termination();
    let metrics = task
        .metrics()
        .ok_or("finished episode produced no metrics")?;
    debug!(episode_id = task.episode_id(), ?termination, "episode metrics drained");
    task.close()?;
    Ok(metrics)
}

fn run_headless(config: &TaskConfig, options: &RunOptions) -> Result<(), Box<dyn Error>> {
    info!(
        kind = ?config.kind,
        episodes = options.episodes,
        policy = ?options.policy,
        seed = options.seed,
        "running headless"
    );

    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let mut stats = EpisodeStats::new();

    for ep in 0..options.episodes {
        let metrics = run_episode(config, options, ep, &mut rng)?;
        if options.json {
            println!("{}", serde_json::to_string(&metrics)?);
        } else {
            println!(
                "episode {}: success={}, steps={}, reward={:.3}, spl={:.3}",
                ep + 1,
                metrics.success,
                metrics.ep_length,
                metrics.total_reward,
                metrics.spl
            );
        }
        stats.record(&metrics);
    }

    if options.json {
        println!("{}", serde_json::to_string(&stats)?);
    } else {
        println!(
            "\ntotal: episodes={}, steps={}, success_rate={:.3}, mean_spl={:.3}, mean_reward={:.3}",
            stats.episodes_completed,
            stats.total_steps,
            stats.success_rate().unwrap_or(0.0),
            stats.mean_spl().unwrap_or(0.0),
            stats.mean_reward().unwrap_or(0.0)
        );
    }
    Ok(())
}

fn run_info(config: &TaskConfig) {
    println!("wayfinder v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  wayfinder-core       {}", env!("CARGO_PKG_VERSION"));
    println!("  wayfinder-task       {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("task:");
    println!("  kind             {:?}", config.kind);
    println!("  actions          {}", config.kind.action_set().names().join(", "));
    println!("  max_steps        {}", config.max_steps);
    println!("  success_distance {}", config.success_distance);
    println!("  step_penalty     {}", config.reward.step_penalty);
    println!("  success_reward   {}", config.reward.success_reward);
    println!();
    println!("edition: 2024");
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Some(Commands::Headless {
            episodes,
            max_steps,
            seed,
            kind,
            policy,
            grid_size,
            obstacle_density,
            config,
            json,
        }) => {
            let mut task_config = load_config(config.as_ref(), kind)?;
            if let Some(max_steps) = max_steps {
                task_config.max_steps = max_steps;
            }
            task_config.validate()?;
            if !(0.0..1.0).contains(&obstacle_density) {
                return Err(format!("obstacle density must be in [0, 1), got {obstacle_density}").into());
            }
            let options = RunOptions {
                episodes,
                seed: seed.unwrap_or_default(),
                policy,
                grid_size,
                obstacle_density,
                json,
            };
            run_headless(&task_config, &options)
        }
        Some(Commands::Info { config }) => {
            run_info(&load_config(config.as_ref(), None)?);
            Ok(())
        }
        None => {
            // Default: one expert-driven point-goal episode
            let options = RunOptions {
                episodes: 1,
                seed: 0,
                policy: Policy::Expert,
                grid_size: 12,
                obstacle_density: 0.2,
                json: false,
            };
            run_headless(&TaskConfig::default(), &options)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
