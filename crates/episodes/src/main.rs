//! Cart-pole evaluation harness for the UCT planner.
//!
//! Runs full control episodes, rebuilding the planner at every decision
//! epoch, and reports the mean episode return with its standard error.
//! The `drifting` subcommand grows the pole between epochs to exercise
//! planning under non-stationary dynamics; the planner itself only ever
//! sees a frozen snapshot of the current dynamics.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use replan_cartpole::{CartPole, DriftingCartPole};
use replan_core::TransitionModel;
use replan_mcts::{Planner, PlannerConfig};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

/// Cart-pole planning evaluation tool.
#[derive(Parser)]
#[command(name = "replan-episodes")]
#[command(about = "Evaluate the UCT planner on cart-pole control episodes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fixed dynamics for the whole run.
    Stationary {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Pole length grows at every real step.
    Drifting {
        #[command(flatten)]
        run: RunArgs,

        /// Pole-length increment applied per real step.
        #[arg(long, default_value = "0.1")]
        increment: f64,
    },
}

#[derive(Args, Clone)]
struct RunArgs {
    /// Number of episodes to run.
    #[arg(short, long, default_value = "25")]
    episodes: usize,

    /// Planner simulations per decision epoch.
    #[arg(short, long, default_value = "50")]
    simulations: usize,

    /// Rollout depth limit.
    #[arg(short, long, default_value = "15")]
    depth: usize,

    /// UCT exploration constant.
    #[arg(short = 'c', long, default_value = "1.44")]
    exploration: f64,

    /// Discount factor.
    #[arg(short = 'g', long, default_value = "0.999")]
    discount: f64,

    /// Master random seed; episode i derives its own stream from it.
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Episode step limit (truncation point).
    #[arg(long, default_value = "500")]
    step_limit: u32,

    /// Optional JSON file for per-episode records.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RunArgs {
    fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            rollout_depth: self.depth,
            simulations: self.simulations,
            exploration: self.exploration,
            discount: self.discount,
            ..Default::default()
        }
    }
}

/// One finished episode.
#[derive(Serialize, Debug)]
struct EpisodeRecord {
    episode: usize,
    seed: u64,
    steps: usize,
    total_reward: f64,
    rewards: Vec<f64>,
}

/// Aggregate written to `--output`.
#[derive(Serialize, Debug)]
struct RunSummary {
    episodes: usize,
    mean_reward: f64,
    std_error: f64,
    records: Vec<EpisodeRecord>,
}

/// Run one episode on fixed dynamics. A fresh planner is built from a
/// snapshot of the environment at every decision epoch; trees are never
/// reused across epochs.
fn run_episode_stationary(args: &RunArgs, episode: usize, seed: u64) -> Result<EpisodeRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut env = CartPole::with_step_limit(args.step_limit);
    env.reset(&mut rng);

    let config = args.planner_config();
    let mut rewards = Vec::new();

    loop {
        let planner_rng = ChaCha8Rng::seed_from_u64(rng.gen());
        let mut planner = Planner::new(env.snapshot(), config.clone(), planner_rng)
            .context("failed to build planner for decision epoch")?;
        let outcome = planner.search();

        let t = env.step(outcome.best_action);
        rewards.push(t.reward);
        if t.is_final() {
            break;
        }
    }

    Ok(EpisodeRecord {
        episode,
        seed,
        steps: rewards.len(),
        total_reward: rewards.iter().sum(),
        rewards,
    })
}

/// Run one episode on drifting dynamics. The planner plans against the
/// frozen `planning_model()` of the epoch while the live pole keeps
/// growing underneath it.
fn run_episode_drifting(
    args: &RunArgs,
    increment: f64,
    episode: usize,
    seed: u64,
) -> Result<EpisodeRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut env = DriftingCartPole::with_step_limit(increment, args.step_limit);
    env.reset(&mut rng);

    let config = args.planner_config();
    let mut rewards = Vec::new();

    loop {
        let planner_rng = ChaCha8Rng::seed_from_u64(rng.gen());
        let mut planner = Planner::new(env.planning_model(), config.clone(), planner_rng)
            .context("failed to build planner for decision epoch")?;
        let outcome = planner.search();

        let t = env.step(outcome.best_action);
        rewards.push(t.reward);
        if t.is_final() {
            break;
        }
    }

    Ok(EpisodeRecord {
        episode,
        seed,
        steps: rewards.len(),
        total_reward: rewards.iter().sum(),
        rewards,
    })
}

/// Mean and standard error of the episode returns.
fn mean_and_std_error(totals: &[f64]) -> (f64, f64) {
    if totals.is_empty() {
        return (0.0, 0.0);
    }
    let n = totals.len() as f64;
    let mean = totals.iter().sum::<f64>() / n;
    let variance = totals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt() / n.sqrt())
}

fn run(args: &RunArgs, increment: Option<f64>) -> Result<()> {
    let label = match increment {
        None => "stationary".to_string(),
        Some(k) => format!("drifting, +{k}/step"),
    };
    println!(
        "Running {} cart-pole episodes ({}): {} sims/epoch, depth {}, c {}, gamma {}",
        args.episodes, label, args.simulations, args.depth, args.exploration, args.discount
    );

    let start = Instant::now();

    let results: Vec<Result<EpisodeRecord>> = (0..args.episodes)
        .into_par_iter()
        .map(|i| {
            let seed = args.seed.wrapping_add(i as u64 * 1000);
            match increment {
                None => run_episode_stationary(args, i, seed),
                Some(k) => run_episode_drifting(args, k, i, seed),
            }
        })
        .collect();
    let records: Vec<EpisodeRecord> = results.into_iter().collect::<Result<_>>()?;

    let totals: Vec<f64> = records.iter().map(|r| r.total_reward).collect();
    let (mean, std_error) = mean_and_std_error(&totals);

    println!("Completed in {:.2}s", start.elapsed().as_secs_f64());
    println!(
        "Average reward over {} episodes: {:.2} +/- {:.2}",
        records.len(),
        mean,
        std_error
    );

    if let Some(path) = &args.output {
        let summary = RunSummary {
            episodes: records.len(),
            mean_reward: mean,
            std_error,
            records,
        };
        let file =
            File::create(path).with_context(|| format!("failed to create file: {path:?}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary)
            .with_context(|| format!("failed to write summary to {path:?}"))?;
        println!("Records saved to: {path:?}");
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stationary { run: args } => run(&args, None),
        Commands::Drifting {
            run: args,
            increment,
        } => run(&args, Some(increment)),
    }
}
