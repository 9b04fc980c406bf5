use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use connect_four_agents::ai::{
    AdaptivePolicyAgent, Agent, MctsAgent, MinimaxAgent, RandomAgent, ThreatHeuristic,
};
use connect_four_agents::arena::{episode_seed, play_series, train_against};
use connect_four_agents::config::{AppConfig, OpponentKind};
use connect_four_agents::persistence::JsonFileStore;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Opponent {
    Random,
    Minimax,
    Mcts,
}

impl From<Opponent> for OpponentKind {
    fn from(opponent: Opponent) -> Self {
        match opponent {
            Opponent::Random => OpponentKind::Random,
            Opponent::Minimax => OpponentKind::Minimax,
            Opponent::Mcts => OpponentKind::Mcts,
        }
    }
}

/// Train the adaptive Q-learning agent against a fixed opponent.
#[derive(Parser)]
#[command(name = "train", about = "Train a Connect Four adaptive agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the opponent
    #[arg(long, value_enum)]
    opponent: Option<Opponent>,

    /// Override number of training games
    #[arg(long)]
    games: Option<usize>,

    /// Override the base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Continue from the saved table instead of starting fresh
    #[arg(long)]
    resume: bool,

    /// Skip training; load the saved table frozen and only evaluate it
    #[arg(long)]
    evaluate: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn build_opponent(config: &AppConfig, kind: OpponentKind, seed: u64) -> Result<Box<dyn Agent>> {
    let agent: Box<dyn Agent> = match kind {
        OpponentKind::Random => Box::new(RandomAgent::with_seed(seed)),
        OpponentKind::Minimax => Box::new(
            MinimaxAgent::with_heuristic(
                config.minimax.search_depth,
                Box::new(ThreatHeuristic::new(config.heuristic)),
            )
            .context("building minimax opponent")?,
        ),
        OpponentKind::Mcts => Box::new(
            MctsAgent::with_seed(config.mcts.clone(), seed).context("building MCTS opponent")?,
        ),
    };
    Ok(agent)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    init_tracing(&cli.log_level);

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(opponent) = cli.opponent {
        config.arena.opponent = opponent.into();
    }
    if let Some(games) = cli.games {
        config.arena.games = games;
    }
    if let Some(seed) = cli.seed {
        config.arena.seed = seed;
    }
    config.validate().context("validating config")?;

    let arena = config.arena.clone();
    let mut store = JsonFileStore::new(arena.table_dir.clone());
    let mut opponent = build_opponent(&config, arena.opponent, episode_seed(arena.seed, 1))?;

    let mut adaptive = config.adaptive.clone();
    adaptive.frozen = cli.evaluate;
    let mut agent = AdaptivePolicyAgent::with_seed(adaptive, episode_seed(arena.seed, 0))
        .context("building adaptive agent")?;

    if cli.evaluate || cli.resume {
        agent.load_from(&store, &arena.table_name);
    }

    if cli.evaluate {
        let stats = play_series(&mut agent, opponent.as_mut(), arena.eval_games.max(1))
            .context("evaluating frozen agent")?;
        info!(
            opponent = opponent.name(),
            level = %agent.level(),
            rows = agent.table().len(),
            "evaluation: {stats}"
        );
        return Ok(());
    }

    info!(
        games = arena.games,
        opponent = opponent.name(),
        seed = arena.seed,
        "training adaptive agent"
    );
    let curve = train_against(
        &mut agent,
        opponent.as_mut(),
        arena.games,
        arena.eval_every,
        arena.eval_games,
    )
    .context("training")?;

    agent
        .save_to(&mut store, &arena.table_name)
        .with_context(|| format!("saving table to {}", store.dir().display()))?;

    if let Some(last) = curve.last() {
        info!(
            games = last.games_played,
            level = %last.level,
            epsilon = last.epsilon,
            rows = last.table_rows,
            path = %store.path_for(&arena.table_name).display(),
            "training finished, evaluation: {}",
            last.evaluation
        );
    }

    Ok(())
}
