#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Campus Runner headlessly.

mod campus;
mod config;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use campus_runner_core::{
    Direction, Event, PathAlgorithm, PathResult, PlayState, WELCOME_BANNER,
};
use campus_runner_session::{Frame, Session, SessionConfig};
use campus_runner_system_tasks::Task;
use campus_runner_world::{query, CampusLayout};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

/// Headless Campus Runner: path queries and scripted sessions.
#[derive(Debug, Parser)]
#[command(name = "campus-runner", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed overriding the configured RNG seed.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Log at debug level regardless of `RUST_LOG`.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Lists the campus buildings and tasks.
    Info,
    /// Searches a path between two buildings.
    Path {
        /// Building to start from.
        from: String,
        /// Building to reach.
        to: String,
        /// Search to run.
        #[arg(long, value_enum, default_value_t = AlgorithmChoice::Compare)]
        algorithm: AlgorithmChoice,
    },
    /// Plays a session without a window.
    Simulate {
        /// Maximum number of ticks to run.
        #[arg(long, default_value_t = 600)]
        ticks: u32,
        /// Simulated milliseconds per tick.
        #[arg(long, default_value_t = 250)]
        tick_ms: u64,
        /// One move per tick (`N`, `E`, `S`, `W`, or `.` to wait). Without a
        /// script the player follows A* paths to each task.
        #[arg(long)]
        moves: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AlgorithmChoice {
    Bfs,
    Astar,
    Compare,
}

impl AlgorithmChoice {
    fn algorithms(self) -> &'static [PathAlgorithm] {
        match self {
            Self::Bfs => &[PathAlgorithm::Bfs],
            Self::Astar => &[PathAlgorithm::AStar],
            Self::Compare => &[PathAlgorithm::Bfs, PathAlgorithm::AStar],
        }
    }
}

/// Entry point for the Campus Runner command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = match &cli.config {
        Some(path) => CliConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CliConfig::default(),
    };
    let layout = file.layout().context("failed to build campus layout")?;
    let catalog = file.tasks();
    let session_config = file.session_config(cli.seed);
    info!(
        seed = session_config.rng_seed(),
        columns = layout.columns(),
        rows = layout.rows(),
        tasks = catalog.len(),
        "campus loaded"
    );

    match cli.command.unwrap_or(CliCommand::Info) {
        CliCommand::Info => {
            print_info(&layout, &catalog);
            Ok(())
        }
        CliCommand::Path {
            from,
            to,
            algorithm,
        } => run_path(layout, catalog, session_config, &from, &to, algorithm),
        CliCommand::Simulate {
            ticks,
            tick_ms,
            moves,
        } => {
            let script = moves.as_deref().map(parse_moves).transpose()?;
            let mut session = Session::new(layout, catalog, session_config);
            simulate(&mut session, ticks, Duration::from_millis(tick_ms), script);
            print_summary(&session.frame());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_info(layout: &CampusLayout, catalog: &[Task]) {
    println!("{WELCOME_BANNER}");
    println!(
        "Campus {}x{}, start {}",
        layout.columns(),
        layout.rows(),
        layout.start()
    );
    println!("Buildings:");
    for (name, cell) in layout.buildings() {
        println!("  {name:<24} {cell}");
    }
    println!("Tasks:");
    for task in catalog {
        println!(
            "  {:<8} {:<24} {:>4} pts  -> {}",
            task.id, task.name, task.points, task.building
        );
    }
}

fn run_path(
    layout: CampusLayout,
    catalog: Vec<Task>,
    config: SessionConfig,
    from: &str,
    to: &str,
    choice: AlgorithmChoice,
) -> Result<()> {
    let start = building(&layout, from)?;
    let goal = building(&layout, to)?;
    let layout = layout
        .with_start(start)
        .with_context(|| format!("cannot start at '{from}'"))?;
    let mut session = Session::new(
        layout,
        catalog,
        config.with_map_events(false).with_npcs(false),
    );

    for &algorithm in choice.algorithms() {
        let result = session.path_to(goal, algorithm);
        let cost = session.graph().path_cost(&result.cells);
        print_path(algorithm, &result, cost);
    }
    Ok(())
}

fn building(layout: &CampusLayout, name: &str) -> Result<campus_runner_core::CellCoord> {
    match layout.buildings().get(name) {
        Some(cell) => Ok(*cell),
        None => bail!("unknown building '{name}'"),
    }
}

fn print_path(algorithm: PathAlgorithm, result: &PathResult, cost: Option<f32>) {
    if result.is_empty() {
        println!(
            "{algorithm}: unreachable ({} nodes explored)",
            result.nodes_explored
        );
        return;
    }
    let cells: Vec<String> = result.cells.iter().map(ToString::to_string).collect();
    println!(
        "{algorithm}: {} steps, cost {:.1}, {} nodes explored",
        result.hops(),
        cost.unwrap_or(f32::INFINITY),
        result.nodes_explored
    );
    println!("  {}", cells.join(" -> "));
}

fn parse_moves(script: &str) -> Result<Vec<Option<Direction>>> {
    script
        .chars()
        .filter(|marker| !marker.is_whitespace())
        .map(|marker| match marker.to_ascii_uppercase() {
            'N' => Ok(Some(Direction::North)),
            'E' => Ok(Some(Direction::East)),
            'S' => Ok(Some(Direction::South)),
            'W' => Ok(Some(Direction::West)),
            '.' => Ok(None),
            other => bail!("unknown move '{other}' in script"),
        })
        .collect()
}

fn simulate(
    session: &mut Session,
    ticks: u32,
    dt: Duration,
    script: Option<Vec<Option<Direction>>>,
) {
    for tick in 0..ticks {
        let direction = match &script {
            Some(script) => script.get(tick as usize).copied().flatten(),
            None => autopilot(session),
        };

        let mut events = Vec::new();
        if let Some(direction) = direction {
            events.extend(session.move_player(direction));
        }
        events.extend(session.tick(dt));
        report(tick, &events, session);

        if matches!(
            query::play_state(session.world()),
            PlayState::Victory | PlayState::GameOver
        ) {
            break;
        }
    }
}

fn autopilot(session: &mut Session) -> Option<Direction> {
    let from = query::player_cell(session.world());
    let next = session
        .request_path(PathAlgorithm::AStar)?
        .result
        .first_step()?;
    Direction::between(from, next)
}

fn report(tick: u32, events: &[Event], session: &Session) {
    for event in events {
        match event {
            Event::TimeAdvanced { .. } => {}
            Event::PlayerMoved { to, .. } | Event::PlayerRelocated { to, .. } => {
                debug!(tick, cell = %to, "player position");
            }
            Event::MapEventStarted { kind } => println!("[{tick}] map event started: {kind:?}"),
            Event::MapEventEnded { kind } => println!("[{tick}] map event ended: {kind:?}"),
            Event::ScoreChanged { score } => println!("[{tick}] score {score}"),
            Event::PlayStateChanged { state } => println!("[{tick}] {state:?}"),
            Event::TimePenaltyApplied { penalty, remaining } => println!(
                "[{tick}] -{}s, {}s left",
                penalty.as_secs(),
                remaining.as_secs()
            ),
            Event::MoveRejected { direction, reason } => {
                warn!(tick, ?direction, ?reason, "move rejected");
            }
            other => debug!(tick, event = ?other, "event"),
        }
    }
    if let Some(npc) = session.npcs().interaction_near(query::player_cell(session.world())) {
        debug!(tick, npc = npc.id().get(), line = npc.dialogue(), "npc nearby");
    }
}

fn print_summary(frame: &Frame) {
    println!("State:     {:?}", frame.play_state);
    println!("Score:     {}", frame.score);
    println!("Time left: {}s", frame.time_remaining.as_secs());
    println!(
        "Tasks:     {}/{}",
        frame.completed_tasks, frame.total_tasks
    );
    if let Some(task) = &frame.current_task {
        println!("Current:   {} ({})", task.name, task.building);
    }
    for algorithm in [PathAlgorithm::Bfs, PathAlgorithm::AStar] {
        if let Some(explored) = frame.stats.nodes_explored(algorithm) {
            println!("{algorithm:<4} explored {explored} nodes");
        }
    }
    for npc in &frame.npcs {
        println!(
            "NPC {} {:?} at {} ({:?})",
            npc.id.get(),
            npc.kind,
            npc.cell,
            npc.state
        );
    }
}
