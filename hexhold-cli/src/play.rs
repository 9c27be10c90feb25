//! Play command - run an AI-vs-AI match to completion

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use hexhold_core::{
    analyze_balance, Board, LevelConfig, Planner, Side, Snapshot, TurnPhase, UnitKind,
};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Catalog level name (see `levels`)
    #[arg(long, default_value = "Balanced Start", conflicts_with = "level_file")]
    pub level: String,

    /// Level config JSON file to play instead of a catalog level
    #[arg(long, value_name = "FILE")]
    pub level_file: Option<PathBuf>,

    /// Resume from a board snapshot written by --save
    #[arg(long, value_name = "FILE", conflicts_with_all = ["level", "level_file"])]
    pub resume: Option<PathBuf>,

    /// Maximum number of turns before calling the match a draw
    #[arg(long, default_value = "60")]
    pub max_turns: u32,

    /// Pause between planner phases, for watching the log
    #[arg(long, default_value = "0")]
    pub delay_ms: u64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the final board snapshot to FILE
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
}

/// Final state of a finished match
struct MatchOutcome {
    winner: Option<Side>,
    phases: u32,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs) -> Result<()> {
    let (name, board) = load_board(&args)?;

    tracing::info!(
        "Starting match on {:?} (radius {}, max {} turns)",
        name,
        board.radius(),
        args.max_turns
    );

    let (board, outcome) = play_match(board, &args);

    if let Some(path) = &args.save {
        board
            .snapshot()
            .save(path)
            .with_context(|| format!("failed to save final snapshot to {}", path.display()))?;
        tracing::info!("Final snapshot written to {}", path.display());
    }

    if args.json {
        print_json_outcome(&board, &outcome)?;
    } else {
        print_text_outcome(&board, &outcome);
    }

    Ok(())
}

fn load_board(args: &PlayArgs) -> Result<(String, Board)> {
    if let Some(path) = &args.resume {
        let snapshot = Snapshot::load(path)?;
        let board = Board::restore(&snapshot)
            .with_context(|| format!("snapshot {} is not a valid board", path.display()))?;
        return Ok((format!("resumed {}", path.display()), board));
    }

    let config = if let Some(path) = &args.level_file {
        LevelConfig::load(path)?
    } else {
        LevelConfig::by_name(&args.level)
            .with_context(|| format!("unknown catalog level {:?}", args.level))?
    };
    Ok((config.name.clone(), Board::from_level(&config)))
}

// ============================================================================
// MATCH LOOP
// ============================================================================

/// Alternate the two planners, one phase at a time, polling the win
/// condition after every mutation
fn play_match(mut board: Board, args: &PlayArgs) -> (Board, MatchOutcome) {
    let planners = [Planner::new(Side::Side1), Planner::new(Side::Side2)];
    let mut phases = 0u32;

    let winner = loop {
        if let Some(winner) = board.check_win_condition() {
            break Some(winner);
        }
        if board.turn() > args.max_turns {
            break None;
        }

        let handing_over = board.phase() == TurnPhase::EndTurn;
        tracing::trace!("{:?}: {}", board.current_side(), board.phase().label());
        planners[board.current_side().index()].take_phase(&mut board);
        phases += 1;

        if handing_over {
            tracing::debug!(
                "Turn {}: {:?} to act, gold {}/{}",
                board.turn(),
                board.current_side(),
                board.gold(Side::Side1),
                board.gold(Side::Side2)
            );
        }

        // Pacing only; rule outcomes do not depend on it.
        if args.delay_ms > 0 {
            thread::sleep(Duration::from_millis(args.delay_ms));
        }
    };

    (board, MatchOutcome { winner, phases })
}

// ============================================================================
// REPORTING
// ============================================================================

fn print_text_outcome(board: &Board, outcome: &MatchOutcome) {
    println!("\n=== Match Result ===");
    match outcome.winner {
        Some(winner) => println!("Winner: {:?} on turn {}", winner, board.turn()),
        None => println!("Draw: turn limit reached at turn {}", board.turn()),
    }
    println!("Phases played: {}", outcome.phases);

    for side in [Side::Side1, Side::Side2] {
        println!(
            "{:?}: {} units ({} houses), {} gold",
            side,
            board.units_owned_by(side).len(),
            board.count_units_of(UnitKind::House, side),
            board.gold(side)
        );
    }

    println!("\nFinal balance:");
    println!("{}", analyze_balance(board));
}

fn print_json_outcome(board: &Board, outcome: &MatchOutcome) -> Result<()> {
    #[derive(serde::Serialize)]
    struct SideSummary {
        units: usize,
        houses: usize,
        gold: i32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutcome {
        winner: Option<String>,
        turns: u32,
        phases: u32,
        side1: SideSummary,
        side2: SideSummary,
        balance: hexhold_core::BalanceReport,
    }

    let summary = |side: Side| SideSummary {
        units: board.units_owned_by(side).len(),
        houses: board.count_units_of(UnitKind::House, side),
        gold: board.gold(side),
    };

    let output = JsonOutcome {
        winner: outcome.winner.map(|side| format!("{side:?}")),
        turns: board.turn(),
        phases: outcome.phases,
        side1: summary(Side::Side1),
        side2: summary(Side::Side2),
        balance: analyze_balance(board),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
