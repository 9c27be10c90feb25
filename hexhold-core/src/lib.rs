//! HEXHOLD Core - deterministic hex-grid strategy rules
//!
//! This crate provides the whole rules core for HEXHOLD:
//! - Hex grid geometry (axial coordinates, range queries, map generation)
//! - Unit archetypes, stats, and per-turn state
//! - Match state with phase cycle, economy, and win conditions
//! - Rule-based opponent planner driven through the public operations
//! - Level templates, scenario generation, and balance analysis

pub mod board;
pub mod hex;
pub mod level;
pub mod planner;
pub mod snapshot;
pub mod units;

// Re-exports for convenient access
pub use board::{
    ActionError, Board, TurnPhase, DEFAULT_STARTING_GOLD, HOUSES_FOR_ECONOMIC_WIN, HOUSE_INCOME,
};
pub use hex::{hex_map, Hex, DIRECTIONS};
pub use level::{analyze_balance, BalanceReport, Difficulty, LevelConfig, MapSize, Style};
pub use planner::{Doctrine, Planner};
pub use snapshot::Snapshot;
pub use units::{Side, Unit, UnitKind, UnitStats};
