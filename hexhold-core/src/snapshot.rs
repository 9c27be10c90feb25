//! Persisted match-state layout
//!
//! A `Snapshot` holds exactly the fields an external serializer needs to
//! store or ship a match: everything else (the valid-position set) is
//! re-derived on restore. See `Board::snapshot` and `Board::restore`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::board::TurnPhase;
use crate::units::{Side, Unit};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub map_radius: i32,
    pub units: Vec<Unit>,
    pub current_side: Side,
    pub phase: TurnPhase,
    pub turn: u32,
    pub side1_gold: i32,
    pub side2_gold: i32,
}

impl Snapshot {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
        Ok(snapshot)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        Ok(())
    }
}
