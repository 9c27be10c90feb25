//! Level templates, scenario generation, and balance analysis

use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, DEFAULT_STARTING_GOLD, HOUSE_INCOME};
use crate::hex::Hex;
use crate::units::{Side, UnitKind};

// ============================================================================
// LEVEL CONFIG
// ============================================================================

/// A named starting configuration: pure data, consumed once by
/// `Board::apply_level`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub description: String,
    pub map_radius: i32,
    pub side1_gold: i32,
    pub side2_gold: i32,
    pub side1_units: Vec<(UnitKind, Hex)>,
    pub side2_units: Vec<(UnitKind, Hex)>,
}

impl LevelConfig {
    fn named(
        name: &str,
        map_radius: i32,
        gold: i32,
        side1_units: Vec<(UnitKind, Hex)>,
        side2_units: Vec<(UnitKind, Hex)>,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            map_radius,
            side1_gold: gold,
            side2_gold: gold,
            side1_units,
            side2_units,
        }
    }

    /// The built-in scenario catalog
    pub fn catalog() -> Vec<LevelConfig> {
        vec![
            LevelConfig::named(
                "Tutorial",
                3,
                50,
                vec![
                    (UnitKind::Scout, Hex::new(0, 2)),
                    (UnitKind::House, Hex::new(1, 2)),
                ],
                vec![
                    (UnitKind::Scout, Hex::new(0, -2)),
                    (UnitKind::House, Hex::new(-1, -2)),
                ],
                "Learn the basics with a small map and simple units",
            ),
            LevelConfig::named(
                "Balanced Start",
                4,
                100,
                vec![
                    (UnitKind::Scout, Hex::new(-1, 3)),
                    (UnitKind::House, Hex::new(0, 3)),
                    (UnitKind::Scout, Hex::new(1, 3)),
                ],
                vec![
                    (UnitKind::Scout, Hex::new(-1, -3)),
                    (UnitKind::House, Hex::new(0, -3)),
                    (UnitKind::Scout, Hex::new(1, -3)),
                ],
                "Standard balanced game with equal starting forces",
            ),
            LevelConfig::named(
                "Economic Focus",
                5,
                150,
                vec![
                    (UnitKind::House, Hex::new(-1, 4)),
                    (UnitKind::House, Hex::new(0, 4)),
                    (UnitKind::House, Hex::new(1, 4)),
                    (UnitKind::Warrior, Hex::new(0, 3)),
                ],
                vec![
                    (UnitKind::House, Hex::new(-1, -4)),
                    (UnitKind::House, Hex::new(0, -4)),
                    (UnitKind::House, Hex::new(1, -4)),
                    (UnitKind::Warrior, Hex::new(0, -3)),
                ],
                "Focus on economic development with multiple starting houses",
            ),
            LevelConfig::named(
                "Fortress Defense",
                4,
                80,
                vec![
                    (UnitKind::Watchtower, Hex::new(0, 3)),
                    (UnitKind::Warrior, Hex::new(-1, 3)),
                    (UnitKind::Warrior, Hex::new(1, 3)),
                    (UnitKind::House, Hex::new(0, 2)),
                ],
                vec![
                    (UnitKind::Watchtower, Hex::new(0, -3)),
                    (UnitKind::Warrior, Hex::new(-1, -3)),
                    (UnitKind::Warrior, Hex::new(1, -3)),
                    (UnitKind::House, Hex::new(0, -2)),
                ],
                "Defensive gameplay with starting towers and warriors",
            ),
            LevelConfig::named(
                "Large Battle",
                6,
                200,
                vec![
                    (UnitKind::Scout, Hex::new(-2, 5)),
                    (UnitKind::Warrior, Hex::new(-1, 5)),
                    (UnitKind::House, Hex::new(0, 5)),
                    (UnitKind::Warrior, Hex::new(1, 5)),
                    (UnitKind::Scout, Hex::new(2, 5)),
                    (UnitKind::Watchtower, Hex::new(0, 4)),
                ],
                vec![
                    (UnitKind::Scout, Hex::new(-2, -5)),
                    (UnitKind::Warrior, Hex::new(-1, -5)),
                    (UnitKind::House, Hex::new(0, -5)),
                    (UnitKind::Warrior, Hex::new(1, -5)),
                    (UnitKind::Scout, Hex::new(2, -5)),
                    (UnitKind::Watchtower, Hex::new(0, -4)),
                ],
                "Large-scale warfare on an expanded battlefield",
            ),
        ]
    }

    /// Catalog lookup by name, case-insensitive
    pub fn by_name(name: &str) -> Option<LevelConfig> {
        Self::catalog()
            .into_iter()
            .find(|config| config.name.eq_ignore_ascii_case(name))
    }

    /// Generate a level from a difficulty/style/size triple
    ///
    /// Pure data construction: both sides receive mirrored placements and
    /// equal gold.
    pub fn generate(difficulty: Difficulty, style: Style, map_size: MapSize) -> LevelConfig {
        let radius = map_size.radius();
        let gold = (100.0 * difficulty.gold_multiplier()) as i32;
        let unit_count = difficulty.unit_count();

        match style {
            Style::Balanced => generate_balanced(radius, gold, unit_count),
            Style::Economic => generate_economic(radius, gold, unit_count),
            Style::Military => generate_military(radius, gold, unit_count),
            Style::Defensive => generate_defensive(radius, gold, unit_count),
        }
    }

    /// Random mirrored skirmish: one house plus randomly drawn soldiers
    ///
    /// Deterministic for a fixed seed. Both sides receive the identical army.
    pub fn random_skirmish<R: Rng>(
        rng: &mut R,
        name: &str,
        radius: i32,
        soldier_count: usize,
    ) -> LevelConfig {
        const SOLDIERS: [UnitKind; 4] = [
            UnitKind::Scout,
            UnitKind::Warrior,
            UnitKind::Knight,
            UnitKind::Champion,
        ];

        let mut kinds = vec![UnitKind::House];
        for _ in 0..soldier_count {
            kinds.push(SOLDIERS[rng.gen_range(0..SOLDIERS.len())]);
        }

        let positions = formation_positions(radius, kinds.len());
        let side1_units: Vec<(UnitKind, Hex)> =
            kinds.iter().copied().zip(positions.iter().copied()).collect();
        let side2_units: Vec<(UnitKind, Hex)> = side1_units
            .iter()
            .map(|&(kind, pos)| (kind, mirror(pos)))
            .collect();

        LevelConfig {
            name: name.to_string(),
            description: "Randomly generated mirrored skirmish".to_string(),
            map_radius: radius,
            side1_gold: DEFAULT_STARTING_GOLD,
            side2_gold: DEFAULT_STARTING_GOLD,
            side1_units,
            side2_units,
        }
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read level {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse level {}", path.display()))?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write level {}", path.display()))?;
        Ok(())
    }
}

// ============================================================================
// GENERATION PARAMETERS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn gold_multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 1.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.7,
        }
    }

    pub fn unit_count(self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Normal => 3,
            Difficulty::Hard => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    Balanced,
    Economic,
    Military,
    Defensive,
}

impl Style {
    pub fn name(self) -> &'static str {
        match self {
            Style::Balanced => "Balanced",
            Style::Economic => "Economic",
            Style::Military => "Military",
            Style::Defensive => "Defensive",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapSize {
    Small,
    Medium,
    Large,
}

impl MapSize {
    pub fn radius(self) -> i32 {
        match self {
            MapSize::Small => 3,
            MapSize::Medium => 4,
            MapSize::Large => 6,
        }
    }
}

// ============================================================================
// STYLE GENERATORS
// ============================================================================

/// Side2's placements are side1's reflected through the map's horizontal axis
fn mirror(pos: Hex) -> Hex {
    Hex::new(pos.q, -pos.r)
}

fn generate_balanced(radius: i32, gold: i32, unit_count: usize) -> LevelConfig {
    let row = radius - 1;
    let mut side1 = vec![(UnitKind::House, Hex::new(0, row))];

    let kinds = [UnitKind::Scout, UnitKind::Warrior, UnitKind::Scout];
    for (i, &kind) in kinds.iter().take(unit_count).enumerate() {
        let offset = i as i32 - 1;
        side1.push((kind, Hex::new(offset, row - 1)));
    }

    finish_generated(Style::Balanced, radius, gold, side1)
}

fn generate_economic(radius: i32, gold: i32, unit_count: usize) -> LevelConfig {
    let row = radius - 1;
    let house_count = (unit_count / 2).max(2);

    let mut side1 = Vec::new();
    for i in 0..house_count {
        let offset = i as i32 - house_count as i32 / 2;
        side1.push((UnitKind::House, Hex::new(offset, row)));
    }
    side1.push((UnitKind::Scout, Hex::new(0, row - 1)));

    // Bonus starting gold for the economic style.
    finish_generated(Style::Economic, radius, gold + 50, side1)
}

fn generate_military(radius: i32, gold: i32, unit_count: usize) -> LevelConfig {
    let row = radius - 1;
    let mut side1 = vec![(UnitKind::House, Hex::new(0, row))];

    let kinds = [
        UnitKind::Warrior,
        UnitKind::Knight,
        UnitKind::Warrior,
        UnitKind::Scout,
        UnitKind::Scout,
    ];
    for (i, &kind) in kinds.iter().take(unit_count).enumerate() {
        let offset = i as i32 - 2;
        let row_offset = if i % 2 == 0 { -1 } else { -2 };
        // Clamped off the center row so the mirrored armies cannot meet.
        side1.push((kind, Hex::new(offset, (row + row_offset).max(1))));
    }

    // Less starting gold, more units.
    finish_generated(Style::Military, radius, gold - 20, side1)
}

fn generate_defensive(radius: i32, gold: i32, unit_count: usize) -> LevelConfig {
    let row = radius - 1;
    let mut side1 = vec![
        (UnitKind::Watchtower, Hex::new(0, row)),
        (UnitKind::House, Hex::new(-1, row)),
    ];

    let kinds = [UnitKind::Warrior, UnitKind::Warrior, UnitKind::Scout];
    for (i, &kind) in kinds
        .iter()
        .take(unit_count.saturating_sub(1))
        .enumerate()
    {
        let offset = i as i32 - 1;
        side1.push((kind, Hex::new(offset, row - 1)));
    }

    finish_generated(Style::Defensive, radius, gold, side1)
}

fn finish_generated(
    style: Style,
    radius: i32,
    gold: i32,
    side1_units: Vec<(UnitKind, Hex)>,
) -> LevelConfig {
    let side2_units = side1_units
        .iter()
        .map(|&(kind, pos)| (kind, mirror(pos)))
        .collect();

    LevelConfig {
        name: format!("{} ({radius})", style.name()),
        description: format!("Generated {} level", style.name().to_lowercase()),
        map_radius: radius,
        side1_gold: gold,
        side2_gold: gold,
        side1_units,
        side2_units,
    }
}

/// Back-line formation slots for skirmish armies, nearest the side1 edge
///
/// Slots outside the map or on the center row are dropped before taking
/// `count`, so mirrored armies can never overlap; on tiny maps the army is
/// truncated to the slots that fit.
fn formation_positions(radius: i32, count: usize) -> Vec<Hex> {
    let back = radius - 1;
    let candidates = [
        (0, back),
        (-1, back),
        (1, back),
        (0, back - 1),
        (-1, back - 1),
        (1, back - 1),
        (-2, back),
        (2, back - 1),
        (-2, back - 1),
        (0, back - 2),
        (-1, back - 2),
        (1, back - 2),
        (2, back - 2),
    ];

    candidates
        .iter()
        .map(|&(q, r)| Hex::new(q, r))
        .filter(|pos| {
            pos.r >= 1 && pos.q.abs() <= radius && pos.r.abs() <= radius && pos.s().abs() <= radius
        })
        .take(count)
        .collect()
}

// ============================================================================
// BALANCE ANALYSIS
// ============================================================================

/// Offline balance summary for a board; not a runtime constraint
#[derive(Clone, Debug, Serialize)]
pub struct BalanceReport {
    pub side1_unit_value: i32,
    pub side2_unit_value: i32,
    pub side1_income: i32,
    pub side2_income: i32,
    pub unit_value_ratio: f64,
    pub income_ratio: f64,
    pub balanced: bool,
}

/// Tolerance band for the side-to-side ratios
const BALANCE_BAND: (f64, f64) = (0.7, 1.3);

/// Compare both sides' total unit value and income rate
pub fn analyze_balance(board: &Board) -> BalanceReport {
    let value = |side: Side| -> i32 {
        board
            .units_owned_by(side)
            .iter()
            .map(|unit| unit.stats().cost)
            .sum()
    };
    let income = |side: Side| -> i32 {
        board.count_units_of(UnitKind::House, side) as i32 * HOUSE_INCOME
    };

    let side1_unit_value = value(Side::Side1);
    let side2_unit_value = value(Side::Side2);
    let side1_income = income(Side::Side1);
    let side2_income = income(Side::Side2);

    let unit_value_ratio = side1_unit_value as f64 / side2_unit_value.max(1) as f64;
    let income_ratio = side1_income as f64 / side2_income.max(1) as f64;

    let in_band = |ratio: f64| ratio >= BALANCE_BAND.0 && ratio <= BALANCE_BAND.1;

    BalanceReport {
        side1_unit_value,
        side2_unit_value,
        side1_income,
        side2_income,
        unit_value_ratio,
        income_ratio,
        balanced: in_band(unit_value_ratio) && in_band(income_ratio),
    }
}

impl std::fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Unit value: {} vs {} (ratio {:.2})",
            self.side1_unit_value, self.side2_unit_value, self.unit_value_ratio
        )?;
        writeln!(
            f,
            "Income:     {} vs {} (ratio {:.2})",
            self.side1_income, self.side2_income, self.income_ratio
        )?;
        write!(
            f,
            "Status:     {}",
            if self.balanced { "balanced" } else { "imbalanced" }
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
