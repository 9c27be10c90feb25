//! Unit archetypes, base stats, and per-instance state

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::hex::Hex;

/// One of the two competing sides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Side1,
    Side2,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Side1 => Side::Side2,
            Side::Side2 => Side::Side1,
        }
    }

    /// Index for per-side array storage
    pub fn index(self) -> usize {
        match self {
            Side::Side1 => 0,
            Side::Side2 => 1,
        }
    }
}

/// Unit archetype
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    // Soldiers
    Scout,
    Warrior,
    Knight,
    Champion,
    // Buildings
    Watchtower,
    Fortress,
    House,
}

/// Fixed base stats for an archetype
#[derive(Clone, Debug)]
pub struct UnitStats {
    pub name: &'static str,
    pub max_health: i32,
    pub attack: i32,
    pub cost: i32,
    pub movement_range: i32,
    pub attack_range: i32,
}

impl UnitStats {
    const fn new(
        name: &'static str,
        max_health: i32,
        attack: i32,
        cost: i32,
        movement_range: i32,
        attack_range: i32,
    ) -> Self {
        Self {
            name,
            max_health,
            attack,
            cost,
            movement_range,
            attack_range,
        }
    }
}

/// Base stats per archetype, indexed by `UnitKind` discriminant
static UNIT_STATS: [UnitStats; 7] = [
    UnitStats::new("Scout", 20, 5, 10, 3, 1),
    UnitStats::new("Warrior", 40, 10, 25, 2, 1),
    UnitStats::new("Knight", 70, 18, 50, 2, 1),
    UnitStats::new("Champion", 120, 30, 100, 2, 1),
    UnitStats::new("Watchtower", 60, 8, 40, 0, 2),
    UnitStats::new("Fortress", 120, 15, 80, 0, 3),
    UnitStats::new("House", 50, 0, 30, 0, 0),
];

impl UnitKind {
    pub const ALL: [UnitKind; 7] = [
        UnitKind::Scout,
        UnitKind::Warrior,
        UnitKind::Knight,
        UnitKind::Champion,
        UnitKind::Watchtower,
        UnitKind::Fortress,
        UnitKind::House,
    ];

    pub fn stats(self) -> &'static UnitStats {
        &UNIT_STATS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.stats().name
    }

    pub fn is_building(self) -> bool {
        matches!(
            self,
            UnitKind::Watchtower | UnitKind::Fortress | UnitKind::House
        )
    }

    pub fn is_soldier(self) -> bool {
        matches!(
            self,
            UnitKind::Scout | UnitKind::Warrior | UnitKind::Knight | UnitKind::Champion
        )
    }

    pub fn is_tower(self) -> bool {
        matches!(self, UnitKind::Watchtower | UnitKind::Fortress)
    }
}

/// A unit on the board
///
/// The position is immutable per instance: moving a unit removes it and
/// reinserts a replacement at the destination (see `Board::move_unit`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub kind: UnitKind,
    pub owner: Side,
    pub position: Hex,
    pub health: i32,
    pub has_moved: bool,
    pub has_attacked: bool,
}

impl Unit {
    /// Create a unit at full health with cleared turn flags
    pub fn create(kind: UnitKind, owner: Side, position: Hex) -> Self {
        Self {
            kind,
            owner,
            position,
            health: kind.stats().max_health,
            has_moved: false,
            has_attacked: false,
        }
    }

    /// Progressive house pricing: each house a side owns raises the next price
    pub fn house_cost(existing_houses: usize) -> i32 {
        30 + existing_houses as i32 * 20
    }

    pub fn stats(&self) -> &'static UnitStats {
        self.kind.stats()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn health_fraction(&self) -> f64 {
        self.health as f64 / self.stats().max_health as f64
    }

    pub fn can_move(&self) -> bool {
        !self.has_moved && self.is_alive() && !self.kind.is_building()
    }

    pub fn can_attack(&self) -> bool {
        !self.has_attacked && self.is_alive()
    }

    /// All positions this unit can move to
    ///
    /// Layered flood fill out to the movement range, expanding through valid
    /// empty positions only; occupied or off-map tiles block expansion.
    /// Excludes the origin.
    pub fn possible_moves(&self, board: &Board) -> FxHashSet<Hex> {
        let mut reachable = FxHashSet::default();
        if !self.can_move() {
            return reachable;
        }

        let mut visited = FxHashSet::default();
        visited.insert(self.position);
        let mut frontier = vec![self.position];

        for _ in 0..self.stats().movement_range {
            let mut next_frontier = Vec::new();
            for pos in &frontier {
                for neighbor in pos.neighbors() {
                    if !visited.contains(&neighbor)
                        && board.is_valid_position(neighbor)
                        && board.is_empty(neighbor)
                    {
                        visited.insert(neighbor);
                        reachable.insert(neighbor);
                        next_frontier.push(neighbor);
                    }
                }
            }
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }

        reachable
    }

    /// All positions this unit can attack: living enemies within attack range
    pub fn possible_targets(&self, board: &Board) -> Vec<Hex> {
        if !self.can_attack() {
            return Vec::new();
        }

        self.position
            .neighbors_within(self.stats().attack_range)
            .into_iter()
            .filter(|&pos| {
                board
                    .unit_at(pos)
                    .is_some_and(|unit| unit.owner != self.owner && unit.is_alive())
            })
            .collect()
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.health = (self.health - damage).max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.stats().max_health);
    }

    pub fn reset_turn_flags(&mut self) {
        self.has_moved = false;
        self.has_attacked = false;
    }
}
