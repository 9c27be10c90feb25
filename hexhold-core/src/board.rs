//! Match state: turn phases, rule-checked mutations, and win conditions

use anyhow::bail;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hex::{hex_map, Hex};
use crate::level::LevelConfig;
use crate::snapshot::Snapshot;
use crate::units::{Side, Unit, UnitKind};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Gold each side starts with on a bare board
pub const DEFAULT_STARTING_GOLD: i32 = 100;

/// Income per living house, collected when a side's turn begins
pub const HOUSE_INCOME: i32 = 10;

/// Living houses required for an economic victory
pub const HOUSES_FOR_ECONOMIC_WIN: usize = 5;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Phase of the acting side's turn
///
/// The cycle is Income -> Build -> Move -> Combat -> EndTurn. Income is
/// collected inside `end_turn`, so the Income phase itself is a documented
/// no-op: advancing from it simply lands on Build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnPhase {
    Income,
    Build,
    Move,
    Combat,
    EndTurn,
}

impl TurnPhase {
    pub fn label(self) -> &'static str {
        match self {
            TurnPhase::Income => "Income Phase",
            TurnPhase::Build => "Build Phase",
            TurnPhase::Move => "Move Phase",
            TurnPhase::Combat => "Combat Phase",
            TurnPhase::EndTurn => "End Turn",
        }
    }
}

/// A rejected action; the board is left unchanged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("position {0} is outside the map")]
    OutOfMap(Hex),
    #[error("position {0} is occupied")]
    Occupied(Hex),
    #[error("no unit at {0}")]
    NoUnit(Hex),
    #[error("unit at {0} does not belong to the acting side")]
    NotOwned(Hex),
    #[error("unit at {0} cannot move")]
    CannotMove(Hex),
    #[error("unit at {0} cannot attack")]
    CannotAttack(Hex),
    #[error("{0} is out of range")]
    OutOfRange(Hex),
    #[error("target at {0} is friendly")]
    FriendlyTarget(Hex),
    #[error("not enough gold to build a {0}")]
    NotEnoughGold(&'static str),
}

// ============================================================================
// BOARD
// ============================================================================

/// The aggregate match state
///
/// Units are stored as values keyed by position, so a unit's stored position
/// and its map key cannot diverge: moving is remove-then-reinsert.
#[derive(Clone, Debug)]
pub struct Board {
    radius: i32,
    valid: FxHashSet<Hex>,
    units: FxHashMap<Hex, Unit>,
    current_side: Side,
    phase: TurnPhase,
    turn: u32,
    gold: [i32; 2],
}

impl Board {
    /// Create an empty board of the given radius
    pub fn new(radius: i32) -> Self {
        Self {
            radius,
            valid: hex_map(radius),
            units: FxHashMap::default(),
            current_side: Side::Side1,
            phase: TurnPhase::Build,
            turn: 1,
            gold: [DEFAULT_STARTING_GOLD; 2],
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn current_side(&self) -> Side {
        self.current_side
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Global turn counter; increments whenever Side1's turn begins
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn gold(&self, side: Side) -> i32 {
        self.gold[side.index()]
    }

    pub fn unit_at(&self, position: Hex) -> Option<&Unit> {
        self.units.get(&position)
    }

    pub fn is_valid_position(&self, position: Hex) -> bool {
        self.valid.contains(&position)
    }

    pub fn is_empty(&self, position: Hex) -> bool {
        !self.units.contains_key(&position)
    }

    /// Iterate all units on the board
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Living units owned by a side
    pub fn units_owned_by(&self, side: Side) -> Vec<&Unit> {
        self.units
            .values()
            .filter(|unit| unit.owner == side && unit.is_alive())
            .collect()
    }

    /// Living units of one archetype owned by a side
    pub fn count_units_of(&self, kind: UnitKind, side: Side) -> usize {
        self.units
            .values()
            .filter(|unit| unit.kind == kind && unit.owner == side && unit.is_alive())
            .count()
    }

    /// Build price for a side; houses use progressive pricing
    pub fn unit_cost(&self, kind: UnitKind, side: Side) -> i32 {
        if kind == UnitKind::House {
            Unit::house_cost(self.count_units_of(UnitKind::House, side))
        } else {
            kind.stats().cost
        }
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Place a unit at its own position; used for initial setup
    pub fn place_unit(&mut self, unit: Unit) -> Result<(), ActionError> {
        let position = unit.position;
        if !self.is_valid_position(position) {
            return Err(ActionError::OutOfMap(position));
        }
        if !self.is_empty(position) {
            return Err(ActionError::Occupied(position));
        }
        self.units.insert(position, unit);
        Ok(())
    }

    /// Move the current side's unit from `from` to `to`
    ///
    /// The replacement instance at `to` keeps the mover's health and
    /// `has_attacked` flag and gains `has_moved`.
    pub fn move_unit(&mut self, from: Hex, to: Hex) -> Result<(), ActionError> {
        let unit = *self.units.get(&from).ok_or(ActionError::NoUnit(from))?;
        if unit.owner != self.current_side {
            return Err(ActionError::NotOwned(from));
        }
        if !unit.can_move() {
            return Err(ActionError::CannotMove(from));
        }
        if !self.is_valid_position(to) {
            return Err(ActionError::OutOfMap(to));
        }
        if !self.is_empty(to) {
            return Err(ActionError::Occupied(to));
        }
        if !unit.possible_moves(self).contains(&to) {
            return Err(ActionError::OutOfRange(to));
        }

        self.units.remove(&from);
        let mut moved = Unit::create(unit.kind, unit.owner, to);
        moved.health = unit.health;
        moved.has_attacked = unit.has_attacked;
        moved.has_moved = true;
        self.units.insert(to, moved);
        Ok(())
    }

    /// Attack with the current side's unit; flat damage, no counter-attack
    pub fn attack_unit(&mut self, attacker_pos: Hex, target_pos: Hex) -> Result<(), ActionError> {
        let attacker = *self
            .units
            .get(&attacker_pos)
            .ok_or(ActionError::NoUnit(attacker_pos))?;
        if attacker.owner != self.current_side {
            return Err(ActionError::NotOwned(attacker_pos));
        }
        if !attacker.can_attack() {
            return Err(ActionError::CannotAttack(attacker_pos));
        }
        let target = self
            .units
            .get(&target_pos)
            .ok_or(ActionError::NoUnit(target_pos))?;
        if target.owner == attacker.owner {
            return Err(ActionError::FriendlyTarget(target_pos));
        }
        if !attacker.possible_targets(self).contains(&target_pos) {
            return Err(ActionError::OutOfRange(target_pos));
        }

        let mut destroyed = false;
        if let Some(target) = self.units.get_mut(&target_pos) {
            target.take_damage(attacker.stats().attack);
            destroyed = !target.is_alive();
        }
        if destroyed {
            self.units.remove(&target_pos);
        }
        if let Some(attacker) = self.units.get_mut(&attacker_pos) {
            attacker.has_attacked = true;
        }
        Ok(())
    }

    fn check_build(&self, kind: UnitKind, position: Hex, side: Side) -> Result<(), ActionError> {
        if !self.is_valid_position(position) {
            return Err(ActionError::OutOfMap(position));
        }
        if !self.is_empty(position) {
            return Err(ActionError::Occupied(position));
        }
        if self.gold[side.index()] < self.unit_cost(kind, side) {
            return Err(ActionError::NotEnoughGold(kind.name()));
        }
        Ok(())
    }

    pub fn can_build_unit(&self, kind: UnitKind, position: Hex, side: Side) -> bool {
        self.check_build(kind, position, side).is_ok()
    }

    /// Build a unit for a side, debiting its cost
    pub fn build_unit(&mut self, kind: UnitKind, position: Hex, side: Side) -> Result<(), ActionError> {
        self.check_build(kind, position, side)?;
        let cost = self.unit_cost(kind, side);
        self.gold[side.index()] -= cost;
        self.units.insert(position, Unit::create(kind, side, position));
        Ok(())
    }

    // ========================================================================
    // TURN MANAGEMENT
    // ========================================================================

    /// Advance one step along the phase cycle
    ///
    /// Advancing out of EndTurn runs `end_turn`. Advancing out of Income
    /// collects nothing; income is handled by `end_turn`.
    pub fn next_phase(&mut self) {
        match self.phase {
            TurnPhase::Income => self.phase = TurnPhase::Build,
            TurnPhase::Build => self.phase = TurnPhase::Move,
            TurnPhase::Move => self.phase = TurnPhase::Combat,
            TurnPhase::Combat => self.phase = TurnPhase::EndTurn,
            TurnPhase::EndTurn => self.end_turn(),
        }
    }

    /// Close out the current side's turn and begin the opponent's
    pub fn end_turn(&mut self) {
        let ending = self.current_side;
        for unit in self.units.values_mut() {
            if unit.owner == ending && unit.is_alive() {
                unit.reset_turn_flags();
            }
        }

        self.current_side = ending.opponent();

        // Income goes to the side whose turn is beginning.
        let income = self.count_units_of(UnitKind::House, self.current_side) as i32 * HOUSE_INCOME;
        self.gold[self.current_side.index()] += income;

        self.phase = TurnPhase::Build;

        if self.current_side == Side::Side1 {
            self.turn += 1;
        }
    }

    // ========================================================================
    // WIN CONDITIONS
    // ========================================================================

    /// Elimination beats economic victory: a side with no living units has
    /// lost even if its (dead) house count would qualify.
    pub fn check_win_condition(&self) -> Option<Side> {
        if self.units_owned_by(Side::Side1).is_empty() {
            return Some(Side::Side2);
        }
        if self.units_owned_by(Side::Side2).is_empty() {
            return Some(Side::Side1);
        }

        if self.count_units_of(UnitKind::House, Side::Side1) >= HOUSES_FOR_ECONOMIC_WIN {
            return Some(Side::Side1);
        }
        if self.count_units_of(UnitKind::House, Side::Side2) >= HOUSES_FOR_ECONOMIC_WIN {
            return Some(Side::Side2);
        }

        None
    }

    // ========================================================================
    // LEVEL SETUP
    // ========================================================================

    /// Reset the match state to a level template
    ///
    /// Keeps this board's radius; placements outside the map are skipped,
    /// which the generators never produce.
    pub fn apply_level(&mut self, config: &LevelConfig) {
        self.units.clear();
        self.gold = [config.side1_gold, config.side2_gold];
        self.current_side = Side::Side1;
        self.phase = TurnPhase::Build;
        self.turn = 1;

        for &(kind, position) in &config.side1_units {
            let _ = self.place_unit(Unit::create(kind, Side::Side1, position));
        }
        for &(kind, position) in &config.side2_units {
            let _ = self.place_unit(Unit::create(kind, Side::Side2, position));
        }
    }

    /// Build a board sized for the template, then apply it
    pub fn from_level(config: &LevelConfig) -> Self {
        let mut board = Board::new(config.map_radius);
        board.apply_level(config);
        board
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Capture the persisted fields of the match state
    pub fn snapshot(&self) -> Snapshot {
        let mut units: Vec<Unit> = self.units.values().copied().collect();
        units.sort_unstable_by_key(|unit| unit.position);
        Snapshot {
            map_radius: self.radius,
            units,
            current_side: self.current_side,
            phase: self.phase,
            turn: self.turn,
            side1_gold: self.gold[0],
            side2_gold: self.gold[1],
        }
    }

    /// Rehydrate a board from persisted state
    ///
    /// Only the valid-position set is re-derived (from the radius); a payload
    /// that breaks the structural invariants is rejected.
    pub fn restore(snapshot: &Snapshot) -> anyhow::Result<Self> {
        let mut board = Board::new(snapshot.map_radius);
        board.current_side = snapshot.current_side;
        board.phase = snapshot.phase;
        board.turn = snapshot.turn;
        board.gold = [snapshot.side1_gold, snapshot.side2_gold];

        for &unit in &snapshot.units {
            if !board.is_valid_position(unit.position) {
                bail!(
                    "unit at {} is outside the radius-{} map",
                    unit.position,
                    snapshot.map_radius
                );
            }
            if board.units.insert(unit.position, unit).is_some() {
                bail!("duplicate unit position {}", unit.position);
            }
        }

        Ok(board)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(units: &[(UnitKind, Side, Hex)]) -> Board {
        let mut board = Board::new(4);
        for &(kind, side, position) in units {
            board.place_unit(Unit::create(kind, side, position)).unwrap();
        }
        board
    }

    #[test]
    fn test_new_board() {
        let board = Board::new(4);
        assert_eq!(board.current_side(), Side::Side1);
        assert_eq!(board.phase(), TurnPhase::Build);
        assert_eq!(board.turn(), 1);
        assert_eq!(board.gold(Side::Side1), DEFAULT_STARTING_GOLD);
        assert_eq!(board.gold(Side::Side2), DEFAULT_STARTING_GOLD);
        assert!(board.is_valid_position(Hex::new(4, 0)));
        assert!(!board.is_valid_position(Hex::new(5, 0)));
    }

    #[test]
    fn test_place_unit_rejects_occupied_and_off_map() {
        let mut board = Board::new(4);
        let pos = Hex::new(0, 0);
        board.place_unit(Unit::create(UnitKind::Scout, Side::Side1, pos)).unwrap();

        assert_eq!(
            board.place_unit(Unit::create(UnitKind::Scout, Side::Side2, pos)),
            Err(ActionError::Occupied(pos))
        );
        let off = Hex::new(9, 0);
        assert_eq!(
            board.place_unit(Unit::create(UnitKind::Scout, Side::Side1, off)),
            Err(ActionError::OutOfMap(off))
        );
    }

    #[test]
    fn test_move_unit() {
        let from = Hex::new(0, 3);
        let to = Hex::new(0, 1);
        let mut board = board_with(&[(UnitKind::Scout, Side::Side1, from)]);

        board.move_unit(from, to).unwrap();
        assert!(board.is_empty(from));

        let moved = board.unit_at(to).unwrap();
        assert_eq!(moved.position, to);
        assert!(moved.has_moved);
        assert!(!moved.has_attacked);
        assert_eq!(moved.health, 20);
    }

    #[test]
    fn test_move_carries_state() {
        let from = Hex::new(0, 3);
        let to = Hex::new(1, 2);
        let mut board = board_with(&[(UnitKind::Scout, Side::Side1, from)]);
        {
            let unit = board.units.get_mut(&from).unwrap();
            unit.health = 7;
            unit.has_attacked = true;
        }

        board.move_unit(from, to).unwrap();
        let moved = board.unit_at(to).unwrap();
        assert_eq!(moved.health, 7);
        assert!(moved.has_attacked);
        assert!(moved.has_moved);
    }

    #[test]
    fn test_move_out_of_range_fails_unchanged() {
        let from = Hex::new(0, 3);
        let mut board = board_with(&[(UnitKind::Scout, Side::Side1, from)]);
        let before = board.snapshot();

        // Scout range is 3; distance to (0, -3) is 6.
        let result = board.move_unit(from, Hex::new(0, -3));
        assert_eq!(result, Err(ActionError::OutOfRange(Hex::new(0, -3))));
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn test_move_rejects_wrong_side_and_buildings() {
        let mut board = board_with(&[
            (UnitKind::Scout, Side::Side2, Hex::new(0, -3)),
            (UnitKind::House, Side::Side1, Hex::new(0, 3)),
        ]);

        assert_eq!(
            board.move_unit(Hex::new(0, -3), Hex::new(0, -2)),
            Err(ActionError::NotOwned(Hex::new(0, -3)))
        );
        assert_eq!(
            board.move_unit(Hex::new(0, 3), Hex::new(0, 2)),
            Err(ActionError::CannotMove(Hex::new(0, 3)))
        );
    }

    #[test]
    fn test_attack_damages_target() {
        let attacker = Hex::new(0, 0);
        let target = Hex::new(1, 0);
        let mut board = board_with(&[
            (UnitKind::Scout, Side::Side1, attacker),
            (UnitKind::Warrior, Side::Side2, target),
        ]);

        board.attack_unit(attacker, target).unwrap();
        // Warrior: 40 health, scout attack 5.
        assert_eq!(board.unit_at(target).unwrap().health, 35);
        assert!(board.unit_at(attacker).unwrap().has_attacked);
    }

    #[test]
    fn test_attack_destroys_and_removes_target() {
        let attacker = Hex::new(0, 0);
        let target = Hex::new(1, 0);
        let mut board = board_with(&[
            (UnitKind::Champion, Side::Side1, attacker),
            (UnitKind::Scout, Side::Side2, target),
        ]);

        // Champion attack 30 >= scout health 20.
        board.attack_unit(attacker, target).unwrap();
        assert!(board.is_empty(target));
    }

    #[test]
    fn test_attack_rejects_friendly_and_out_of_range() {
        let mut board = board_with(&[
            (UnitKind::Warrior, Side::Side1, Hex::new(0, 0)),
            (UnitKind::Scout, Side::Side1, Hex::new(1, 0)),
            (UnitKind::Scout, Side::Side2, Hex::new(0, 3)),
        ]);

        assert_eq!(
            board.attack_unit(Hex::new(0, 0), Hex::new(1, 0)),
            Err(ActionError::FriendlyTarget(Hex::new(1, 0)))
        );
        assert_eq!(
            board.attack_unit(Hex::new(0, 0), Hex::new(0, 3)),
            Err(ActionError::OutOfRange(Hex::new(0, 3)))
        );
    }

    #[test]
    fn test_attack_only_once_per_turn() {
        let attacker = Hex::new(0, 0);
        let target = Hex::new(1, 0);
        let mut board = board_with(&[
            (UnitKind::Scout, Side::Side1, attacker),
            (UnitKind::Champion, Side::Side2, target),
        ]);

        board.attack_unit(attacker, target).unwrap();
        assert_eq!(
            board.attack_unit(attacker, target),
            Err(ActionError::CannotAttack(attacker))
        );
    }

    #[test]
    fn test_build_unit_debits_gold() {
        let mut board = Board::new(4);
        let pos = Hex::new(0, 2);
        board.build_unit(UnitKind::Knight, pos, Side::Side1).unwrap();

        assert_eq!(board.gold(Side::Side1), DEFAULT_STARTING_GOLD - 50);
        let knight = board.unit_at(pos).unwrap();
        assert_eq!(knight.kind, UnitKind::Knight);
        assert_eq!(knight.health, 70);
        assert!(!knight.has_moved && !knight.has_attacked);
    }

    #[test]
    fn test_house_cost_rises_with_each_house() {
        let mut board = Board::new(4);
        board.gold[0] = 1000;

        assert_eq!(board.unit_cost(UnitKind::House, Side::Side1), 30);
        board.build_unit(UnitKind::House, Hex::new(0, 2), Side::Side1).unwrap();
        assert_eq!(board.gold(Side::Side1), 970);

        assert_eq!(board.unit_cost(UnitKind::House, Side::Side1), 50);
        board.build_unit(UnitKind::House, Hex::new(1, 2), Side::Side1).unwrap();
        assert_eq!(board.gold(Side::Side1), 920);

        // The opponent still pays the base price.
        assert_eq!(board.unit_cost(UnitKind::House, Side::Side2), 30);
    }

    #[test]
    fn test_build_fails_without_gold() {
        let mut board = Board::new(4);
        board.gold[0] = 20;
        let pos = Hex::new(0, 2);

        assert!(!board.can_build_unit(UnitKind::Champion, pos, Side::Side1));
        assert_eq!(
            board.build_unit(UnitKind::Champion, pos, Side::Side1),
            Err(ActionError::NotEnoughGold("Champion"))
        );
        assert_eq!(board.gold(Side::Side1), 20);
        assert!(board.is_empty(pos));
    }

    #[test]
    fn test_phase_cycle() {
        let mut board = Board::new(4);
        assert_eq!(board.phase(), TurnPhase::Build);
        board.next_phase();
        assert_eq!(board.phase(), TurnPhase::Move);
        board.next_phase();
        assert_eq!(board.phase(), TurnPhase::Combat);
        board.next_phase();
        assert_eq!(board.phase(), TurnPhase::EndTurn);
        board.next_phase(); // runs end_turn
        assert_eq!(board.phase(), TurnPhase::Build);
        assert_eq!(board.current_side(), Side::Side2);
    }

    #[test]
    fn test_income_phase_is_a_no_op() {
        let mut board = Board::new(4);
        board.phase = TurnPhase::Income;
        let gold_before = board.gold(Side::Side1);

        board.next_phase();
        assert_eq!(board.phase(), TurnPhase::Build);
        assert_eq!(board.gold(Side::Side1), gold_before);
    }

    #[test]
    fn test_end_turn_resets_flags_and_pays_income() {
        let mut board = board_with(&[
            (UnitKind::Scout, Side::Side1, Hex::new(0, 3)),
            (UnitKind::House, Side::Side2, Hex::new(0, -3)),
            (UnitKind::House, Side::Side2, Hex::new(1, -3)),
            (UnitKind::Scout, Side::Side2, Hex::new(2, -3)),
        ]);
        {
            let unit = board.units.get_mut(&Hex::new(0, 3)).unwrap();
            unit.has_moved = true;
            unit.has_attacked = true;
        }
        let side2_gold = board.gold(Side::Side2);

        board.end_turn();

        assert_eq!(board.current_side(), Side::Side2);
        assert_eq!(board.phase(), TurnPhase::Build);
        let scout = board.unit_at(Hex::new(0, 3)).unwrap();
        assert!(!scout.has_moved && !scout.has_attacked);
        // Two living houses for the side whose turn begins.
        assert_eq!(board.gold(Side::Side2), side2_gold + 2 * HOUSE_INCOME);
    }

    #[test]
    fn test_turn_counter_increments_when_side1_begins() {
        let mut board = Board::new(4);
        assert_eq!(board.turn(), 1);
        board.end_turn(); // side2 begins
        assert_eq!(board.turn(), 1);
        board.end_turn(); // side1 begins again
        assert_eq!(board.turn(), 2);
    }

    #[test]
    fn test_win_by_elimination() {
        let board = board_with(&[(UnitKind::Scout, Side::Side1, Hex::new(0, 0))]);
        assert_eq!(board.check_win_condition(), Some(Side::Side1));
    }

    #[test]
    fn test_elimination_beats_house_count() {
        let board = board_with(&[
            (UnitKind::House, Side::Side1, Hex::new(0, 0)),
            (UnitKind::House, Side::Side1, Hex::new(1, 0)),
            (UnitKind::House, Side::Side1, Hex::new(2, 0)),
            (UnitKind::House, Side::Side1, Hex::new(3, 0)),
            (UnitKind::House, Side::Side1, Hex::new(4, 0)),
        ]);
        assert_eq!(board.check_win_condition(), Some(Side::Side1));

        // And a side whose only claim is houses that no longer stand gets
        // nothing: elimination is checked first.
        let mut dead_houses = board.clone();
        dead_houses
            .place_unit(Unit::create(UnitKind::Scout, Side::Side2, Hex::new(0, -2)))
            .unwrap();
        for q in 0..5 {
            dead_houses.units.remove(&Hex::new(q, 0));
        }
        assert_eq!(dead_houses.check_win_condition(), Some(Side::Side2));
    }

    #[test]
    fn test_economic_victory_with_standing_army() {
        let mut board = board_with(&[
            (UnitKind::Scout, Side::Side1, Hex::new(0, 3)),
            (UnitKind::Scout, Side::Side2, Hex::new(0, -3)),
        ]);
        for q in -2..3 {
            board
                .place_unit(Unit::create(UnitKind::House, Side::Side1, Hex::new(q, 2)))
                .unwrap();
        }
        assert_eq!(board.check_win_condition(), Some(Side::Side1));
    }

    #[test]
    fn test_no_winner_midgame() {
        let board = board_with(&[
            (UnitKind::Scout, Side::Side1, Hex::new(0, 3)),
            (UnitKind::Scout, Side::Side2, Hex::new(0, -3)),
        ]);
        assert_eq!(board.check_win_condition(), None);
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut board = board_with(&[
            (UnitKind::Scout, Side::Side1, Hex::new(0, 3)),
            (UnitKind::House, Side::Side1, Hex::new(1, 3)),
            (UnitKind::Warrior, Side::Side2, Hex::new(0, -3)),
        ]);
        board.units.get_mut(&Hex::new(0, 3)).unwrap().has_moved = true;
        board.units.get_mut(&Hex::new(0, -3)).unwrap().health = 12;
        board.next_phase();
        board.gold[1] = 55;

        let snapshot = board.snapshot();
        let restored = Board::restore(&snapshot).unwrap();

        assert_eq!(restored.radius(), board.radius());
        assert_eq!(restored.current_side(), board.current_side());
        assert_eq!(restored.phase(), board.phase());
        assert_eq!(restored.turn(), board.turn());
        for side in [Side::Side1, Side::Side2] {
            assert_eq!(restored.gold(side), board.gold(side));
        }
        for unit in board.units() {
            assert_eq!(restored.unit_at(unit.position), Some(unit));
        }
        assert_eq!(restored.check_win_condition(), board.check_win_condition());
    }

    #[test]
    fn test_restore_rejects_out_of_map_unit() {
        let mut snapshot = Board::new(3).snapshot();
        snapshot
            .units
            .push(Unit::create(UnitKind::Scout, Side::Side1, Hex::new(4, 0)));
        assert!(Board::restore(&snapshot).is_err());
    }

    #[test]
    fn test_restore_rejects_duplicate_position() {
        let mut snapshot = Board::new(3).snapshot();
        let pos = Hex::new(0, 0);
        snapshot.units.push(Unit::create(UnitKind::Scout, Side::Side1, pos));
        snapshot.units.push(Unit::create(UnitKind::House, Side::Side2, pos));
        assert!(Board::restore(&snapshot).is_err());
    }
}
