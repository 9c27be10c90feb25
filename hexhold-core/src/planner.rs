//! Rule-based opponent planner
//!
//! The planner acts through the board's public operations only and never
//! mutates state directly, so every decision it makes is re-checked by the
//! same legality rules a human player's UI goes through. Ties are broken by
//! coordinate order to keep its play deterministic.

use std::cmp::Reverse;

use rustc_hash::FxHashSet;

use crate::board::{Board, TurnPhase};
use crate::hex::Hex;
use crate::units::{Side, UnitKind};

// ============================================================================
// DOCTRINE
// ============================================================================

/// Thresholds steering the planner's build and combat rules
#[derive(Clone, Debug)]
pub struct Doctrine {
    /// Keep building houses until this many stand
    pub house_target: usize,
    /// Threat score above which a watchtower goes up
    pub alert_threshold: i32,
    /// Prefer finishing off enemies at or below this health
    pub weak_health: i32,
    /// Gold tiers for picking the strongest affordable soldier
    pub champion_gold: i32,
    pub knight_gold: i32,
    pub warrior_gold: i32,
}

impl Default for Doctrine {
    fn default() -> Self {
        Self {
            house_target: 3,
            alert_threshold: 2,
            weak_health: 30,
            champion_gold: 100,
            knight_gold: 50,
            warrior_gold: 25,
        }
    }
}

// ============================================================================
// PLANNER
// ============================================================================

/// Plays one side of a match, one phase at a time
pub struct Planner {
    side: Side,
    doctrine: Doctrine,
}

impl Planner {
    pub fn new(side: Side) -> Self {
        Self::with_doctrine(side, Doctrine::default())
    }

    pub fn with_doctrine(side: Side, doctrine: Doctrine) -> Self {
        Self { side, doctrine }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Perform one phase's worth of actions, then advance the phase
    ///
    /// Does nothing when it is not this planner's turn. A phase with no legal
    /// action simply advances.
    pub fn take_phase(&self, board: &mut Board) {
        if board.current_side() != self.side {
            return;
        }

        match board.phase() {
            TurnPhase::Income | TurnPhase::EndTurn => {}
            TurnPhase::Build => self.build_phase(board),
            TurnPhase::Move => self.move_phase(board),
            TurnPhase::Combat => self.combat_phase(board),
        }

        board.next_phase();
    }

    // ========================================================================
    // BUILD PHASE
    // ========================================================================

    /// Priority: economy first, then defense when threatened, then soldiers
    fn build_phase(&self, board: &mut Board) {
        let houses = board.count_units_of(UnitKind::House, self.side);
        if houses < self.doctrine.house_target
            && board.gold(self.side) >= board.unit_cost(UnitKind::House, self.side)
        {
            if let Some(position) = self.safest_build_position(board) {
                if board.build_unit(UnitKind::House, position, self.side).is_ok() {
                    return;
                }
            }
        }

        if self.threat_level(board) > self.doctrine.alert_threshold
            && board.gold(self.side) >= board.unit_cost(UnitKind::Watchtower, self.side)
        {
            if let Some(position) = self.best_defense_position(board) {
                if board
                    .build_unit(UnitKind::Watchtower, position, self.side)
                    .is_ok()
                {
                    return;
                }
            }
        }

        let kind = self.choose_soldier(board);
        if board.gold(self.side) >= board.unit_cost(kind, self.side) {
            if let Some(position) = self.forward_build_position(board) {
                let _ = board.build_unit(kind, position, self.side);
            }
        }
    }

    /// Strongest soldier the current gold tier affords
    fn choose_soldier(&self, board: &Board) -> UnitKind {
        let gold = board.gold(self.side);
        if gold >= self.doctrine.champion_gold {
            UnitKind::Champion
        } else if gold >= self.doctrine.knight_gold {
            UnitKind::Knight
        } else if gold >= self.doctrine.warrior_gold {
            UnitKind::Warrior
        } else {
            UnitKind::Scout
        }
    }

    /// Empty valid positions within `range` of any of our units, deduplicated
    /// and in coordinate order
    fn build_candidates(&self, board: &Board, range: i32) -> Vec<Hex> {
        let mut seen = FxHashSet::default();
        let mut candidates = Vec::new();
        for unit in board.units_owned_by(self.side) {
            for position in unit.position.neighbors_within(range) {
                if board.is_valid_position(position)
                    && board.is_empty(position)
                    && seen.insert(position)
                {
                    candidates.push(position);
                }
            }
        }
        candidates.sort_unstable();
        candidates
    }

    /// House site with the least exposure to enemy reach
    fn safest_build_position(&self, board: &Board) -> Option<Hex> {
        self.build_candidates(board, 1)
            .into_iter()
            .min_by_key(|&position| self.position_threat(board, position))
    }

    /// Watchtower site covering the most of our buildings
    fn best_defense_position(&self, board: &Board) -> Option<Hex> {
        let tower_range = UnitKind::Watchtower.stats().attack_range;
        self.build_candidates(board, 2)
            .into_iter()
            .min_by_key(|&position| {
                (
                    Reverse(self.covered_buildings(board, position, tower_range)),
                    position,
                )
            })
    }

    /// Soldier site closest to the enemy
    fn forward_build_position(&self, board: &Board) -> Option<Hex> {
        self.build_candidates(board, 1)
            .into_iter()
            .min_by_key(|&position| self.distance_to_nearest_enemy(board, position))
    }

    // ========================================================================
    // MOVE PHASE
    // ========================================================================

    /// Soldiers advance toward the nearest enemy
    fn move_phase(&self, board: &mut Board) {
        let mut movers: Vec<Hex> = board
            .units_owned_by(self.side)
            .iter()
            .filter(|unit| unit.can_move())
            .map(|unit| unit.position)
            .collect();
        movers.sort_unstable();

        for from in movers {
            // Re-validate against the live board; earlier moves may have
            // changed what is reachable.
            let Some(unit) = board.unit_at(from).copied() else {
                continue;
            };
            if unit.owner != self.side || !unit.can_move() {
                continue;
            }

            let mut moves: Vec<Hex> = unit.possible_moves(board).into_iter().collect();
            if moves.is_empty() {
                continue;
            }
            moves.sort_unstable();

            let destination = if unit.kind.is_soldier() {
                moves
                    .into_iter()
                    .min_by_key(|&position| self.distance_to_nearest_enemy(board, position))
            } else {
                moves.into_iter().next()
            };
            if let Some(to) = destination {
                let _ = board.move_unit(from, to);
            }
        }
    }

    // ========================================================================
    // COMBAT PHASE
    // ========================================================================

    /// Heaviest hitters strike first; targets die mid-sequence, so each
    /// attack re-reads the board
    fn combat_phase(&self, board: &mut Board) {
        let mut attackers: Vec<(i32, Hex)> = board
            .units_owned_by(self.side)
            .iter()
            .filter(|unit| unit.can_attack())
            .map(|unit| (unit.stats().attack, unit.position))
            .collect();
        attackers.sort_unstable_by_key(|&(attack, position)| (Reverse(attack), position));

        for (_, position) in attackers {
            let Some(attacker) = board.unit_at(position).copied() else {
                continue;
            };
            if attacker.owner != self.side || !attacker.can_attack() {
                continue;
            }

            let targets = attacker.possible_targets(board);
            if let Some(target) = self.best_target(board, &targets) {
                let _ = board.attack_unit(position, target);
            }
        }
    }

    /// Target priority: houses, then killable weaklings, then the most
    /// expensive unit in reach
    fn best_target(&self, board: &Board, targets: &[Hex]) -> Option<Hex> {
        let mut positions: Vec<Hex> = targets.to_vec();
        positions.sort_unstable();

        if let Some(&house) = positions
            .iter()
            .find(|&&p| board.unit_at(p).is_some_and(|u| u.kind == UnitKind::House))
        {
            return Some(house);
        }

        let weakest = positions
            .iter()
            .filter_map(|&p| board.unit_at(p))
            .filter(|u| u.health <= self.doctrine.weak_health)
            .min_by_key(|u| (u.health, u.position));
        if let Some(unit) = weakest {
            return Some(unit.position);
        }

        positions
            .iter()
            .filter_map(|&p| board.unit_at(p))
            .min_by_key(|u| (Reverse(u.stats().cost), u.position))
            .map(|u| u.position)
    }

    // ========================================================================
    // THREAT ASSESSMENT
    // ========================================================================

    /// How many of our units the enemy can strike right now, houses weighted
    /// as three
    fn threat_level(&self, board: &Board) -> i32 {
        let mut threat = 0;
        for enemy in board.units_owned_by(self.side.opponent()) {
            for target in enemy.possible_targets(board) {
                if let Some(unit) = board.unit_at(target) {
                    if unit.owner == self.side {
                        threat += 1;
                        if unit.kind == UnitKind::House {
                            threat += 2;
                        }
                    }
                }
            }
        }
        threat
    }

    /// Total enemy attack power that can reach a position next turn
    fn position_threat(&self, board: &Board, position: Hex) -> i32 {
        board
            .units_owned_by(self.side.opponent())
            .iter()
            .filter(|enemy| {
                let stats = enemy.stats();
                position.distance(enemy.position) <= stats.attack_range + stats.movement_range
            })
            .map(|enemy| enemy.stats().attack)
            .sum()
    }

    /// Our buildings a tower at `position` would cover
    fn covered_buildings(&self, board: &Board, position: Hex, range: i32) -> i32 {
        board
            .units_owned_by(self.side)
            .iter()
            .filter(|unit| unit.kind.is_building())
            .filter(|unit| position.is_within_range(range, unit.position))
            .count() as i32
    }

    fn distance_to_nearest_enemy(&self, board: &Board, position: Hex) -> i32 {
        board
            .units_owned_by(self.side.opponent())
            .iter()
            .map(|enemy| position.distance(enemy.position))
            .min()
            .unwrap_or(i32::MAX)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    fn board_with(units: &[(UnitKind, Side, Hex)]) -> Board {
        let mut board = Board::new(4);
        for &(kind, side, position) in units {
            board.place_unit(Unit::create(kind, side, position)).unwrap();
        }
        board
    }

    #[test]
    fn test_builds_house_first() {
        let mut board = board_with(&[
            (UnitKind::Scout, Side::Side1, Hex::new(0, 3)),
            (UnitKind::Scout, Side::Side2, Hex::new(0, -3)),
        ]);
        let planner = Planner::new(Side::Side1);
        planner.take_phase(&mut board);

        assert_eq!(board.count_units_of(UnitKind::House, Side::Side1), 1);
        assert_eq!(board.gold(Side::Side1), 70);
        assert_eq!(board.phase(), TurnPhase::Move);
    }

    #[test]
    fn test_house_goes_to_safest_candidate() {
        // One scout next to the enemy, one far away: the house must appear
        // next to the sheltered scout.
        let mut board = board_with(&[
            (UnitKind::Scout, Side::Side1, Hex::new(0, 3)),
            (UnitKind::Scout, Side::Side1, Hex::new(0, -2)),
            (UnitKind::Champion, Side::Side2, Hex::new(0, -3)),
        ]);
        let planner = Planner::new(Side::Side1);
        planner.take_phase(&mut board);

        let house = board
            .units()
            .find(|unit| unit.kind == UnitKind::House)
            .expect("house was built");
        assert!(house.position.distance(Hex::new(0, 3)) <= 1);
    }

    #[test]
    fn test_builds_watchtower_under_threat() {
        // Three houses already stand, so the house rule is satisfied; an
        // adjacent enemy raises the threat score past the alert threshold.
        let mut board = board_with(&[
            (UnitKind::House, Side::Side1, Hex::new(0, 3)),
            (UnitKind::House, Side::Side1, Hex::new(1, 3)),
            (UnitKind::House, Side::Side1, Hex::new(-1, 3)),
            (UnitKind::Warrior, Side::Side2, Hex::new(0, 2)),
        ]);
        let planner = Planner::new(Side::Side1);
        assert!(planner.threat_level(&board) > planner.doctrine.alert_threshold);

        planner.take_phase(&mut board);
        assert_eq!(board.count_units_of(UnitKind::Watchtower, Side::Side1), 1);
    }

    #[test]
    fn test_soldier_tier_selection() {
        let planner = Planner::new(Side::Side1);
        let base = crate::level::LevelConfig::catalog()
            .into_iter()
            .find(|c| c.name == "Balanced Start")
            .unwrap();

        for (gold, expected) in [
            (150, UnitKind::Champion),
            (100, UnitKind::Champion),
            (99, UnitKind::Knight),
            (50, UnitKind::Knight),
            (49, UnitKind::Warrior),
            (25, UnitKind::Warrior),
            (24, UnitKind::Scout),
            (0, UnitKind::Scout),
        ] {
            let mut config = base.clone();
            config.side1_gold = gold;
            let board = Board::from_level(&config);
            assert_eq!(planner.choose_soldier(&board), expected, "gold {gold}");
        }
    }

    #[test]
    fn test_soldier_built_toward_enemy() {
        // Houses satisfied, no threat in reach, warrior-tier gold: expect a
        // warrior on the candidate closest to the enemy, which is (0, 1).
        let config = crate::level::LevelConfig {
            name: "forward build".into(),
            description: String::new(),
            map_radius: 4,
            side1_gold: 30,
            side2_gold: 100,
            side1_units: vec![
                (UnitKind::House, Hex::new(0, 3)),
                (UnitKind::House, Hex::new(-1, 3)),
                (UnitKind::House, Hex::new(1, 3)),
                (UnitKind::Scout, Hex::new(0, 2)),
            ],
            side2_units: vec![(UnitKind::Scout, Hex::new(0, -3))],
        };
        let mut board = Board::from_level(&config);

        let planner = Planner::new(Side::Side1);
        planner.take_phase(&mut board);

        let warrior = board.unit_at(Hex::new(0, 1)).expect("warrior was built");
        assert_eq!(warrior.kind, UnitKind::Warrior);
        assert_eq!(warrior.owner, Side::Side1);
    }

    #[test]
    fn test_soldiers_advance_toward_enemy() {
        let mut board = board_with(&[
            (UnitKind::Scout, Side::Side1, Hex::new(0, 3)),
            (UnitKind::Scout, Side::Side2, Hex::new(0, -3)),
        ]);
        board.next_phase(); // Build -> Move

        let planner = Planner::new(Side::Side1);
        let before = Hex::new(0, 3).distance(Hex::new(0, -3));
        planner.take_phase(&mut board);

        let scout = board
            .units_owned_by(Side::Side1)
            .into_iter()
            .find(|unit| unit.kind == UnitKind::Scout)
            .copied()
            .unwrap();
        assert!(scout.position.distance(Hex::new(0, -3)) < before);
        assert!(scout.has_moved);
        assert_eq!(board.phase(), TurnPhase::Combat);
    }

    #[test]
    fn test_combat_prefers_houses() {
        let mut board = board_with(&[
            (UnitKind::Warrior, Side::Side1, Hex::new(0, 0)),
            (UnitKind::House, Side::Side2, Hex::new(1, 0)),
            (UnitKind::Scout, Side::Side2, Hex::new(0, 1)),
        ]);
        board.next_phase();
        board.next_phase(); // Build -> Move -> Combat

        let planner = Planner::new(Side::Side1);
        planner.take_phase(&mut board);

        // Warrior attack 10 against the house's 50 health.
        assert_eq!(board.unit_at(Hex::new(1, 0)).unwrap().health, 40);
        assert_eq!(board.unit_at(Hex::new(0, 1)).unwrap().health, 20);
    }

    #[test]
    fn test_combat_finishes_weak_target() {
        let mut board = board_with(&[
            (UnitKind::Warrior, Side::Side1, Hex::new(0, 0)),
            (UnitKind::Champion, Side::Side2, Hex::new(1, 0)),
            (UnitKind::Scout, Side::Side2, Hex::new(0, 1)),
        ]);
        board.next_phase();
        board.next_phase();

        let planner = Planner::new(Side::Side1);
        planner.take_phase(&mut board);

        // Scout (20 health <= 30) outranks the pricier champion.
        assert_eq!(board.unit_at(Hex::new(0, 1)).unwrap().health, 10);
        assert_eq!(board.unit_at(Hex::new(1, 0)).unwrap().health, 120);
    }

    #[test]
    fn test_combat_falls_back_to_highest_value() {
        let mut board = board_with(&[
            (UnitKind::Warrior, Side::Side1, Hex::new(0, 0)),
            (UnitKind::Champion, Side::Side2, Hex::new(1, 0)),
            (UnitKind::Knight, Side::Side2, Hex::new(0, 1)),
        ]);
        board.next_phase();
        board.next_phase();

        let planner = Planner::new(Side::Side1);
        planner.take_phase(&mut board);

        // Neither target is weak; the champion costs more.
        assert_eq!(board.unit_at(Hex::new(1, 0)).unwrap().health, 110);
        assert_eq!(board.unit_at(Hex::new(0, 1)).unwrap().health, 70);
    }

    #[test]
    fn test_take_phase_ignores_other_side() {
        let mut board = board_with(&[(UnitKind::Scout, Side::Side1, Hex::new(0, 3))]);
        let planner = Planner::new(Side::Side2);
        planner.take_phase(&mut board);

        // Not side2's turn: nothing happened, phase did not advance.
        assert_eq!(board.phase(), TurnPhase::Build);
        assert_eq!(board.units_owned_by(Side::Side1).len(), 1);
    }

    #[test]
    fn test_phase_advances_without_legal_actions() {
        let mut config = crate::level::LevelConfig::catalog()
            .into_iter()
            .find(|c| c.name == "Balanced Start")
            .unwrap();
        config.side1_gold = 0;
        let mut board = Board::from_level(&config);

        let planner = Planner::new(Side::Side1);
        planner.take_phase(&mut board); // Build with no gold: no-op

        assert_eq!(board.phase(), TurnPhase::Move);
        assert_eq!(board.gold(Side::Side1), 0);
    }

    #[test]
    fn test_full_turn_cycle() {
        let config = crate::level::LevelConfig::catalog()
            .into_iter()
            .find(|c| c.name == "Balanced Start")
            .unwrap();
        let mut board = Board::from_level(&config);
        let planner = Planner::new(Side::Side1);

        for _ in 0..4 {
            planner.take_phase(&mut board);
        }
        // Build, Move, Combat, EndTurn: the opponent is now up.
        assert_eq!(board.current_side(), Side::Side2);
        assert_eq!(board.phase(), TurnPhase::Build);
    }
}
