//! In-memory economy
//!
//! Holds the player's energy and defenses between nights. Quiz answers earn
//! energy, the shop turns it into defenses, and a finished battle is
//! settled here: bonus and streak on a win, streak reset on a loss, and the
//! surviving wall health either way.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::BattleReporter;
use crate::error::{DefenseError, ShopError};
use crate::highscores::{SurvivalBoard, now_millis};
use crate::sim::{BattleOutcome, BattleResult, DefenseSnapshot};

/// Energy for surviving a night
pub const VICTORY_BONUS: u32 = 100;

/// Energy per correct answer, by combo length
pub const ANSWER_REWARD: u32 = 20;
pub const COMBO_REWARD: u32 = 30;
pub const BIG_COMBO_REWARD: u32 = 40;
/// Energy for answering a previously missed question
pub const REDEMPTION_REWARD: u32 = 10;

/// Wall repaired per purchase
pub const WALL_REPAIR: u32 = 20;
/// Wall health cap is `WALL_BASE_CAP + tower_level * WALL_CAP_PER_LEVEL`
pub const WALL_BASE_CAP: u32 = 100;
pub const WALL_CAP_PER_LEVEL: u32 = 50;
/// Tower levels per extra archer slot
pub const ARCHER_LEVELS_PER_SLOT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopItem {
    UpgradeTower,
    HireArcher,
    RepairWall,
}

impl ShopItem {
    pub const ALL: [ShopItem; 3] = [ShopItem::UpgradeTower, ShopItem::HireArcher, ShopItem::RepairWall];

    pub fn price(self) -> u32 {
        match self {
            ShopItem::UpgradeTower => 200,
            ShopItem::HireArcher => 100,
            ShopItem::RepairWall => 50,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShopItem::UpgradeTower => "upgrade_tower",
            ShopItem::HireArcher => "hire_archer",
            ShopItem::RepairWall => "repair_wall",
        }
    }
}

impl FromStr for ShopItem {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|item| item.as_str() == s)
            .ok_or_else(|| ShopError::UnknownItem(s.to_string()))
    }
}

/// Player progress and defenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseLedger {
    pub energy: u32,
    pub tower_level: u32,
    pub archers: u32,
    pub wall_health: u32,
    /// Consecutive nights survived; three or more brings the boss
    pub survival_streak: u32,
    /// Consecutive correct quiz answers
    pub quiz_combo: u32,
    pub nights_survived: u32,
    pub board: SurvivalBoard,
}

impl Default for DefenseLedger {
    fn default() -> Self {
        Self {
            energy: 0,
            tower_level: 1,
            archers: 0,
            wall_health: WALL_BASE_CAP,
            survival_streak: 0,
            quiz_combo: 0,
            nights_survived: 0,
            board: SurvivalBoard::new(),
        }
    }
}

impl DefenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_wall_health(&self) -> u32 {
        WALL_BASE_CAP.saturating_add(self.tower_level.saturating_mul(WALL_CAP_PER_LEVEL))
    }

    /// Archers the tower can house: one, plus one per three levels
    pub fn archer_limit(&self) -> u32 {
        self.tower_level / ARCHER_LEVELS_PER_SLOT + 1
    }

    /// Defense stats for the next battle. Fails while the wall is down.
    pub fn snapshot(&self) -> Result<DefenseSnapshot, DefenseError> {
        DefenseSnapshot::new(self.tower_level, self.archers, self.wall_health)
    }

    pub fn earn(&mut self, amount: u32) {
        self.energy = self.energy.saturating_add(amount);
    }

    /// Settle a quiz answer and return the energy it earned.
    /// A redeemed mistake pays less but still extends the combo.
    pub fn record_answer(&mut self, correct: bool, redemption: bool) -> u32 {
        if !correct {
            self.quiz_combo = 0;
            return 0;
        }
        self.quiz_combo += 1;
        let reward = if redemption {
            REDEMPTION_REWARD
        } else if self.quiz_combo >= 5 {
            BIG_COMBO_REWARD
        } else if self.quiz_combo >= 3 {
            COMBO_REWARD
        } else {
            ANSWER_REWARD
        };
        self.earn(reward);
        reward
    }

    /// Buy an item by its wire name
    pub fn purchase(&mut self, name: &str) -> Result<ShopItem, ShopError> {
        let item = name.parse()?;
        self.buy(item)?;
        Ok(item)
    }

    pub fn buy(&mut self, item: ShopItem) -> Result<(), ShopError> {
        if item == ShopItem::HireArcher && self.archers >= self.archer_limit() {
            return Err(ShopError::ArcherLimit {
                limit: self.archer_limit(),
            });
        }
        let cost = item.price();
        if self.energy < cost {
            log::warn!("Cannot afford {}: {} < {}", item.as_str(), self.energy, cost);
            return Err(ShopError::NotEnoughEnergy {
                cost,
                energy: self.energy,
            });
        }
        self.energy -= cost;

        match item {
            ShopItem::UpgradeTower => self.tower_level += 1,
            ShopItem::HireArcher => self.archers += 1,
            ShopItem::RepairWall => {
                self.wall_health = self.wall_health.saturating_add(WALL_REPAIR).min(self.max_wall_health());
            }
        }
        log::info!("Bought {} ({} energy left)", item.as_str(), self.energy);
        Ok(())
    }

    /// Settle a finished battle
    pub fn apply_battle_result(&mut self, result: &BattleResult) {
        match result.outcome {
            BattleOutcome::Won => {
                self.survival_streak += 1;
                self.nights_survived += 1;
                self.earn(VICTORY_BONUS);
                record_survival(&mut self.board, self.survival_streak, self.tower_level);
            }
            BattleOutcome::Lost => {
                self.survival_streak = 0;
            }
        }
        self.wall_health = result.remaining_wall_health;
    }
}

impl BattleReporter for DefenseLedger {
    fn report(&mut self, result: &BattleResult) {
        self.apply_battle_result(result);
    }
}

/// Settles a battle for a host that keeps the economy itself (the web
/// page). A survived night goes on the leaderboard, then `notify` gets the
/// outcome and the wall health left.
pub struct HostReporter<F: FnMut(BattleOutcome, u32)> {
    streak: u32,
    tower_level: u32,
    board: SurvivalBoard,
    notify: F,
}

impl<F: FnMut(BattleOutcome, u32)> HostReporter<F> {
    /// `streak` is the survival streak going into the battle
    pub fn new(defense: &DefenseSnapshot, streak: u32, board: SurvivalBoard, notify: F) -> Self {
        Self {
            streak,
            tower_level: defense.tower_level(),
            board,
            notify,
        }
    }

    pub fn board(&self) -> &SurvivalBoard {
        &self.board
    }
}

impl<F: FnMut(BattleOutcome, u32)> BattleReporter for HostReporter<F> {
    fn report(&mut self, result: &BattleResult) {
        if result.outcome == BattleOutcome::Won {
            record_survival(&mut self.board, self.streak.saturating_add(1), self.tower_level);
        }
        (self.notify)(result.outcome, result.remaining_wall_health);
    }
}

fn record_survival(board: &mut SurvivalBoard, streak: u32, tower_level: u32) {
    if let Some(rank) = board.record(streak, tower_level, now_millis()) {
        log::info!("Streak {} ranks #{}", streak, rank);
        board.save();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::clock::BattleClock;
    use crate::sim::rng::testing::ScriptedDice;
    use crate::sim::{Battle, BattleTiming};

    fn rich() -> DefenseLedger {
        DefenseLedger {
            energy: 1000,
            ..DefenseLedger::default()
        }
    }

    #[test]
    fn test_defaults() {
        let ledger = DefenseLedger::new();
        assert_eq!(ledger.tower_level, 1);
        assert_eq!(ledger.archers, 0);
        assert_eq!(ledger.wall_health, 100);
        assert_eq!(ledger.max_wall_health(), 150);
        let snapshot = ledger.snapshot().unwrap();
        assert_eq!(snapshot.wall_health(), 100);
    }

    #[test]
    fn test_shop_purchases() {
        let mut ledger = rich();
        assert_eq!(ledger.purchase("upgrade_tower"), Ok(ShopItem::UpgradeTower));
        assert_eq!(ledger.purchase("hire_archer"), Ok(ShopItem::HireArcher));
        assert_eq!(ledger.energy, 700);
        assert_eq!(ledger.tower_level, 2);
        assert_eq!(ledger.archers, 1);
    }

    #[test]
    fn test_archer_limit_grows_every_third_level() {
        let mut ledger = rich();
        assert_eq!(ledger.archer_limit(), 1);
        ledger.buy(ShopItem::HireArcher).unwrap();

        let before = ledger.clone();
        assert_eq!(
            ledger.buy(ShopItem::HireArcher),
            Err(ShopError::ArcherLimit { limit: 1 })
        );
        assert_eq!(ledger, before);

        ledger.tower_level = 3;
        assert_eq!(ledger.archer_limit(), 2);
        ledger.buy(ShopItem::HireArcher).unwrap();
        assert_eq!(ledger.archers, 2);
        assert_eq!(
            ledger.purchase("hire_archer"),
            Err(ShopError::ArcherLimit { limit: 2 })
        );
    }

    #[test]
    fn test_rejected_purchases_change_nothing() {
        let mut ledger = DefenseLedger {
            energy: 60,
            ..DefenseLedger::default()
        };
        let before = ledger.clone();
        assert_eq!(
            ledger.purchase("hire_archer"),
            Err(ShopError::NotEnoughEnergy {
                cost: 100,
                energy: 60
            })
        );
        assert_eq!(
            ledger.purchase("catapult"),
            Err(ShopError::UnknownItem("catapult".into()))
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_repair_is_capped() {
        let mut ledger = DefenseLedger {
            energy: 500,
            wall_health: 140,
            ..DefenseLedger::default()
        };
        ledger.buy(ShopItem::RepairWall).unwrap();
        assert_eq!(ledger.wall_health, 150);
        ledger.buy(ShopItem::RepairWall).unwrap();
        assert_eq!(ledger.wall_health, 150);

        // A wall above the cap is brought down to it
        ledger.wall_health = 400;
        ledger.buy(ShopItem::RepairWall).unwrap();
        assert_eq!(ledger.wall_health, 150);
    }

    #[test]
    fn test_quiz_combo_rewards() {
        let mut ledger = DefenseLedger::new();
        let rewards: Vec<u32> = (0..6).map(|_| ledger.record_answer(true, false)).collect();
        assert_eq!(rewards, vec![20, 20, 30, 30, 40, 40]);

        assert_eq!(ledger.record_answer(false, false), 0);
        assert_eq!(ledger.quiz_combo, 0);
        assert_eq!(ledger.record_answer(true, true), REDEMPTION_REWARD);
        assert_eq!(ledger.energy, 180 + REDEMPTION_REWARD);
    }

    #[test]
    fn test_victory_settlement() {
        let mut ledger = DefenseLedger::new();
        ledger.report(&BattleResult {
            outcome: BattleOutcome::Won,
            remaining_wall_health: 70,
        });
        assert_eq!(ledger.energy, VICTORY_BONUS);
        assert_eq!(ledger.survival_streak, 1);
        assert_eq!(ledger.wall_health, 70);
        assert_eq!(ledger.board.best().map(|r| r.streak), Some(1));
    }

    #[test]
    fn test_defeat_resets_streak_and_blocks_next_battle() {
        let mut ledger = DefenseLedger {
            survival_streak: 4,
            ..DefenseLedger::default()
        };
        ledger.report(&BattleResult {
            outcome: BattleOutcome::Lost,
            remaining_wall_health: 0,
        });
        assert_eq!(ledger.survival_streak, 0);
        assert_eq!(ledger.energy, 0);
        assert_eq!(
            ledger.snapshot(),
            Err(DefenseError::NonPositiveWallHealth(0))
        );
    }

    fn quiet_battle(level: u32, wall: u32, streak: u32) -> Battle<ScriptedDice> {
        let defense = DefenseSnapshot::new(level, 0, wall).unwrap();
        Battle::with_dice(defense, streak, BattleTiming::default(), ScriptedDice::quiet())
    }

    #[test]
    fn test_host_notified_once_on_finish() {
        let mut calls = Vec::new();
        {
            let battle = quiet_battle(2, 90, 4);
            let reporter = HostReporter::new(battle.defense(), 4, SurvivalBoard::new(), |outcome, wall| {
                calls.push((outcome, wall))
            });
            let mut clock = BattleClock::new(battle, reporter);
            // Streak 4 brings the boss and nothing shoots at it
            clock.run_to_end();
            clock.step();
            assert!(!clock.is_running());
            assert!(clock.reporter().board().best().is_none());
        }
        assert_eq!(calls, vec![(BattleOutcome::Lost, 0)]);
    }

    #[test]
    fn test_host_win_goes_on_the_board() {
        let mut calls = Vec::new();
        {
            let battle = quiet_battle(2, 90, 1);
            let reporter = HostReporter::new(battle.defense(), 1, SurvivalBoard::new(), |outcome, wall| {
                calls.push((outcome, wall))
            });
            let mut clock = BattleClock::new(battle, reporter);
            clock.run_to_end();

            let best = clock.reporter().board().best().cloned().unwrap();
            assert_eq!(best.streak, 2);
            assert_eq!(best.tower_level, 2);
        }
        assert_eq!(calls, vec![(BattleOutcome::Won, 90)]);
    }

    #[test]
    fn test_host_not_notified_on_cancel_or_drop() {
        let mut calls = 0;
        {
            let battle = quiet_battle(1, 100, 0);
            let reporter = HostReporter::new(battle.defense(), 0, SurvivalBoard::new(), |_, _| calls += 1);
            let mut clock = BattleClock::new(battle, reporter);
            clock.advance(Duration::from_millis(200));
            assert!(clock.cancel());
            clock.advance(Duration::from_secs(60));
            assert!(clock.reporter().board().best().is_none());
        }
        {
            let battle = quiet_battle(1, 100, 0);
            let reporter = HostReporter::new(battle.defense(), 0, SurvivalBoard::new(), |_, _| calls += 1);
            let mut clock = BattleClock::new(battle, reporter);
            clock.advance(Duration::from_millis(200));
        }
        assert_eq!(calls, 0);
    }
}
