//! Survival streak leaderboard
//!
//! Best streaks first, at most [`MAX_RECORDS`]. Kept in LocalStorage on the
//! web.

use serde::{Deserialize, Serialize};

use crate::storage;

pub const MAX_RECORDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalRecord {
    /// Consecutive nights survived
    pub streak: u32,
    /// Tower level on the night the record was set
    pub tower_level: u32,
    /// Unix timestamp (ms)
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurvivalBoard {
    records: Vec<SurvivalRecord>,
}

impl SurvivalBoard {
    const STORAGE_KEY: &'static str = "night_siege_survival";

    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a streak. Equal streaks rank behind the ones already there.
    /// Returns the 1-based rank, or `None` if the streak missed the board.
    pub fn record(&mut self, streak: u32, tower_level: u32, timestamp: f64) -> Option<usize> {
        if streak == 0 {
            return None;
        }
        let slot = self.records.partition_point(|r| r.streak >= streak);
        if slot >= MAX_RECORDS {
            return None;
        }
        self.records.insert(
            slot,
            SurvivalRecord {
                streak,
                tower_level,
                timestamp,
            },
        );
        self.records.truncate(MAX_RECORDS);
        Some(slot + 1)
    }

    pub fn records(&self) -> &[SurvivalRecord] {
        &self.records
    }

    pub fn best(&self) -> Option<&SurvivalRecord> {
        self.records.first()
    }

    pub fn load() -> Self {
        let Some(json) = storage::read(Self::STORAGE_KEY) else {
            return Self::new();
        };
        match serde_json::from_str::<Self>(&json) {
            Ok(board) => {
                log::info!("Loaded {} survival records", board.records.len());
                board
            }
            Err(e) => {
                log::warn!("Discarding unreadable survival records: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => storage::write(Self::STORAGE_KEY, &json),
            Err(e) => log::warn!("Survival records not saved: {}", e),
        }
    }
}

/// Current time as a Unix timestamp in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streaks(board: &SurvivalBoard) -> Vec<u32> {
        board.records().iter().map(|r| r.streak).collect()
    }

    #[test]
    fn test_zero_streak_is_not_recorded() {
        let mut board = SurvivalBoard::new();
        assert_eq!(board.record(0, 1, 0.0), None);
        assert!(board.best().is_none());
    }

    #[test]
    fn test_best_first_and_ties_behind_older() {
        let mut board = SurvivalBoard::new();
        assert_eq!(board.record(2, 1, 1.0), Some(1));
        assert_eq!(board.record(5, 3, 2.0), Some(1));
        assert_eq!(board.record(2, 2, 3.0), Some(3));

        assert_eq!(streaks(&board), vec![5, 2, 2]);
        assert_eq!(board.records()[1].timestamp, 1.0);
        assert_eq!(board.best().map(|r| r.tower_level), Some(3));
    }

    #[test]
    fn test_full_board_drops_the_weakest() {
        let mut board = SurvivalBoard::new();
        for streak in 1..=MAX_RECORDS as u32 {
            board.record(streak, 1, 0.0);
        }
        // Ties with the last place don't displace it
        assert_eq!(board.record(1, 1, 9.0), None);
        assert_eq!(board.record(50, 4, 0.0), Some(1));
        assert_eq!(board.records().len(), MAX_RECORDS);
        assert_eq!(board.records().last().map(|r| r.streak), Some(2));
    }

    #[test]
    fn test_json_is_a_plain_list() {
        let mut board = SurvivalBoard::new();
        board.record(3, 2, 10.0);
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.starts_with('['));
        assert_eq!(serde_json::from_str::<SurvivalBoard>(&json).unwrap(), board);
    }

    #[test]
    fn test_native_storage_keeps_nothing() {
        let mut board = SurvivalBoard::new();
        board.record(4, 1, 0.0);
        board.save();
        assert_eq!(SurvivalBoard::load(), SurvivalBoard::new());
    }
}
