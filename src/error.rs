//! Error types
//!
//! The simulation itself cannot fail once built; everything here is about
//! rejecting bad input before a battle, purchase or settings change happens.

use thiserror::Error;

/// Invalid defense snapshot handed over by the economy side.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefenseError {
    #[error("tower level must be at least 1 (got {0})")]
    InvalidTowerLevel(i64),
    #[error("archer count cannot be negative (got {0})")]
    NegativeArchers(i64),
    #[error("wall health must be positive to start a battle (got {0})")]
    NonPositiveWallHealth(i64),
    #[error("{field} is too large (got {value})")]
    OutOfRange { field: &'static str, value: i64 },
}

/// Rejected shop purchase. The ledger is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("unknown shop item `{0}`")]
    UnknownItem(String),
    #[error("not enough energy: need {cost}, have {energy}")]
    NotEnoughEnergy { cost: u32, energy: u32 },
    #[error("archer quarters are full ({limit}); upgrade the tower to hire more")]
    ArcherLimit { limit: u32 },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings: {0}")]
    Invalid(&'static str),
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read settings file: {0}")]
    Io(#[from] std::io::Error),
}
