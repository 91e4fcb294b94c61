//! Fixed-interval battle driver
//!
//! Owns one battle and its tick schedule. The host feeds it elapsed wall
//! time; the clock turns that into whole ticks, stops on the first
//! terminal tick and hands the result to the reporter exactly once.
//! Cancelling or dropping the clock stops it without reporting.

use std::time::Duration;

use rand_pcg::Pcg32;

use crate::consts::MAX_SUBSTEPS;
use crate::sim::{Battle, BattleEvent, BattleResult, BattleSnapshot, Dice};

/// Receives the outcome of a battle. Fire-and-forget: the clock never
/// waits on it and never calls it twice.
pub trait BattleReporter {
    fn report(&mut self, result: &BattleResult);
}

impl<F: FnMut(&BattleResult)> BattleReporter for F {
    fn report(&mut self, result: &BattleResult) {
        self(result)
    }
}

/// Reporter that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl BattleReporter for LogReporter {
    fn report(&mut self, result: &BattleResult) {
        log::info!(
            "Battle result: {:?} with {} wall health",
            result.outcome,
            result.remaining_wall_health
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    /// Battle reached a result and it was reported
    Finished,
    /// Stopped from outside before the battle ended
    Cancelled,
}

pub struct BattleClock<R: BattleReporter, D: Dice = Pcg32> {
    battle: Battle<D>,
    reporter: R,
    interval: Duration,
    accumulator: Duration,
    state: ClockState,
}

impl<R: BattleReporter, D: Dice> BattleClock<R, D> {
    pub fn new(battle: Battle<D>, reporter: R) -> Self {
        let interval = Duration::from_millis(battle.timing().tick_ms as u64);
        Self {
            battle,
            reporter,
            interval,
            accumulator: Duration::ZERO,
            state: ClockState::Running,
        }
    }

    /// Feed elapsed time and run the ticks it covers.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.state != ClockState::Running {
            return 0;
        }

        // Drop backlog beyond what we're willing to catch up on
        let max_backlog = self.interval * MAX_SUBSTEPS;
        self.accumulator = (self.accumulator + elapsed).min(max_backlog);

        let mut substeps = 0;
        while self.accumulator >= self.interval && self.state == ClockState::Running {
            self.accumulator -= self.interval;
            self.step();
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one tick, ignoring the accumulator
    pub fn step(&mut self) -> Option<BattleResult> {
        if self.state != ClockState::Running {
            return self.battle.result();
        }
        let result = self.battle.tick()?;
        self.finish(result);
        Some(result)
    }

    /// Tick as fast as possible until the battle ends
    pub fn run_to_end(&mut self) -> Option<BattleResult> {
        while self.state == ClockState::Running {
            self.step();
        }
        self.battle.result()
    }

    /// Tick in real time, sleeping between ticks. `on_frame` sees a
    /// snapshot after every batch of ticks.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run_realtime(&mut self, mut on_frame: impl FnMut(&BattleSnapshot)) -> Option<BattleResult> {
        use std::time::Instant;

        let mut last = Instant::now();
        while self.state == ClockState::Running {
            std::thread::sleep(self.interval.saturating_sub(self.accumulator));
            let now = Instant::now();
            if self.advance(now - last) > 0 {
                on_frame(&self.battle.snapshot());
            }
            last = now;
        }
        self.battle.result()
    }

    /// Stop the clock without reporting. Returns false if it wasn't running.
    pub fn cancel(&mut self) -> bool {
        if self.state != ClockState::Running {
            return false;
        }
        self.state = ClockState::Cancelled;
        self.accumulator = Duration::ZERO;
        log::info!(
            "Battle cancelled after {} ticks",
            self.battle.elapsed_ticks()
        );
        true
    }

    fn finish(&mut self, result: BattleResult) {
        self.state = ClockState::Finished;
        self.accumulator = Duration::ZERO;
        self.reporter.report(&result);
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn battle(&self) -> &Battle<D> {
        &self.battle
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        self.battle.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.battle.drain_events()
    }
}

impl<R: BattleReporter, D: Dice> Drop for BattleClock<R, D> {
    fn drop(&mut self) {
        if self.state == ClockState::Running {
            log::debug!("Battle clock dropped mid-battle");
            self.cancel();
        }
    }
}
