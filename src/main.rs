//! Night Siege entry point
//!
//! Native: runs one or more nights from the command line and prints each
//! result as JSON. The web build is driven from JavaScript through
//! `night_siege::web::WebBattle`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;

    use night_siege::highscores::now_millis;
    use night_siege::sim::{Battle, BattleEvent, BattleResult, BattleSnapshot, DefenseSnapshot};
    use night_siege::{BattleClock, DefenseLedger, Settings, SurvivalBoard};

    #[derive(Parser, Debug)]
    #[command(author, version, about)]
    pub struct Cli {
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        tower_level: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        archers: i64,
        #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
        wall_health: i64,
        /// Nights already survived in a row
        #[arg(long, default_value_t = 0)]
        streak: u32,
        /// Consecutive nights to fight; the ledger carries over between them
        #[arg(long, default_value_t = 1)]
        nights: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Skip real-time pacing
        #[arg(long)]
        fast: bool,
        /// Settings JSON (defaults to $NIGHT_SIEGE_SETTINGS)
        #[arg(long)]
        settings: Option<PathBuf>,
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        env_logger::init();
        let cli = Cli::parse();
        log::info!("Night Siege (native) starting...");

        let settings = match &cli.settings {
            Some(path) => Settings::load_file(path)?,
            None => Settings::load(),
        };
        let timing = settings.timing();

        let defense = DefenseSnapshot::from_raw(cli.tower_level, cli.archers, cli.wall_health)?;
        let mut ledger = DefenseLedger {
            tower_level: defense.tower_level(),
            archers: defense.archers(),
            wall_health: defense.wall_health(),
            survival_streak: cli.streak,
            board: SurvivalBoard::load(),
            ..DefenseLedger::default()
        };
        let seed = cli.seed.unwrap_or_else(|| now_millis() as u64);
        log::info!("Seed: {}", seed);

        for night in 0..cli.nights {
            let defense = match ledger.snapshot() {
                Ok(defense) => defense,
                Err(e) => {
                    log::warn!("Night {} cannot start: {}", night + 1, e);
                    break;
                }
            };
            let battle = Battle::new(
                defense,
                ledger.survival_streak,
                timing,
                seed.wrapping_add(night as u64),
            );

            let (result, events) = {
                let mut clock =
                    BattleClock::new(battle, |r: &BattleResult| ledger.apply_battle_result(r));
                let result = if cli.fast {
                    clock.run_to_end()
                } else {
                    let mut last_second = u32::MAX;
                    clock.run_realtime(|snapshot| {
                        if snapshot.countdown() != last_second {
                            last_second = snapshot.countdown();
                            log_hud(snapshot, &settings);
                        }
                    })
                };
                (result, clock.drain_events())
            };

            for event in &events {
                log_event(event);
            }
            if let Some(result) = result {
                println!("{}", serde_json::to_string(&result)?);
            }
        }

        log::info!(
            "Ledger: {} energy, streak {}, wall {}/{}",
            ledger.energy,
            ledger.survival_streak,
            ledger.wall_health,
            ledger.max_wall_health()
        );
        Ok(())
    }

    fn log_hud(snapshot: &BattleSnapshot, settings: &Settings) {
        log::info!(
            "{:>2}s | wall {:>3} ({:?}) | {} attackers | {} arrows{}{}",
            snapshot.countdown(),
            snapshot.wall_health,
            snapshot.health_band(),
            snapshot.attackers.len(),
            snapshot.projectiles.len(),
            if snapshot.boss_warning { " | BOSS INCOMING" } else { "" },
            if settings.shake_active(snapshot) { " | IMPACT" } else { "" }
        );
    }

    fn log_event(event: &BattleEvent) {
        match event {
            BattleEvent::BossIncoming { max_hp, .. } => log::info!("Boss incoming ({} hp)", max_hp),
            BattleEvent::WallBreached {
                kind,
                damage,
                wall_health,
                ..
            } => log::info!("{:?} hit the wall for {} ({} left)", kind, damage, wall_health),
            BattleEvent::Ended(result) => log::info!("Night over: {:?}", result.outcome),
            other => log::debug!("{:?}", other),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is night_siege::web::start, this is just to satisfy the compiler
}
