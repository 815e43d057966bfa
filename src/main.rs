//! Reaction Rush headless demo
//!
//! Loads settings, lets the autoplay bot play one session at ~60 FPS of
//! simulated time, and prints the result and the leaderboard.

use std::time::{SystemTime, UNIX_EPOCH};

use reaction_rush::autoplay::AutoPlayer;
use reaction_rush::{GameSession, Settings};

/// Simulated frame length (ms)
const FRAME_MS: u64 = 16;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_path =
        std::env::var("REACTION_RUSH_SETTINGS").unwrap_or_else(|_| "reaction_rush.json".into());
    let settings = Settings::load_from(&settings_path);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    log::info!("Reaction Rush starting with seed {}", seed);

    let mut session = GameSession::from_settings(&settings, seed);
    if let Err(err) = session.start(settings.level) {
        log::error!("{}", err);
        return;
    }

    let mut bot = AutoPlayer::new(seed.rotate_left(17));
    let Some(stats) = bot.play(&mut session, FRAME_MS) else {
        return;
    };

    println!("Final score: {}", stats.score);
    println!("Max combo:   x{}", stats.max_combo);
    println!("Targets hit: {} (missed {})", stats.targets_hit, stats.targets_missed);
    if stats.new_high_score {
        println!("NEW HIGH SCORE!");
    }

    println!();
    println!("Leaderboard");
    for (i, entry) in session.leaderboard().entries.iter().enumerate() {
        println!(
            "{:>2}. {:>6}  {:<6}  combo x{:<3} hits {:<3} {}",
            i + 1,
            entry.score,
            entry.level.as_str().to_uppercase(),
            entry.combo,
            entry.hits,
            entry.date
        );
    }
}
