//! Cannon Rush headless runner
//!
//! Plays a round with a simple autopilot at 60 Hz, then prints the result and
//! the leaderboard. By default the clock is simulated so a two minute round
//! finishes instantly; `--realtime` paces frames against the wall clock.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use cannon_rush::audio::AudioManager;
use cannon_rush::persistence::FileStore;
use cannon_rush::platform::{Clock, ManualClock, SystemClock};
use cannon_rush::sim::{CannonSide, GamePhase, ItemKind, Round, TickInput};
use cannon_rush::{Session, Settings, Variant};

const FRAME_SECS: f64 = 1.0 / 60.0;

#[derive(Debug, Parser)]
#[command(name = "cannon-rush", version, about = "Autoplay a round of Cannon Rush")]
struct Cli {
    /// Cannon layout (single or dual)
    #[arg(long, value_parser = parse_variant)]
    variant: Option<Variant>,

    /// RNG seed for a reproducible round
    #[arg(long)]
    seed: Option<u64>,

    /// Longest stretch of game time to play
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,

    /// Directory holding the leaderboard
    #[arg(long, default_value = ".cannon-rush")]
    data_dir: PathBuf,

    /// Settings file (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print the final frame snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Pace frames against the wall clock
    #[arg(long)]
    realtime: bool,
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    Variant::from_str(s).ok_or_else(|| format!("unknown variant '{s}' (expected single or dual)"))
}

/// Autopilot - aims each cannon at the most urgent item it can reach
fn autopilot(round: &Round, frame: u64) -> TickInput {
    let mut input = TickInput::default();

    if round.phase != GamePhase::Playing {
        input.start = true;
        input.restart = true;
        return input;
    }

    for (slot, cannon) in round.cannons.iter().enumerate() {
        let target = round
            .items
            .iter()
            .filter(|item| item.kind != ItemKind::Skull)
            .filter(|item| !(item.kind == ItemKind::Decoy && cannon.side() == CannonSide::Right))
            .filter(|item| {
                let angle = cannon.angle_toward(item.pos);
                angle >= cannon.spec.min_angle && angle <= cannon.spec.max_angle
            })
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        if let (Some(item), Some(cmd)) = (target, input.cannons.get_mut(slot)) {
            // Lead the target slightly
            let lead = item.pos + glam::Vec2::new(0.0, item.vel_y * 0.15);
            cmd.target_angle = Some(cannon.angle_toward(lead));
            // Press on even frames, release on odd ones
            cmd.fire = frame % 2 == 0;
        }
    }
    input
}

/// Play frames until game over or the time limit, then report
fn run<C: Clock>(
    cli: &Cli,
    settings: Settings,
    audio: AudioManager,
    clock: C,
    wait_frame: impl Fn(&C),
) {
    let mut session = Session::new(settings, clock, FileStore::new(&cli.data_dir), audio);

    log::info!(
        "Cannon Rush running for {:.0}s of {} time",
        cli.seconds,
        if cli.realtime { "wall" } else { "game" }
    );

    let frames = (cli.seconds / FRAME_SECS).ceil() as u64;
    for frame in 0..frames {
        // Stop at the first game over instead of restarting
        if session.round().phase == GamePhase::GameOver {
            break;
        }
        let input = autopilot(session.round(), frame);
        session.frame(&input);
        wait_frame(session.clock());
    }

    if cli.json {
        match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to encode snapshot: {}", e),
        }
        return;
    }

    let round = session.round();
    println!(
        "{} after {:.1}s: score {}, lives {}, shields {}, streak {} (x{})",
        if round.phase == GamePhase::GameOver { "Game over" } else { "Time up" },
        round.elapsed(session.clock().now()),
        round.score,
        round.lives,
        round.shields,
        round.streak,
        round.multiplier()
    );
    if let Some(rank) = session.last_rank() {
        println!("New high score at #{rank}");
    }

    let top = session.top_scores();
    if top.is_empty() {
        println!("No scores yet");
    } else {
        for (i, score) in top.iter().enumerate() {
            println!("{}. {}", i + 1, score);
        }
    }
    if round.phase != GamePhase::GameOver {
        if let Some(rank) = session.leaderboard().potential_rank(round.score) {
            println!("Current score would place #{rank}");
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(variant) = cli.variant {
        settings.variant = variant;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    let mut audio = AudioManager::new();
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    if cli.realtime {
        run(&cli, settings, audio, SystemClock::new(), |_| {
            std::thread::sleep(Duration::from_secs_f64(FRAME_SECS))
        });
    } else {
        run(&cli, settings, audio, ManualClock::new(0.0), |clock| {
            clock.advance(FRAME_SECS)
        });
    }
}
