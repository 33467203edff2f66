#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Word Defence headlessly.
//!
//! A simulated typist drives a session frame by frame while the adapter
//! prints the cues a renderer or audio sink would react to.

mod baseline_file;
mod typist;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use word_defence_core::{Event, WORDS_PER_WAVE};
use word_defence_session::{BaselineStore, Cue, MemoryBaseline, Session, SessionConfig};
use word_defence_system_spawning::StaticWordPools;
use word_defence_world::query;

use crate::{baseline_file::FileBaseline, typist::Typist};

const FRAME: Duration = Duration::from_millis(16);

/// Plays Word Defence with a simulated typist and reports what happened.
#[derive(Debug, Parser)]
#[command(name = "word-defence", version, about)]
struct Args {
    /// Seconds of play to simulate before stopping.
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,
    /// Typing rate of the simulated player in words per minute.
    #[arg(long, default_value_t = 45.0)]
    typist_wpm: f64,
    /// Share of the simulated player's keystrokes that hit the intended key.
    #[arg(long, default_value_t = 0.95)]
    accuracy: f64,
    /// Challenge multiplier between 0.8 and 1.2.
    #[arg(long, default_value_t = 1.0)]
    challenge: f64,
    /// Seed for the spawn scheduler, overriding the configuration file.
    #[arg(long)]
    seed: Option<u64>,
    /// Session configuration in TOML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Vocabulary file with one word per line, split into levels automatically.
    #[arg(long)]
    words: Option<PathBuf>,
    /// JSON file holding the baseline typing rate between runs.
    #[arg(long)]
    baseline_file: Option<PathBuf>,
    /// Only print the final summary.
    #[arg(long)]
    quiet: bool,
}

/// Entry point for the Word Defence command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let pools = load_vocabulary(&args)?;

    match args.baseline_file.clone() {
        Some(path) => play(&args, config, pools, FileBaseline::new(path)),
        None => play(&args, config, pools, MemoryBaseline::default()),
    }
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn load_vocabulary(args: &Args) -> Result<StaticWordPools> {
    let Some(path) = &args.words else {
        return Ok(StaticWordPools::builtin());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read vocabulary file {}", path.display()))?;
    log::info!("loaded vocabulary from {}", path.display());
    Ok(StaticWordPools::partitioned(contents.lines()))
}

fn play<B>(args: &Args, config: SessionConfig, pools: StaticWordPools, store: B) -> Result<()>
where
    B: BaselineStore,
{
    let seed = config.seed;
    let mut session = Session::new(config, pools, store)?;
    let mut typist = Typist::new(args.typist_wpm, args.accuracy, seed.rotate_left(17));

    println!("{}", query::welcome_banner(session.world()));
    session.set_challenge(args.challenge);

    let frames = (args.seconds.max(0.0) / FRAME.as_secs_f64()).ceil() as u64;
    for _ in 0..frames {
        session.advance(FRAME);
        for key in typist.keys(session.world(), FRAME) {
            session.key(key);
        }
        let events = session.drain_events();
        if !args.quiet {
            report(session.now().as_millis() as f64 / 1_000.0, &events);
        }
        if session.is_game_over() {
            break;
        }
    }

    let hud = session.hud();
    println!(
        "score {} | level {} wave {} ({}/{}) | {:.0} wpm | {}% accuracy | {} cities | x{:.2}",
        hud.score,
        hud.level,
        hud.wave,
        hud.wave_completed,
        WORDS_PER_WAVE,
        hud.wpm,
        hud.accuracy_percent,
        hud.cities_remaining,
        hud.multiplier,
    );
    println!(
        "{} after {:.1}s, best {:.0} wpm",
        if hud.game_over { "game over" } else { "survived" },
        session.now().as_millis() as f64 / 1_000.0,
        session.best_wpm(),
    );
    Ok(())
}

fn report(seconds: f64, events: &[Event]) {
    for event in events {
        if let Event::CityDestroyed { city } = event {
            println!("[{seconds:>7.2}] city {} destroyed", city.get());
        }
        let Some(cue) = Cue::from_event(event) else {
            continue;
        };
        let tone = cue.tone();
        match cue {
            Cue::LevelUp { level } => println!("[{seconds:>7.2}] level {level}"),
            Cue::WaveUp { wave } => println!("[{seconds:>7.2}] wave {wave}"),
            Cue::WordComplete { score } => println!("[{seconds:>7.2}] +{score}"),
            Cue::GameOver => println!("[{seconds:>7.2}] game over"),
        }
        log::debug!(
            "{:?} tone {:.0}->{:.0} Hz for {:?}",
            tone.waveform,
            tone.start_hz,
            tone.end_hz,
            tone.duration
        );
    }
}
