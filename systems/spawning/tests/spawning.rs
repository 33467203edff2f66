use std::time::Duration;

use word_defence_core::{Command, Event, Level, SpawnInputs, Timestamp, WordFootprint};
use word_defence_system_spawning::{Config, SpawnTuning, Spawning, StaticWordPools};
use word_defence_world::{self as world, query, World};

fn pools() -> StaticWordPools {
    StaticWordPools::new()
        .with_level(Level::FIRST, ["cat", "dog", "owl", "moon"])
        .with_level(Level::new(2), ["lemon", "river", "tiger"])
}

fn spawning(seed: u64) -> Spawning {
    Spawning::new(Config::new(SpawnTuning::default(), seed))
}

fn elapsed(millis: u64) -> Vec<Event> {
    vec![Event::TimeAdvanced {
        dt: Duration::from_millis(millis),
    }]
}

fn fresh_inputs() -> SpawnInputs {
    query::spawn_inputs(&World::new(), Timestamp::ZERO)
}

#[test]
fn emits_one_spawn_per_interval() {
    let mut spawning = spawning(0x1234_5678);
    let mut commands = Vec::new();

    // Level one, no typing yet: 0.5 * 0.8 * 1.2 words per second.
    spawning.handle(&elapsed(5_000), &fresh_inputs(), &pools(), &mut commands);

    assert_eq!(commands.len(), 2, "expected one spawn per interval");
    for command in &commands {
        match command {
            Command::SpawnWord { word } => {
                assert_eq!(word.y, 0.0);
                assert!(word.speed >= 50.0 && word.speed <= 90.0);
            }
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn partial_interval_carries_over() {
    let mut spawning = spawning(7);
    let mut commands = Vec::new();

    spawning.handle(&elapsed(1_500), &fresh_inputs(), &pools(), &mut commands);
    assert!(commands.is_empty(), "no spawn before a full interval");

    spawning.handle(&elapsed(700), &fresh_inputs(), &pools(), &mut commands);
    assert_eq!(commands.len(), 1);
}

#[test]
fn full_playfield_skips_cycles() {
    let mut spawning = spawning(3);
    let mut inputs = fresh_inputs();
    inputs.active_words = (0..5)
        .map(|index| WordFootprint {
            x: index as f32 * 150.0,
            letters: 3,
        })
        .collect();

    let mut commands = Vec::new();
    spawning.handle(&elapsed(20_000), &inputs, &pools(), &mut commands);

    assert!(commands.is_empty());
    assert!(spawning.is_scheduled(), "skipped cycles keep the schedule");
}

#[test]
fn burst_counts_its_own_spawns_against_the_cap() {
    let mut spawning = spawning(3);
    let mut inputs = fresh_inputs();
    inputs.active_words = (0..4)
        .map(|index| WordFootprint {
            x: index as f32 * 150.0,
            letters: 3,
        })
        .collect();

    let mut commands = Vec::new();
    spawning.handle(&elapsed(20_000), &inputs, &pools(), &mut commands);

    assert_eq!(commands.len(), 1);
}

#[test]
fn game_over_stops_spawning() {
    let mut spawning = spawning(9);
    let mut commands = Vec::new();
    spawning.handle(&[], &fresh_inputs(), &pools(), &mut commands);
    assert!(spawning.is_scheduled());

    let mut inputs = fresh_inputs();
    inputs.game_over = true;
    let mut events = elapsed(10_000);
    events.push(Event::GameOver);
    spawning.handle(&events, &inputs, &pools(), &mut commands);

    assert!(commands.is_empty());
    assert!(!spawning.is_scheduled());
}

#[test]
fn level_change_restarts_a_single_schedule() {
    let mut spawning = spawning(21);
    let mut commands = Vec::new();
    spawning.handle(&[], &fresh_inputs(), &pools(), &mut commands);
    assert_eq!(spawning.generation(), 1);

    let mut inputs = fresh_inputs();
    inputs.level = Level::new(2);
    spawning.handle(
        &[Event::LevelAdvanced {
            level: Level::new(2),
        }],
        &inputs,
        &pools(),
        &mut commands,
    );
    spawning.handle(&[], &inputs, &pools(), &mut commands);

    assert_eq!(spawning.generation(), 2);
    assert_eq!(spawning.pool().map(|pool| pool.level()), Some(Level::new(2)));

    spawning.handle(&elapsed(10_000), &inputs, &pools(), &mut commands);
    assert!(!commands.is_empty());
    for command in &commands {
        let Command::SpawnWord { word } = command else {
            panic!("unexpected command emitted: {command:?}");
        };
        assert!(["lemon", "river", "tiger"].contains(&word.text.as_str()));
    }
}

#[test]
fn reset_restarts_the_schedule() {
    let mut spawning = spawning(21);
    let mut commands = Vec::new();
    spawning.handle(&elapsed(1_000), &fresh_inputs(), &pools(), &mut commands);
    spawning.handle(&[Event::GameReset], &fresh_inputs(), &pools(), &mut commands);

    assert_eq!(spawning.generation(), 2);

    // The restarted schedule waits a whole interval again.
    spawning.handle(&elapsed(1_500), &fresh_inputs(), &pools(), &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn empty_or_missing_pools_spawn_nothing() {
    let empty = StaticWordPools::new().with_level(Level::FIRST, ["a", "b"]);
    let mut spawning = spawning(5);
    let mut commands = Vec::new();
    spawning.handle(&elapsed(30_000), &fresh_inputs(), &empty, &mut commands);
    assert!(commands.is_empty());

    let missing = StaticWordPools::new();
    let mut spawning = self::spawning(5);
    spawning.handle(&elapsed(30_000), &fresh_inputs(), &missing, &mut commands);
    assert!(commands.is_empty());
}

#[test]
fn spawned_words_fit_inside_the_playfield() {
    let mut world = World::new();
    let mut spawning = spawning(0xfeed);
    let pools = pools();

    for step in 0..40u64 {
        let now = Timestamp::from_millis(step * 500);
        let inputs = query::spawn_inputs(&world, now);
        let mut commands = Vec::new();
        spawning.handle(&elapsed(500), &inputs, &pools, &mut commands);
        for command in commands {
            let mut events = Vec::new();
            world::apply(&mut world, command, &mut events);
        }
    }

    let words = query::word_view(&world);
    assert!(!words.is_empty());
    assert!(words.len() <= 5);
    for word in words.iter() {
        let width = word.text.len() as f32 * 12.0;
        assert!(word.x >= 0.0 && word.x + width <= 800.0, "{word:?}");
    }
}

#[test]
fn identical_seeds_replay_identically() {
    fn run(seed: u64) -> Vec<Command> {
        let mut spawning = spawning(seed);
        let pools = StaticWordPools::builtin();
        let mut inputs = fresh_inputs();
        let mut all = Vec::new();
        for _ in 0..30 {
            let mut commands = Vec::new();
            spawning.handle(&elapsed(750), &inputs, &pools, &mut commands);
            for command in &commands {
                if let Command::SpawnWord { word } = command {
                    inputs.active_words.push(WordFootprint {
                        x: word.x,
                        letters: word.text.len(),
                    });
                }
            }
            if inputs.active_words.len() > 3 {
                let _ = inputs.active_words.remove(0);
            }
            all.extend(commands);
        }
        all
    }

    let first = run(0x5eed);
    assert!(!first.is_empty());
    assert_eq!(first, run(0x5eed));
    assert_ne!(first, run(0x5eed + 1));
}
