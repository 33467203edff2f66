use std::time::Duration;

use word_defence_core::{Event, Level, Timestamp, WordId};
use word_defence_session::{Cue, MemoryBaseline, Session, SessionConfig, EVENT_BACKLOG};
use word_defence_system_spawning::{SpawnTuning, StaticWordPools};
use word_defence_world::query;

const FRAME: Duration = Duration::from_millis(16);

fn pools() -> StaticWordPools {
    StaticWordPools::new().with_level(Level::FIRST, ["cat", "dog", "owl", "sun"])
}

fn config(speed: f32) -> SessionConfig {
    SessionConfig {
        seed: 99,
        transition_delay_ms: None,
        spawn: SpawnTuning {
            base_rate: 2.0,
            max_rate: 2.0,
            base_speed: speed,
            speed_per_level: 0.0,
            speed_variation: 0.0,
            ..SpawnTuning::default()
        },
    }
}

fn text_of(session: &Session<StaticWordPools, MemoryBaseline>, id: WordId) -> Option<String> {
    query::word_view(session.world())
        .iter()
        .find(|word| word.id == id)
        .map(|word| word.text.as_str().to_owned())
}

fn spawned(events: &[Event]) -> Vec<WordId> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::WordSpawned { word } => Some(*word),
            _ => None,
        })
        .collect()
}

#[test]
fn typed_words_complete_and_score() {
    let mut session =
        Session::new(config(0.0), pools(), MemoryBaseline::default()).expect("session");

    let mut events = Vec::new();
    while spawned(&events).is_empty() {
        session.advance(FRAME);
        events.extend(session.drain_events());
    }
    let id = spawned(&events)[0];
    let text = text_of(&session, id).expect("spawned word is on screen");

    session.type_text(&text);
    let events = session.drain_events();

    assert!(events.contains(&Event::WordCompleted { word: id, score: 0 }));
    assert!(query::word_view(session.world()).is_empty());
    assert_eq!(query::completion_log(session.world()).len(), 1);
}

#[test]
fn non_letters_never_reach_the_world() {
    let mut session =
        Session::new(config(0.0), pools(), MemoryBaseline::default()).expect("session");

    for key in ['1', ' ', '\n', 'é', '?'] {
        session.key(key);
    }
    assert!(session.drain_events().is_empty());

    session.key('Q');
    assert_eq!(
        session.drain_events(),
        vec![Event::KeystrokeResolved { correct: false }]
    );
}

#[test]
fn wave_advances_only_after_the_delay() {
    let mut session =
        Session::new(config(0.0), pools(), MemoryBaseline::default()).expect("session");

    let mut scheduled_at = None;
    let mut advanced_at = None;
    for _ in 0..5_000 {
        session.advance(FRAME);
        let mut events = session.drain_events();
        for id in spawned(&events) {
            if let Some(text) = text_of(&session, id) {
                session.type_text(&text);
            }
        }
        events.extend(session.drain_events());

        for event in &events {
            match event {
                Event::AdvanceScheduled { .. } if scheduled_at.is_none() => {
                    scheduled_at = Some(session.now());
                }
                Event::WaveAdvanced { wave } => {
                    assert_eq!(*wave, 2);
                    advanced_at = Some(session.now());
                }
                _ => {}
            }
        }
        if advanced_at.is_some() {
            break;
        }
    }

    let scheduled_at = scheduled_at.expect("tenth word schedules a wave");
    let advanced_at = advanced_at.expect("wave advanced");
    assert!(advanced_at.saturating_since(scheduled_at) >= Duration::from_millis(500));
    assert_eq!(query::wave_progress(session.world()).wave, 2);
}

#[test]
fn faster_final_rate_is_stored_as_the_new_baseline() {
    let mut session =
        Session::new(config(300.0), pools(), MemoryBaseline::with_value(1.0)).expect("session");

    let mut typed = 0;
    let mut cues = Vec::new();
    for _ in 0..2_000 {
        session.advance(FRAME);
        let mut events = session.drain_events();
        if typed < 5 {
            for id in spawned(&events) {
                if let Some(text) = text_of(&session, id) {
                    session.type_text(&text);
                    typed += 1;
                }
            }
            events.extend(session.drain_events());
        }
        cues.extend(events.iter().filter_map(Cue::from_event));
        if session.is_game_over() {
            break;
        }
    }

    assert!(session.is_game_over());
    assert_eq!(cues.last(), Some(&Cue::GameOver));

    let stored = session.store().value().expect("baseline stored");
    assert!(stored > 1.0);
    assert_eq!(session.store().saves(), 1);
    assert_eq!(session.best_wpm(), stored);
    assert_eq!(query::baseline_wpm(session.world()), stored);

    session.key('c');
    assert!(session.drain_events().is_empty(), "keys ignored after game over");

    session.reset();
    assert!(!session.is_game_over());
    assert_eq!(query::alive_cities(session.world()), 6);
    assert_eq!(query::baseline_wpm(session.world()), stored);
    assert!(session.spawning().is_scheduled());
}

#[test]
fn slower_final_rate_keeps_the_stored_baseline() {
    let mut session =
        Session::new(config(300.0), pools(), MemoryBaseline::with_value(80.0)).expect("session");

    for _ in 0..2_000 {
        session.advance(FRAME);
        if session.is_game_over() {
            break;
        }
    }

    assert!(session.is_game_over());
    assert_eq!(session.store().saves(), 0);
    assert_eq!(session.store().value(), Some(80.0));
    assert!(!session.spawning().is_scheduled());
}

#[test]
fn identical_inputs_replay_identically() {
    fn run() -> (Vec<Event>, Timestamp) {
        let mut session = Session::new(
            SessionConfig::default(),
            StaticWordPools::builtin(),
            MemoryBaseline::default(),
        )
        .expect("session");
        let mut log = Vec::new();
        for frame in 0..1_500u32 {
            session.advance(FRAME);
            if frame % 7 == 0 {
                session.key(char::from(b'a' + (frame % 26) as u8));
            }
            log.extend(session.drain_events());
        }
        (log, session.now())
    }

    let (first, first_end) = run();
    let (second, second_end) = run();
    assert!(first.iter().any(|event| matches!(event, Event::WordSpawned { .. })));
    assert_eq!(first, second);
    assert_eq!(first_end, second_end);
}

#[test]
fn clock_keeps_pace_with_fractional_frames() {
    let mut session =
        Session::new(config(0.0), pools(), MemoryBaseline::default()).expect("session");

    let frame = Duration::from_nanos(16_666_667);
    let mut simulated = Duration::ZERO;
    for _ in 0..600 {
        session.advance(frame);
        for event in session.drain_events() {
            if let Event::TimeAdvanced { dt } = event {
                simulated += dt;
            }
        }
    }

    assert_eq!(simulated, frame * 600);
    assert_eq!(session.now(), Timestamp::from_millis(10_000));
    assert_eq!(
        u128::from(session.now().as_millis()),
        simulated.as_millis()
    );
}

#[test]
fn undrained_events_are_bounded() {
    let mut session =
        Session::new(config(0.0), pools(), MemoryBaseline::default()).expect("session");

    for _ in 0..(EVENT_BACKLOG + 500) {
        session.advance(FRAME);
    }

    let events = session.drain_events();
    assert_eq!(events.len(), EVENT_BACKLOG);
    assert_eq!(events.last(), Some(&Event::TimeAdvanced { dt: FRAME }));

    session.advance(FRAME);
    assert_eq!(
        session.drain_events(),
        vec![Event::TimeAdvanced { dt: FRAME }]
    );
}
