use std::sync::Arc;

use neon_dash::sim::*;
use neon_dash::{Settings, ThemeParameters};
use proptest::prelude::*;

/// Active run whose spawn roll always skips
fn run_without_spawns() -> GameState<ScriptedRandom> {
    let mut state = GameState::with_random(
        Settings::default(),
        ScriptedRandom::constant(0.0),
        ScriptedRandom::constant(0.5),
    );
    assert!(state.start_run(Arc::new(ThemeParameters::default())));
    state
}

fn idle() -> TickInput {
    TickInput::default()
}

#[test]
fn test_fresh_run() {
    let mut state = run_without_spawns();

    // 1280x720 world: ground at 620, player x at 10% of the width
    assert_eq!(state.player.body, Rect::new(128.0, 580.0, 40.0, 40.0));
    assert!(!state.player.airborne);
    assert_eq!(state.player.vertical_velocity, 0.0);
    assert_eq!(state.display_score(), 0);
    assert!(state.obstacles.is_empty());

    let events = state.drain_events();
    assert_eq!(
        events,
        vec![
            GameEvent::RunStarted {
                theme: "Neon City".to_string()
            },
            GameEvent::ScoreChanged { score: 0 },
        ]
    );
}

#[test]
fn test_first_difficulty_step() {
    let mut state = run_without_spawns();
    for _ in 0..600 {
        tick(&mut state, &idle());
    }

    assert_eq!(state.phase, GamePhase::Active);
    assert_eq!(state.run.frame_count, 600);
    assert_eq!(state.run.raw_score, 600);
    assert_eq!(state.display_score(), 60);
    assert!((state.run.speed_multiplier - 1.1).abs() < 1e-6);
    assert!(state.obstacles.is_empty());

    let last_score = state
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::ScoreChanged { score } => Some(score),
            _ => None,
        })
        .last();
    assert_eq!(last_score, Some(60));
}

#[test]
fn test_collision_freezes_score() {
    let mut state = run_without_spawns();
    for _ in 0..50 {
        tick(&mut state, &idle());
    }
    state.drain_events();

    // Lands exactly on the player after one frame of scrolling
    let p = state.player.body;
    state.obstacles.push(Obstacle {
        id: 77,
        body: Rect::new(p.x + 4.0, p.bottom() - 60.0, 40.0, 60.0),
        scroll_speed: 4.0,
        color: "#f472b6".to_string(),
        passed: false,
    });

    tick(&mut state, &idle());
    assert_eq!(state.phase, GamePhase::Ended);
    assert_eq!(state.run.raw_score, state.run.frame_count);
    assert_eq!(state.display_score(), 5);
    assert_eq!(
        state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { score: 5 }))
            .count(),
        1
    );

    // Nothing moves after the crash
    let frozen = state.snapshot();
    for _ in 0..30 {
        tick(
            &mut state,
            &TickInput {
                jump: true,
                autopilot: true,
            },
        );
    }
    assert_eq!(state.display_score(), 5);
    assert_eq!(state.run.frame_count, frozen.frame_count);
    assert_eq!(state.player, frozen.player);
    assert_eq!(state.obstacles, frozen.obstacles);
    assert!(state.drain_events().is_empty());
}

#[test]
fn test_double_jump_ignored() {
    let mut state = run_without_spawns();
    let jump = TickInput {
        jump: true,
        ..Default::default()
    };

    tick(&mut state, &jump);
    assert!(state.player.airborne);

    // One frame of gravity applied on the jump tick: -15 + 0.6
    let v = state.player.vertical_velocity;
    assert!((v - -14.4).abs() < 1e-5);

    // A second press in the air is discarded; only gravity acts
    tick(&mut state, &jump);
    assert!(state.player.airborne);
    assert!((state.player.vertical_velocity - (v + 0.6)).abs() < 1e-5);

    let jumps = state
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::Jumped))
        .count();
    assert_eq!(jumps, 1);
}

#[test]
fn test_restart_after_game_over() {
    let mut state = run_without_spawns();
    tick(&mut state, &idle());
    let p = state.player.body;
    state.obstacles.push(Obstacle {
        id: 1,
        body: Rect::new(p.x, p.y, p.width, p.height),
        scroll_speed: 0.0,
        color: "#f472b6".to_string(),
        passed: false,
    });
    tick(&mut state, &idle());
    assert_eq!(state.phase, GamePhase::Ended);

    assert!(state.start_run(Arc::new(ThemeParameters::fallback())));
    assert_eq!(state.phase, GamePhase::Active);
    assert_eq!(state.run.frame_count, 0);
    assert!(state.obstacles.is_empty());
    assert_eq!(state.final_score, None);
    assert_eq!(state.theme().name, "Fallback Zone");
}

#[test]
fn test_same_seed_same_run() {
    let play = |seed: u64| {
        let mut state = GameState::new(seed);
        state.start_run(Arc::new(ThemeParameters::default()));
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..900 {
            tick(&mut state, &input);
        }
        state.snapshot()
    };

    let a = play(7);
    let b = play(7);
    assert_eq!(a.frame_count, b.frame_count);
    assert_eq!(a.score, b.score);
    assert_eq!(a.player, b.player);
    assert_eq!(a.obstacles, b.obstacles);
}

proptest! {
    // Whatever the input pattern, the player never sinks below the ground
    #[test]
    fn prop_player_stays_above_ground(
        seed in any::<u64>(),
        presses in prop::collection::vec(any::<bool>(), 1..400),
    ) {
        let mut state = GameState::new(seed);
        state.start_run(Arc::new(ThemeParameters::default()));
        let ground = state.run.ground_y;

        for jump in presses {
            tick(&mut state, &TickInput { jump, autopilot: false });
            prop_assert!(state.player.body.bottom() <= ground + 1e-3);
            if !state.player.airborne {
                prop_assert_eq!(state.player.vertical_velocity, 0.0);
            }
            if state.phase != GamePhase::Active {
                break;
            }
        }
    }
}
