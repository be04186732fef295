//! Property tests over whole runs

use std::collections::HashSet;

use proptest::prelude::*;

use code_runner::Tuning;
use code_runner::sim::physics::update_invincibility;
use code_runner::sim::{CHAOS_TABLE, GamePhase, GameState, TickInput, Viewport, tick};

fn running(seed: u64) -> GameState {
    let mut state = GameState::new(seed, Viewport::default(), Tuning::default());
    state.reset();
    state
}

fn frame(jump: bool) -> TickInput {
    TickInput {
        jump,
        ..Default::default()
    }
}

fn live_ids(state: &GameState) -> Vec<u32> {
    state
        .bugs
        .iter()
        .map(|b| b.id)
        .chain(state.snippets.iter().map(|s| s.id))
        .chain(state.ducks.iter().map(|d| d.id))
        .collect()
}

proptest! {
    #[test]
    fn player_never_sinks_below_ground(
        seed in any::<u64>(),
        jumps in prop::collection::vec(any::<bool>(), 1..400),
        dt in 0.005f32..0.08,
    ) {
        let mut state = running(seed);
        let ground = state.ground_y();
        for jump in jumps {
            tick(&mut state, &frame(jump), dt);
            prop_assert!(state.player.bottom() <= ground + 1e-3);
            if state.player.grounded {
                prop_assert!((state.player.bottom() - ground).abs() < 1e-3);
            }
            if state.phase != GamePhase::Running {
                break;
            }
        }
    }

    #[test]
    fn best_score_tracks_floor_of_score(
        seed in any::<u64>(),
        jumps in prop::collection::vec(any::<bool>(), 1..600),
    ) {
        let mut state = running(seed);
        for jump in jumps {
            tick(&mut state, &frame(jump), 1.0 / 60.0);
            prop_assert!(state.high.best >= state.score.max(0.0).floor() as u64);
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
    }

    #[test]
    fn invincibility_only_counts_down(
        grant in 0.05f32..6.0,
        steps in prop::collection::vec(0.001f32..0.08, 1..200),
    ) {
        let mut state = running(1);
        state.player.grant_invincibility(grant);
        let mut last = state.player.inv_timer;
        for dt in steps {
            update_invincibility(&mut state, dt);
            prop_assert!(state.player.inv_timer <= last);
            prop_assert!(state.player.inv_timer >= 0.0);
            prop_assert_eq!(state.player.invincible, state.player.inv_timer > 0.0);
            last = state.player.inv_timer;
        }
    }

    #[test]
    fn chaos_selection_follows_thresholds(r in 0.0f32..1.0) {
        let rows = CHAOS_TABLE.rows();
        let expected = rows
            .iter()
            .find(|(bound, _)| r < *bound)
            .map(|(_, kind)| *kind)
            .unwrap_or(rows[rows.len() - 1].1);
        prop_assert_eq!(CHAOS_TABLE.pick(r), expected);
        prop_assert_eq!(CHAOS_TABLE.pick(r), CHAOS_TABLE.pick(r));
    }

    #[test]
    fn removed_entities_never_come_back(
        seed in any::<u64>(),
        frames in 60usize..900,
    ) {
        let mut state = running(seed);
        let input = TickInput { autopilot: true, ..Default::default() };
        let mut seen: HashSet<u32> = HashSet::new();
        let mut gone: HashSet<u32> = HashSet::new();

        for _ in 0..frames {
            tick(&mut state, &input, 1.0 / 60.0);
            let live = live_ids(&state);

            let unique: HashSet<u32> = live.iter().copied().collect();
            prop_assert_eq!(unique.len(), live.len(), "ids are unique");
            for id in &live {
                prop_assert!(!gone.contains(id), "id {} reappeared", id);
            }
            for id in seen.difference(&unique) {
                gone.insert(*id);
            }
            seen = unique;

            if state.phase == GamePhase::GameOver {
                break;
            }
        }
    }

    #[test]
    fn same_seed_same_run(
        seed in any::<u64>(),
        jumps in prop::collection::vec(any::<bool>(), 1..300),
    ) {
        let mut a = running(seed);
        let mut b = running(seed);
        for jump in jumps {
            tick(&mut a, &frame(jump), 1.0 / 60.0);
            tick(&mut b, &frame(jump), 1.0 / 60.0);
        }
        prop_assert_eq!(a.snapshot(), b.snapshot());
        prop_assert_eq!(a.player.pos, b.player.pos);
    }
}
