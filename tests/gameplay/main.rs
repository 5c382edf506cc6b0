//! Gameplay scenarios driven through the session DSL.
//!
//! At 120 BPM and resolution 192, 384 ticks are one second.

#[path = "../common/mod.rs"]
mod common;
mod dsl;

use pretty_assertions::assert_eq;
use riff_hero::{
    config::GameConfig,
    input::InputKey,
    play::{
        note::{NoteState, SustainState},
        player::PlayerId,
        session::Feedback,
    },
};
use strict_num_extended::PositiveF64;

use common::{chart_source, timeline};
use dsl::SessionDriver;

const TICK: f64 = 1.0 / 64.0;

fn slow_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.timing.fall_speed = PositiveF64::new_const(100.0);
    config
}

fn score(player: PlayerId, expected: u64) -> impl Fn(&dsl::TestSession) {
    move |session| assert_eq!(session.player(player).score(), expected)
}

fn sustain_of_one(expected: SustainState) -> impl Fn(&dsl::TestSession) {
    move |session| {
        assert_eq!(
            session.notes(PlayerId::One)[0].sustain_state(),
            Some(expected)
        );
    }
}

mod hit_window {
    use pretty_assertions::assert_eq;

    use super::*;

    // A note at 2.0 s. At 100 px/s the hit zone does not limit presses within 200 ms.
    fn driver() -> SessionDriver {
        SessionDriver::new(slow_config(), &timeline(&chart_source(&[(768, 0, 0)])))
    }

    #[test]
    fn early_edge_hits() {
        driver()
            .at(1.8)
            .at(1.800001)
            .press(InputKey::A)
            .view(score(PlayerId::One, 10))
            .feedback(|feedback| {
                assert_eq!(
                    feedback,
                    [Feedback::Hit {
                        player: PlayerId::One,
                        lane: 0,
                        sustain: false
                    }]
                );
            })
            .run();
    }

    #[test]
    fn too_early_misses() {
        driver()
            .at(1.7)
            .at(1.799999)
            .press(InputKey::A)
            .view(score(PlayerId::One, 0))
            .quiet()
            .run();
    }

    #[test]
    fn late_edge_hits() {
        driver()
            .at(2.1)
            .at(2.199999)
            .press(InputKey::A)
            .view(score(PlayerId::One, 10))
            .run();
    }

    #[test]
    fn too_late_misses() {
        driver()
            .at(2.1)
            .at(2.200001)
            .press(InputKey::A)
            .view(score(PlayerId::One, 0))
            .run();
    }
}

#[test]
fn hit_zone_gates_early_presses() {
    // 200 px above the hit zone at 800 px/s is well outside its reach.
    SessionDriver::new(GameConfig::default(), &timeline(&chart_source(&[(384, 0, 0)])))
        .at(0.81)
        .at(0.81)
        .press(InputKey::A)
        .view(score(PlayerId::One, 0))
        .at(0.95)
        .at(0.95)
        .release(InputKey::A)
        .press(InputKey::A)
        .view(score(PlayerId::One, 10))
        .view(|session| {
            assert_eq!(session.notes(PlayerId::One)[0].state(), NoteState::Hit);
            assert_eq!(session.notes(PlayerId::Two)[0].state(), NoteState::OnScreen);
        })
        .run();
}

#[test]
fn missed_note_reported_once() {
    SessionDriver::new(GameConfig::default(), &timeline(&chart_source(&[(384, 2, 0)])))
        .at(0.9)
        .quiet()
        .at(1.125)
        .feedback(|feedback| {
            assert_eq!(
                feedback,
                [
                    Feedback::Miss {
                        player: PlayerId::One,
                        lane: 2
                    },
                    Feedback::Miss {
                        player: PlayerId::Two,
                        lane: 2
                    },
                ]
            );
        })
        .at(1.5)
        .quiet()
        .at(2.0)
        .quiet()
        .view(|session| {
            let note = &session.notes(PlayerId::One)[0];
            assert_eq!(note.state(), NoteState::Missed);
            assert!(!note.is_on_screen());
            assert!(!session.has_unresolved_on_screen());
        })
        .run();
}

#[test]
fn players_score_independently() {
    SessionDriver::new(
        GameConfig::default(),
        &timeline(&chart_source(&[(384, 0, 0), (384, 1, 0)])),
    )
    .at(1.0)
    .at(1.0)
    .press(InputKey::A)
    .press(InputKey::K)
    .view(score(PlayerId::One, 10))
    .view(score(PlayerId::Two, 10))
    .view(|session| {
        let lanes = |player| {
            session
                .notes(player)
                .iter()
                .map(|note| (note.lane(), note.is_hit()))
                .collect::<Vec<_>>()
        };
        assert_eq!(lanes(PlayerId::One), vec![(0, true), (1, false)]);
        assert_eq!(lanes(PlayerId::Two), vec![(0, false), (1, true)]);
    })
    .run();
}

#[test]
fn held_key_does_not_hit_again() {
    // 1.0 s and 1.125 s on the same lane.
    SessionDriver::new(
        GameConfig::default(),
        &timeline(&chart_source(&[(384, 0, 0), (432, 0, 0)])),
    )
    .at(1.0)
    .at(1.0)
    .press(InputKey::A)
    .view(score(PlayerId::One, 10))
    .at(1.125)
    .at(1.126)
    .press(InputKey::A)
    .view(score(PlayerId::One, 10))
    .at(1.127)
    .release(InputKey::A)
    .press(InputKey::A)
    .view(score(PlayerId::One, 20))
    .run();
}

mod sustain {
    use pretty_assertions::assert_eq;

    use super::*;

    // A sustain from 0.5 s to 1.0 s on lane 0, ticked every 1/64 s.
    fn driver() -> SessionDriver {
        SessionDriver::new(
            GameConfig::default(),
            &timeline(&chart_source(&[(192, 0, 192)])),
        )
    }

    #[test]
    fn held_to_the_end() {
        driver()
            .at(0.5)
            .view(score(PlayerId::One, 0))
            .at(33.0 * TICK)
            .press(InputKey::A)
            .feedback(|feedback| {
                assert_eq!(
                    feedback,
                    [Feedback::Hit {
                        player: PlayerId::One,
                        lane: 0,
                        sustain: true
                    }]
                );
            })
            .view(score(PlayerId::One, 6))
            .view(sustain_of_one(SustainState::Active))
            .view(|session| assert_eq!(session.particles().len(), 10))
            .sweep(1.0, TICK)
            .view(score(PlayerId::One, 37))
            .past(TICK)
            .feedback(|feedback| {
                assert_eq!(
                    feedback,
                    [Feedback::SustainComplete {
                        player: PlayerId::One,
                        lane: 0
                    }]
                );
            })
            .view(score(PlayerId::One, 57))
            .view(sustain_of_one(SustainState::Complete))
            .past(TICK)
            .quiet()
            .view(score(PlayerId::One, 57))
            .run();
    }

    #[test]
    fn release_and_resume() {
        driver()
            .at(0.5)
            .at(33.0 * TICK)
            .press(InputKey::A)
            .sweep(40.0 * TICK, TICK)
            .view(score(PlayerId::One, 13))
            .past(TICK)
            .release(InputKey::A)
            .view(score(PlayerId::One, 13))
            .view(sustain_of_one(SustainState::Held))
            .past(TICK)
            .press(InputKey::A)
            .quiet()
            .view(score(PlayerId::One, 14))
            .view(sustain_of_one(SustainState::Active))
            .sweep(1.0, TICK)
            .view(score(PlayerId::One, 36))
            .past(TICK)
            .view(score(PlayerId::One, 56))
            .run();
    }

    #[test]
    fn dropped_sustain_misses_when_it_leaves() {
        driver()
            .at(0.5)
            .at(33.0 * TICK)
            .press(InputKey::A)
            .sweep(49.0 * TICK, TICK)
            .past(TICK)
            .release(InputKey::A)
            .sweep(1.0, TICK)
            .view(score(PlayerId::One, 22))
            .past(TICK)
            .quiet()
            .view(score(PlayerId::One, 22))
            .view(sustain_of_one(SustainState::Held))
            .at(1.2)
            .feedback(|feedback| {
                assert_eq!(
                    feedback,
                    [
                        Feedback::Miss {
                            player: PlayerId::One,
                            lane: 0
                        },
                        Feedback::Miss {
                            player: PlayerId::Two,
                            lane: 0
                        },
                    ]
                );
            })
            .view(sustain_of_one(SustainState::MissedIncomplete))
            .at(1.3)
            .quiet()
            .run();
    }
}
