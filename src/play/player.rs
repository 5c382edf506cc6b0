//! Player identity and per-player state.

use std::{
    collections::BTreeSet,
    ops::{Index, IndexMut},
};

use crate::input::{InputKey, KeyLayout};

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerId {
    /// The left playfield.
    One,
    /// The right playfield.
    Two,
}

impl PlayerId {
    /// Both players in table order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Index into the player table.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// Label used in messages, `J1` or `J2`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::One => "J1",
            Self::Two => "J2",
        }
    }
}

/// A value for each player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerPlayer<T>(pub [T; 2]);

impl<T> PerPlayer<T> {
    /// Builds both values from their player.
    pub fn from_fn(mut f: impl FnMut(PlayerId) -> T) -> Self {
        Self([f(PlayerId::One), f(PlayerId::Two)])
    }

    /// Iterates `(player, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::ALL.into_iter().zip(self.0.iter())
    }

    /// Mutable version of [`Self::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        PlayerId::ALL.into_iter().zip(self.0.iter_mut())
    }
}

impl<T> Index<PlayerId> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        let [one, two] = &self.0;
        match player {
            PlayerId::One => one,
            PlayerId::Two => two,
        }
    }
}

impl<T> IndexMut<PlayerId> for PerPlayer<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        let [one, two] = &mut self.0;
        match player {
            PlayerId::One => one,
            PlayerId::Two => two,
        }
    }
}

/// Score and input state of one player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    id: PlayerId,
    score: u64,
    pressed: BTreeSet<InputKey>,
    armed: Vec<bool>,
    layout: KeyLayout,
    offset_x: f64,
}

impl PlayerState {
    /// Creates a player with a zero score and every lane armed.
    #[must_use]
    pub fn new(id: PlayerId, layout: KeyLayout, offset_x: f64) -> Self {
        Self {
            id,
            score: 0,
            pressed: BTreeSet::new(),
            armed: vec![true; layout.lane_count()],
            layout,
            offset_x,
        }
    }

    /// Zeroes the score, releases every key and arms every lane.
    pub fn reset(&mut self) {
        self.score = 0;
        self.pressed.clear();
        self.armed.fill(true);
    }

    /// Which player this is.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Adds points. The score never decreases.
    pub const fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// The key layout of this player.
    #[must_use]
    pub const fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    /// Left edge of this player's fret area in pixels.
    #[must_use]
    pub const fn offset_x(&self) -> f64 {
        self.offset_x
    }

    /// Keys currently held.
    #[must_use]
    pub const fn pressed(&self) -> &BTreeSet<InputKey> {
        &self.pressed
    }

    /// Whether the key of `lane` is held.
    #[must_use]
    pub fn is_lane_held(&self, lane: usize) -> bool {
        self.layout
            .key_of(lane)
            .is_some_and(|key| self.pressed.contains(&key))
    }

    /// Lanes whose key is held.
    pub fn held_lanes(&self) -> impl Iterator<Item = usize> + '_ {
        self.pressed
            .iter()
            .filter_map(|&key| self.layout.lane_of(key))
    }

    /// Whether a press on `lane` may hit a short note.
    #[must_use]
    pub fn is_armed(&self, lane: usize) -> bool {
        self.armed.get(lane).copied().unwrap_or(false)
    }

    /// Records a key down. Returns the lane of the key if it belongs to this player.
    pub fn press(&mut self, key: InputKey) -> Option<usize> {
        let lane = self.layout.lane_of(key)?;
        self.pressed.insert(key);
        Some(lane)
    }

    /// Records a key up and re-arms its lane. Returns the lane if the key belongs to this player.
    pub fn release(&mut self, key: InputKey) -> Option<usize> {
        let lane = self.layout.lane_of(key)?;
        self.pressed.remove(&key);
        if let Some(armed) = self.armed.get_mut(lane) {
            *armed = true;
        }
        Some(lane)
    }

    /// Blocks further short-note hits on `lane` until its key is released.
    pub fn disarm(&mut self, lane: usize) {
        if let Some(armed) = self.armed.get_mut(lane) {
            *armed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_arming() {
        let mut player = PlayerState::new(PlayerId::One, KeyLayout::player_one(), 0.0);
        assert_eq!(player.press(InputKey::J), None);
        assert_eq!(player.press(InputKey::D), Some(2));
        assert!(player.is_lane_held(2));
        player.disarm(2);
        assert!(!player.is_armed(2));
        assert_eq!(player.release(InputKey::D), Some(2));
        assert!(player.is_armed(2));
        assert!(!player.is_lane_held(2));
    }

    #[test]
    fn reset_clears_everything() {
        let mut player = PlayerState::new(PlayerId::Two, KeyLayout::player_two(), 800.0);
        player.award(42);
        player.press(InputKey::K);
        player.disarm(1);
        player.reset();
        assert_eq!(player.score(), 0);
        assert!(player.pressed().is_empty());
        assert!(player.is_armed(1));
        assert_eq!(player.offset_x(), 800.0);
    }

    #[test]
    fn per_player_indexing() {
        let mut scores = PerPlayer::from_fn(|p| p.index() as u64 * 10);
        scores[PlayerId::Two] += 1;
        assert_eq!(scores.0, [0, 11]);
        let labels: Vec<_> = scores.iter().map(|(p, _)| p.label()).collect();
        assert_eq!(labels, ["J1", "J2"]);
    }
}
