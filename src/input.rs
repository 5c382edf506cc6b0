//! Keyboard input of both players.

use std::fmt;

/// A key the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputKey {
    /// Player one, lane 0.
    A,
    /// Player one, lane 1.
    S,
    /// Player one, lane 2.
    D,
    /// Player one, lane 3.
    F,
    /// Player one, lane 4.
    G,
    /// Player two, lane 0.
    J,
    /// Player two, lane 1.
    K,
    /// Player two, lane 2.
    L,
    /// Player two, lane 3.
    Semicolon,
    /// Player two, lane 4.
    Apostrophe,
    /// Starts or restarts the session.
    Space,
}

impl InputKey {
    /// Every key, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::A,
        Self::S,
        Self::D,
        Self::F,
        Self::G,
        Self::J,
        Self::K,
        Self::L,
        Self::Semicolon,
        Self::Apostrophe,
        Self::Space,
    ];
}

impl fmt::Display for InputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::A => "A",
            Self::S => "S",
            Self::D => "D",
            Self::F => "F",
            Self::G => "G",
            Self::J => "J",
            Self::K => "K",
            Self::L => "L",
            Self::Semicolon => ";",
            Self::Apostrophe => "'",
            Self::Space => "Space",
        };
        f.write_str(label)
    }
}

/// The keys of one player, indexed by lane.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyLayout {
    keys: Vec<InputKey>,
}

impl KeyLayout {
    /// Creates a layout where `keys[lane]` plays `lane`.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = InputKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// `A S D F G`
    #[must_use]
    pub fn player_one() -> Self {
        Self::new([InputKey::A, InputKey::S, InputKey::D, InputKey::F, InputKey::G])
    }

    /// `J K L ; '`
    #[must_use]
    pub fn player_two() -> Self {
        Self::new([
            InputKey::J,
            InputKey::K,
            InputKey::L,
            InputKey::Semicolon,
            InputKey::Apostrophe,
        ])
    }

    /// The lane `key` plays, if it belongs to this layout.
    #[must_use]
    pub fn lane_of(&self, key: InputKey) -> Option<usize> {
        self.keys.iter().position(|&k| k == key)
    }

    /// The key of `lane`.
    #[must_use]
    pub fn key_of(&self, lane: usize) -> Option<InputKey> {
        self.keys.get(lane).copied()
    }

    /// Number of lanes this layout covers.
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.keys.len()
    }

    /// Keys in lane order.
    pub fn keys(&self) -> impl Iterator<Item = InputKey> + '_ {
        self.keys.iter().copied()
    }
}
