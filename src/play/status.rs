//! The status line shown in the center panel.

use std::fmt;

use super::player::PerPlayer;

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// Progress or a prompt.
    Info,
    /// Something failed, the game cannot start.
    Error,
    /// The session ended and the scores are final.
    GameOver,
}

/// A status message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusMessage {
    kind: StatusKind,
    text: String,
}

impl StatusMessage {
    /// An informational message.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    /// An error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    /// The final scores of both players.
    #[must_use]
    pub fn game_over(scores: PerPlayer<u64>) -> Self {
        let [one, two] = scores.0;
        Self {
            kind: StatusKind::GameOver,
            text: format!("Game Over! J1: {one} J2: {two}\nPress SPACE to restart"),
        }
    }

    /// How to present the message.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        self.kind
    }

    /// The text, possibly spanning several lines.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_over_lists_both_scores() {
        let status = StatusMessage::game_over(PerPlayer([120, 85]));
        assert_eq!(status.kind(), StatusKind::GameOver);
        assert_eq!(
            status.text(),
            "Game Over! J1: 120 J2: 85\nPress SPACE to restart"
        );
    }
}
