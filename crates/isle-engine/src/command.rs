//! Player input parsing.

use isle_core::PlayerId;
use serde::{Deserialize, Serialize};

/// A player's free-text command, tagged with who issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCommand {
    /// Acting player.
    pub player: PlayerId,
    /// The command text, trimmed.
    pub text: String,
}

impl PlayerCommand {
    /// Create a command.
    pub fn new(player: PlayerId, text: impl Into<String>) -> Self {
        Self {
            player,
            text: text.into(),
        }
    }
}

/// What a line of input turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// A command to resolve as a turn.
    Turn(PlayerCommand),
    /// Nothing was typed.
    Blank,
    /// The player wants to stop.
    Quit,
}

/// Parse one line of player input.
pub fn parse_command(player: &PlayerId, input: &str) -> Parsed {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Parsed::Blank
    } else if trimmed.eq_ignore_ascii_case("quit") {
        Parsed::Quit
    } else {
        Parsed::Turn(PlayerCommand::new(player.clone(), trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p1() -> PlayerId {
        PlayerId::new("p1")
    }

    #[test]
    fn blank_and_quit_are_control() {
        assert_eq!(parse_command(&p1(), "   \t"), Parsed::Blank);
        assert_eq!(parse_command(&p1(), " QUIT "), Parsed::Quit);
    }

    #[test]
    fn text_is_trimmed() {
        assert_eq!(
            parse_command(&p1(), "  push the skeleton "),
            Parsed::Turn(PlayerCommand::new(p1(), "push the skeleton"))
        );
    }

    #[test]
    fn quit_inside_sentence_is_a_turn() {
        assert!(matches!(
            parse_command(&p1(), "quit stalling and climb"),
            Parsed::Turn(_)
        ));
    }
}
