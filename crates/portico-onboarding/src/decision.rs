//! Routing results.

use std::fmt;

/// The screen the presentation layer should show next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryScreen {
    /// Nobody is signed in.
    Landing,
    /// Signed in, but there is no character yet (or we couldn't tell).
    CreateCharacter,
    /// Signed in with a character: straight into the game.
    Game,
}

impl EntryScreen {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::CreateCharacter => "create_character",
            Self::Game => "game",
        }
    }
}

impl fmt::Display for EntryScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a screen was chosen. Several reasons lead to the same screen; the
/// reason keeps them apart in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnboardingReason {
    /// No session.
    Anonymous,
    /// Player status says the character exists.
    CharacterReady,
    /// Player status says the character doesn't exist yet.
    NoCharacter,
    /// The account has no player record yet (a brand-new account).
    NoPlayerRecord,
    /// Player status couldn't be fetched.
    StatusUnavailable,
}

/// Identifies one call to `resolve_entry_screen`. Later calls get larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// A published routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub screen: EntryScreen,
    pub reason: OnboardingReason,
    /// The request that produced this decision.
    pub request: RequestId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_screen_display_is_snake_case() {
        assert_eq!(EntryScreen::Landing.to_string(), "landing");
        assert_eq!(EntryScreen::CreateCharacter.to_string(), "create_character");
        assert_eq!(EntryScreen::Game.to_string(), "game");
    }

    #[test]
    fn test_request_ids_order_by_issue() {
        assert!(RequestId(2) > RequestId(1));
        assert_eq!(RequestId(3).to_string(), "R-3");
    }
}
