/// Events emitted by the level controller and the session.
/// The presentation layer (console, indicator, sound) consumes these.

use crate::domain::code::{Encoding, LevelId, MorseSymbol};
use crate::domain::rules::{LevelStats, MAX_LIVES};

/// Indicator signal: remaining lives and whether a level is in play.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Status {
    pub lives: u8,
    pub game_active: bool,
}

impl Status {
    /// Before any level has started.
    pub fn idle() -> Self {
        Status { lives: MAX_LIVES, game_active: false }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: LevelId },
    StatusChanged(Status),
    SymbolShown {
        symbol: MorseSymbol,
        label: String,
        /// Expected pattern, only on levels that show it.
        hint: Option<Encoding>,
    },
    Correct { streak: u8, lives: u8 },
    Incorrect { lives: u8, malformed: Option<char> },
    LevelComplete { level: LevelId, stats: LevelStats },
    GameOver { level: LevelId, stats: LevelStats },
    Victory,
    Cancelled,
    FinalStats(LevelStats),
}
