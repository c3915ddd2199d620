/// Error taxonomy for the trainer core.
///
/// Only `Configuration` is fatal at startup. `Malformed` is produced while
/// parsing a candidate and is converted into an incorrect verdict by the
/// verifier; it never aborts a round. `LookupMiss`, `UnknownSymbol` and
/// `UnitMismatch` mean an internal invariant was broken.

use thiserror::Error;

use super::code::{LevelId, MorseSymbol};

#[derive(Debug, Error)]
pub enum MorseError {
    #[error("dictionary configuration error: {0}")]
    Configuration(String),

    #[error("word '{0}' is not in the vocabulary")]
    LookupMiss(String),

    #[error("no encoding for symbol {0}")]
    UnknownSymbol(MorseSymbol),

    #[error("symbol {symbol} cannot be played on {level}")]
    UnitMismatch { level: LevelId, symbol: MorseSymbol },

    #[error("candidate contains '{0}', expected only '.', '-' or spaces")]
    Malformed(char),

    #[error("no such level: {0}")]
    InvalidLevel(u8),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
