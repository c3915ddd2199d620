/// Answer verification.
///
/// Pure functions over the read-only `Dictionary`. The level decides which
/// table answers: character levels index the A–Z / 0–9 tables directly,
/// word levels resolve through the lookup index. Each branch returns on
/// its own; there is no fall-through between levels.
///
/// A symbol that does not belong to the level's unit, or a word the index
/// cannot find, is an internal invariant failure and comes back as `Err`.

use super::alphabet::Dictionary;
use super::code::{Encoding, LevelId, MorseSymbol, Unit};
use super::error::MorseError;

/// Result of checking one raw candidate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Candidate contained a character outside `.`, `-` and whitespace.
    Malformed(char),
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

/// The encoding a player must key for `symbol` on `level`.
pub fn expected<'d>(
    dict: &'d Dictionary,
    level: LevelId,
    symbol: MorseSymbol,
) -> Result<&'d Encoding, MorseError> {
    match (level.unit(), symbol) {
        (Unit::Character, MorseSymbol::Letter(_) | MorseSymbol::Digit(_)) => dict.encoding_for(symbol),
        (Unit::Word, MorseSymbol::Word(id)) => {
            let word = dict.word(id).ok_or(MorseError::UnknownSymbol(symbol))?;
            dict.index()
                .find(word)
                .ok_or_else(|| MorseError::LookupMiss(word.to_string()))
        }
        _ => Err(MorseError::UnitMismatch { level, symbol }),
    }
}

/// Exact token-sequence match. No partial credit.
pub fn verify(
    dict: &Dictionary,
    level: LevelId,
    symbol: MorseSymbol,
    candidate: &Encoding,
) -> Result<bool, MorseError> {
    Ok(expected(dict, level, symbol)? == candidate)
}

/// Parse and verify raw candidate text.
///
/// Surrounding whitespace is ignored. Foreign characters give
/// `Verdict::Malformed`, which counts as a wrong answer.
pub fn check(
    dict: &Dictionary,
    level: LevelId,
    symbol: MorseSymbol,
    raw: &str,
) -> Result<Verdict, MorseError> {
    let target = expected(dict, level, symbol)?;
    match Encoding::parse(raw) {
        Ok(candidate) if &candidate == target => Ok(Verdict::Correct),
        Ok(_) => Ok(Verdict::Incorrect),
        Err(MorseError::Malformed(ch)) => Ok(Verdict::Malformed(ch)),
        Err(e) => Err(e),
    }
}
