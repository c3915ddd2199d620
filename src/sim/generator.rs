/// Round generator: picks the next target symbol.
///
/// Character levels draw uniformly from A–Z and 0–9; word levels draw
/// uniformly from the vocabulary. The RNG is seeded once per process so a
/// run can be replayed from its logged seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::alphabet::{Dictionary, CHARACTER_COUNT};
use crate::domain::code::{LevelId, MorseSymbol, Unit};

/// Anything that can choose the next symbol for a level.
pub trait SymbolSource {
    fn next_symbol(&mut self, level: LevelId, dict: &Dictionary) -> MorseSymbol;
}

pub struct RoundGenerator {
    rng: ChaCha8Rng,
    seed: u64,
}

impl RoundGenerator {
    pub fn new(seed: u64) -> Self {
        RoundGenerator {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from OS entropy. The chosen seed is still available via `seed()`.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SymbolSource for RoundGenerator {
    fn next_symbol(&mut self, level: LevelId, dict: &Dictionary) -> MorseSymbol {
        match level.unit() {
            Unit::Character => {
                let i = self.rng.gen_range(0..CHARACTER_COUNT) as u8;
                if i < 26 {
                    MorseSymbol::Letter((b'A' + i) as char)
                } else {
                    MorseSymbol::Digit((b'0' + i - 26) as char)
                }
            }
            // Dictionary construction guarantees a non-empty vocabulary.
            Unit::Word => MorseSymbol::Word(self.rng.gen_range(0..dict.word_count())),
        }
    }
}
