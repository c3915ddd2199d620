/// Open-addressed hash index over the word vocabulary.
///
/// ## Layout
///   - `entries` holds every `DictionaryEntry` in vocabulary order, so an
///     entry's position is its `WordId`.
///   - `slots` is the probe table. Each slot is empty or holds a position
///     in `entries`.
///
/// Capacity is the next power of two at or above twice the entry count,
/// keeping the load factor at or below 0.5. Keys hash with djb2; collisions
/// resolve by linear probing with wrap-around. Keys compare by value.
///
/// The index is built once and never mutated. There is no removal.

use super::code::{Encoding, MorseSymbol, WordId};
use super::error::MorseError;

const MIN_CAPACITY: usize = 8;

/// A vocabulary word paired with its encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub symbol: MorseSymbol,
    pub word: String,
    pub encoding: Encoding,
}

pub struct LookupIndex {
    slots: Vec<Option<usize>>,
    entries: Vec<DictionaryEntry>,
}

/// djb2: `hash * 33 + byte`, seeded with 5381.
pub fn djb2(key: &str) -> u64 {
    key.bytes()
        .fold(5381u64, |hash, b| hash.wrapping_mul(33).wrapping_add(b as u64))
}

impl LookupIndex {
    /// Insert every entry. A repeated word is a configuration error.
    pub fn build(entries: Vec<DictionaryEntry>) -> Result<Self, MorseError> {
        let capacity = (entries.len() * 2).max(MIN_CAPACITY).next_power_of_two();
        let mut slots: Vec<Option<usize>> = vec![None; capacity];

        for (pos, entry) in entries.iter().enumerate() {
            let mut idx = home_slot(&entry.word, capacity);
            while let Some(existing) = slots[idx] {
                if entries[existing].word == entry.word {
                    return Err(MorseError::Configuration(format!(
                        "word '{}' appears twice in the vocabulary", entry.word
                    )));
                }
                idx = (idx + 1) & (capacity - 1);
            }
            slots[idx] = Some(pos);
        }

        Ok(LookupIndex { slots, entries })
    }

    /// Encoding for `word`, or `None` if it is not in the vocabulary.
    pub fn find(&self, word: &str) -> Option<&Encoding> {
        self.get(word).map(|e| &e.encoding)
    }

    /// Full entry for `word`.
    pub fn get(&self, word: &str) -> Option<&DictionaryEntry> {
        self.probe(word).map(|(pos, _)| &self.entries[pos])
    }

    /// Entry by vocabulary position.
    pub fn entry(&self, id: WordId) -> Option<&DictionaryEntry> {
        self.entries.get(id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.entries.len() as f64 / self.slots.len() as f64
    }

    /// Slots visited to find `word` (1 = found at its home slot).
    pub fn probe_length(&self, word: &str) -> Option<usize> {
        self.probe(word).map(|(_, steps)| steps)
    }

    /// Worst-case probe length over the whole vocabulary.
    pub fn longest_probe(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| self.probe_length(&e.word))
            .max()
            .unwrap_or(0)
    }

    // ── Internal ──

    /// Walk the probe sequence. Stops at the first empty slot or at the
    /// first slot whose key equals `word`.
    fn probe(&self, word: &str) -> Option<(usize, usize)> {
        let capacity = self.slots.len();
        let mut idx = home_slot(word, capacity);
        for steps in 1..=capacity {
            match self.slots[idx] {
                None => return None,
                Some(pos) if self.entries[pos].word == word => return Some((pos, steps)),
                Some(_) => idx = (idx + 1) & (capacity - 1),
            }
        }
        None
    }
}

#[inline]
fn home_slot(word: &str, capacity: usize) -> usize {
    (djb2(word) % capacity as u64) as usize
}
