/// Encoding dictionary: the fixed A–Z / 0–9 tables and the word vocabulary.
///
/// Built once at startup and read-only afterwards. Letters and digits are
/// resolved by alphabet position; words go through the `LookupIndex`.
/// Word encodings are derived from the letter table (letters joined by a
/// single gap) rather than stored, so a word can never disagree with its
/// own spelling.

use std::collections::HashMap;

use log::debug;

use super::code::{Encoding, MorseSymbol, Token, WordId};
use super::error::MorseError;
use super::lookup::{DictionaryEntry, LookupIndex};

pub const LETTER_MORSE: [&str; 26] = [
    ".-", "-...", "-.-.", "-..", ".", "..-.", "--.", "....", "..", ".---",
    "-.-", ".-..", "--", "-.", "---", ".--.", "--.-", ".-.", "...", "-",
    "..-", "...-", ".--", "-..-", "-.--", "--..",
];

pub const DIGIT_MORSE: [&str; 10] = [
    "-----", ".----", "..---", "...--", "....-",
    ".....", "-....", "--...", "---..", "----.",
];

/// Vocabulary for the word levels.
pub const WORDS: [&str; 21] = [
    "cave", "copy", "dock", "lick", "run", "owl", "free", "sink", "scold", "hold",
    "smoke", "part", "vex", "able", "bang", "nose", "tan", "van", "sob", "blue",
    "nap",
];

/// Number of symbols drawn on the character levels (A–Z then 0–9).
pub const CHARACTER_COUNT: usize = 36;

pub struct Dictionary {
    letters: Vec<Encoding>,
    digits: Vec<Encoding>,
    index: LookupIndex,
}

impl Dictionary {
    /// Build the dictionary from the built-in tables.
    pub fn new() -> Result<Self, MorseError> {
        Self::from_tables(&LETTER_MORSE, &DIGIT_MORSE, &WORDS)
    }

    /// Build and validate a dictionary from raw tables.
    ///
    /// Fails on a wrong table size, an empty or unparsable encoding, two
    /// characters sharing an encoding, a word that is empty or not plain
    /// ASCII letters, two words spelling the same encoding or an empty
    /// vocabulary.
    pub fn from_tables(letters: &[&str], digits: &[&str], words: &[&str]) -> Result<Self, MorseError> {
        if letters.len() != 26 {
            return Err(MorseError::Configuration(format!(
                "expected 26 letter encodings, found {}", letters.len()
            )));
        }
        if digits.len() != 10 {
            return Err(MorseError::Configuration(format!(
                "expected 10 digit encodings, found {}", digits.len()
            )));
        }

        let labels = ('A'..='Z').chain('0'..='9');
        let mut seen: HashMap<Encoding, char> = HashMap::with_capacity(CHARACTER_COUNT);
        let mut parsed = Vec::with_capacity(CHARACTER_COUNT);

        for (label, text) in labels.zip(letters.iter().chain(digits.iter())) {
            let enc = character_encoding(label, text)?;
            if let Some(other) = seen.insert(enc.clone(), label) {
                return Err(MorseError::Configuration(format!(
                    "'{other}' and '{label}' share the encoding {enc}"
                )));
            }
            parsed.push(enc);
        }

        let digits_parsed = parsed.split_off(26);
        let letters_parsed = parsed;

        let mut entries = Vec::with_capacity(words.len());
        let mut spelled: HashMap<Encoding, &str> = HashMap::with_capacity(words.len());
        for (id, word) in words.iter().enumerate() {
            let encoding = spell(word, &letters_parsed)?;
            if let Some(other) = spelled.insert(encoding.clone(), *word) {
                return Err(MorseError::Configuration(format!(
                    "words '{other}' and '{word}' share the encoding {encoding}"
                )));
            }
            entries.push(DictionaryEntry {
                symbol: MorseSymbol::Word(id),
                word: (*word).to_string(),
                encoding,
            });
        }

        let index = LookupIndex::build(entries)?;
        if index.is_empty() {
            return Err(MorseError::Configuration("word vocabulary is empty".into()));
        }
        debug!(
            "dictionary ready: {} words, index capacity {}, load {:.2}, longest probe {}",
            index.len(),
            index.capacity(),
            index.load_factor(),
            index.longest_probe(),
        );

        Ok(Dictionary {
            letters: letters_parsed,
            digits: digits_parsed,
            index,
        })
    }

    /// Canonical encoding for any symbol in the alphabet or vocabulary.
    pub fn encoding_for(&self, symbol: MorseSymbol) -> Result<&Encoding, MorseError> {
        match symbol {
            MorseSymbol::Letter(c) => self.letter(c).ok_or(MorseError::UnknownSymbol(symbol)),
            MorseSymbol::Digit(c) => self.digit(c).ok_or(MorseError::UnknownSymbol(symbol)),
            MorseSymbol::Word(id) => {
                let word = self.word(id).ok_or(MorseError::UnknownSymbol(symbol))?;
                self.index
                    .find(word)
                    .ok_or_else(|| MorseError::LookupMiss(word.to_string()))
            }
        }
    }

    /// Letter encoding by alphabet position. Case-insensitive.
    pub fn letter(&self, c: char) -> Option<&Encoding> {
        if c.is_ascii_alphabetic() {
            self.letters.get((c.to_ascii_uppercase() as u8 - b'A') as usize)
        } else {
            None
        }
    }

    pub fn digit(&self, c: char) -> Option<&Encoding> {
        c.to_digit(10).and_then(|d| self.digits.get(d as usize))
    }

    /// Text of a vocabulary word.
    pub fn word(&self, id: WordId) -> Option<&str> {
        self.index.entry(id).map(|e| e.word.as_str())
    }

    pub fn word_count(&self) -> usize {
        self.index.len()
    }

    pub fn index(&self) -> &LookupIndex {
        &self.index
    }

    /// Human-readable label: the character itself, or the word text.
    pub fn label(&self, symbol: MorseSymbol) -> String {
        match symbol {
            MorseSymbol::Letter(c) | MorseSymbol::Digit(c) => c.to_string(),
            MorseSymbol::Word(id) => self
                .word(id)
                .map(str::to_string)
                .unwrap_or_else(|| symbol.to_string()),
        }
    }

    /// Every character symbol, letters first.
    pub fn characters() -> impl Iterator<Item = MorseSymbol> {
        ('A'..='Z')
            .map(MorseSymbol::Letter)
            .chain(('0'..='9').map(MorseSymbol::Digit))
    }
}

fn character_encoding(label: char, text: &str) -> Result<Encoding, MorseError> {
    let enc = Encoding::parse(text).map_err(|e| {
        MorseError::Configuration(format!("encoding for '{label}' is invalid: {e}"))
    })?;
    if enc.is_empty() {
        return Err(MorseError::Configuration(format!("encoding for '{label}' is missing")));
    }
    if enc.tokens().contains(&Token::LetterGap) {
        return Err(MorseError::Configuration(format!(
            "encoding for '{label}' spans more than one letter: {enc}"
        )));
    }
    Ok(enc)
}

fn spell(word: &str, letters: &[Encoding]) -> Result<Encoding, MorseError> {
    if word.is_empty() {
        return Err(MorseError::Configuration("vocabulary contains an empty word".into()));
    }
    let mut parts = Vec::with_capacity(word.len());
    for c in word.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(MorseError::Configuration(format!(
                "word '{word}' contains '{c}', only letters are allowed"
            )));
        }
        parts.push(&letters[(c.to_ascii_uppercase() as u8 - b'A') as usize]);
    }
    Ok(Encoding::join_letters(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dict() -> Dictionary {
        Dictionary::new().unwrap()
    }

    #[test]
    fn builtin_tables_build() {
        let d = dict();
        assert_eq!(d.word_count(), 21);
    }

    #[test]
    fn every_character_has_a_unique_encoding() {
        let d = dict();
        let mut seen = HashSet::new();
        for symbol in Dictionary::characters() {
            let enc = d.encoding_for(symbol).unwrap();
            assert!(!enc.is_empty(), "{symbol} has no encoding");
            assert!(seen.insert(enc.clone()), "{symbol} shares {enc}");
        }
        assert_eq!(seen.len(), CHARACTER_COUNT);
    }

    #[test]
    fn known_characters() {
        let d = dict();
        assert_eq!(d.encoding_for(MorseSymbol::Letter('E')).unwrap().to_string(), ".");
        assert_eq!(d.encoding_for(MorseSymbol::Letter('Q')).unwrap().to_string(), "--.-");
        assert_eq!(d.encoding_for(MorseSymbol::Digit('0')).unwrap().to_string(), "-----");
        assert_eq!(d.encoding_for(MorseSymbol::Digit('7')).unwrap().to_string(), "--...");
        assert_eq!(d.letter('e').unwrap().to_string(), ".");
    }

    #[test]
    fn unknown_characters() {
        let d = dict();
        assert!(matches!(
            d.encoding_for(MorseSymbol::Letter('?')),
            Err(MorseError::UnknownSymbol(_))
        ));
        assert!(matches!(
            d.encoding_for(MorseSymbol::Digit('x')),
            Err(MorseError::UnknownSymbol(_))
        ));
        assert!(matches!(
            d.encoding_for(MorseSymbol::Word(99)),
            Err(MorseError::UnknownSymbol(_))
        ));
    }

    #[test]
    fn word_encodings_are_spelled_from_letters() {
        let d = dict();
        let enc = |w: &str| d.index().find(w).unwrap().to_string();
        assert_eq!(enc("cave"), "-.-. .- ...- .");
        // These two ran together in the old hand-typed table.
        assert_eq!(enc("copy"), "-.-. --- .--. -.--");
        assert_eq!(enc("dock"), "-.. --- -.-. -.-");
        assert_eq!(enc("nose"), "-. --- ... .");
        assert_eq!(enc("tan"), "- .- -.");
        // No trailing gap.
        assert_eq!(enc("vex"), "...- . -..-");
        assert_eq!(enc("run"), ".-. ..- -.");
    }

    #[test]
    fn word_encodings_are_unique_and_non_empty() {
        let d = dict();
        let mut seen = HashSet::new();
        for id in 0..d.word_count() {
            let enc = d.encoding_for(MorseSymbol::Word(id)).unwrap();
            assert!(!enc.is_empty());
            assert!(seen.insert(enc.clone()));
            assert_eq!(enc.letter_count(), d.word(id).unwrap().len());
        }
    }

    #[test]
    fn labels() {
        let d = dict();
        assert_eq!(d.label(MorseSymbol::Letter('K')), "K");
        assert_eq!(d.label(MorseSymbol::Word(4)), "run");
    }

    #[test]
    fn rejects_duplicate_character_encoding() {
        let mut letters = LETTER_MORSE;
        letters[1] = ".-"; // B collides with A
        let err = Dictionary::from_tables(&letters, &DIGIT_MORSE, &WORDS).err().unwrap();
        assert!(matches!(err, MorseError::Configuration(_)));
        assert!(err.to_string().contains("'A' and 'B'"));
    }

    #[test]
    fn rejects_missing_or_bad_encoding() {
        let mut letters = LETTER_MORSE;
        letters[4] = "";
        assert!(Dictionary::from_tables(&letters, &DIGIT_MORSE, &WORDS).is_err());

        let mut digits = DIGIT_MORSE;
        digits[3] = "..x";
        assert!(Dictionary::from_tables(&LETTER_MORSE, &digits, &WORDS).is_err());

        let mut letters = LETTER_MORSE;
        letters[0] = ".- -";
        assert!(Dictionary::from_tables(&letters, &DIGIT_MORSE, &WORDS).is_err());
    }

    #[test]
    fn rejects_wrong_table_sizes() {
        assert!(Dictionary::from_tables(&LETTER_MORSE[..25], &DIGIT_MORSE, &WORDS).is_err());
        assert!(Dictionary::from_tables(&LETTER_MORSE, &DIGIT_MORSE[..9], &WORDS).is_err());
    }

    #[test]
    fn rejects_bad_vocabulary() {
        assert!(Dictionary::from_tables(&LETTER_MORSE, &DIGIT_MORSE, &[]).is_err());
        assert!(Dictionary::from_tables(&LETTER_MORSE, &DIGIT_MORSE, &["cave", ""]).is_err());
        assert!(Dictionary::from_tables(&LETTER_MORSE, &DIGIT_MORSE, &["r2d2"]).is_err());
        assert!(Dictionary::from_tables(&LETTER_MORSE, &DIGIT_MORSE, &["owl", "run", "owl"]).is_err());
    }

    #[test]
    fn rejects_duplicate_word_encoding() {
        // Spelling ignores case, so these two collide.
        let err = Dictionary::from_tables(&LETTER_MORSE, &DIGIT_MORSE, &["owl", "OWL"]);
        assert!(matches!(err, Err(MorseError::Configuration(_))));

        let err = Dictionary::from_tables(&LETTER_MORSE, &DIGIT_MORSE, &["cave", "run", "Cave"]);
        assert!(matches!(err, Err(MorseError::Configuration(_))));

        let ok = Dictionary::from_tables(&LETTER_MORSE, &DIGIT_MORSE, &["owl", "run"]);
        assert!(ok.is_ok());
    }
}
