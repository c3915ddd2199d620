/// Core quiz vocabulary: tokens, encodings, symbols and levels.
///
/// An `Encoding` is the canonical token sequence for a symbol. Its text
/// form uses the alphabet `{'.', '-', ' '}`, so verification reduces to
/// comparing token vectors.

use std::fmt;
use std::str::FromStr;

use super::alphabet::DIGIT_MORSE;
use super::error::MorseError;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Token {
    Dot,
    Dash,
    /// Separates the letters of a word encoding.
    LetterGap,
}

impl Token {
    pub fn as_char(self) -> char {
        match self {
            Token::Dot => '.',
            Token::Dash => '-',
            Token::LetterGap => ' ',
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Encoding {
    tokens: Vec<Token>,
}

impl Encoding {
    /// Parse candidate text into an encoding.
    ///
    /// Leading and trailing whitespace is dropped and any interior run of
    /// whitespace becomes a single `LetterGap`. Any other character that is
    /// not `.` or `-` is rejected with `MorseError::Malformed`.
    pub fn parse(text: &str) -> Result<Self, MorseError> {
        let mut tokens = Vec::with_capacity(text.len());
        let mut pending_gap = false;

        for ch in text.chars() {
            if ch.is_whitespace() {
                pending_gap = !tokens.is_empty();
                continue;
            }
            let token = match ch {
                '.' => Token::Dot,
                '-' => Token::Dash,
                other => return Err(MorseError::Malformed(other)),
            };
            if pending_gap {
                tokens.push(Token::LetterGap);
                pending_gap = false;
            }
            tokens.push(token);
        }

        Ok(Encoding { tokens })
    }

    /// Join per-letter encodings into a word encoding.
    pub fn join_letters<'a, I>(letters: I) -> Self
    where
        I: IntoIterator<Item = &'a Encoding>,
    {
        let mut tokens = Vec::new();
        for letter in letters {
            if !tokens.is_empty() {
                tokens.push(Token::LetterGap);
            }
            tokens.extend_from_slice(&letter.tokens);
        }
        Encoding { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Number of letters (gap-separated groups).
    pub fn letter_count(&self) -> usize {
        if self.tokens.is_empty() {
            0
        } else {
            1 + self.tokens.iter().filter(|t| **t == Token::LetterGap).count()
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Encoding {
    type Err = MorseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Encoding::parse(s)
    }
}

/// Index into the word vocabulary.
pub type WordId = usize;

/// One quiz unit, fixed for the duration of a round.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MorseSymbol {
    Letter(char),
    Digit(char),
    Word(WordId),
}

impl MorseSymbol {
    pub fn unit(self) -> Unit {
        match self {
            MorseSymbol::Letter(_) | MorseSymbol::Digit(_) => Unit::Character,
            MorseSymbol::Word(_) => Unit::Word,
        }
    }
}

impl fmt::Display for MorseSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MorseSymbol::Letter(c) | MorseSymbol::Digit(c) => write!(f, "'{c}'"),
            MorseSymbol::Word(id) => write!(f, "word #{id}"),
        }
    }
}

/// What a level asks the player to key in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Unit {
    Character,
    Word,
}

/// The four levels, in progression order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum LevelId {
    One,
    Two,
    Three,
    Four,
}

impl LevelId {
    pub const ALL: [LevelId; 4] = [LevelId::One, LevelId::Two, LevelId::Three, LevelId::Four];

    pub fn number(self) -> u8 {
        match self {
            LevelId::One => 1,
            LevelId::Two => 2,
            LevelId::Three => 3,
            LevelId::Four => 4,
        }
    }

    pub fn from_number(n: u8) -> Result<Self, MorseError> {
        match n {
            1 => Ok(LevelId::One),
            2 => Ok(LevelId::Two),
            3 => Ok(LevelId::Three),
            4 => Ok(LevelId::Four),
            other => Err(MorseError::InvalidLevel(other)),
        }
    }

    /// Level selected by keying its digit, e.g. `..---` for level 2.
    pub fn from_morse(encoding: &Encoding) -> Option<Self> {
        let text = encoding.to_string();
        LevelId::ALL
            .into_iter()
            .find(|level| DIGIT_MORSE[level.number() as usize] == text)
    }

    /// Next level, or `None` after the last one.
    pub fn next(self) -> Option<Self> {
        match self {
            LevelId::One => Some(LevelId::Two),
            LevelId::Two => Some(LevelId::Three),
            LevelId::Three => Some(LevelId::Four),
            LevelId::Four => None,
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            LevelId::One | LevelId::Two => Unit::Character,
            LevelId::Three | LevelId::Four => Unit::Word,
        }
    }

    /// Whether the expected pattern is shown alongside the symbol.
    pub fn shows_pattern(self) -> bool {
        matches!(self, LevelId::One | LevelId::Three)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.number())
    }
}
