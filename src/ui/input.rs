/// Token entry: turns key presses and gamepad buttons into a candidate line.
///
/// The terminal runs in raw mode, so entry is assembled here one key at a
/// time and echoed on the prompt line. Keyboard mapping:
///   `.` / `-`        →  dot / dash
///   Space            →  letter gap
///   Backspace        →  erase last token
///   Enter            →  submit
///   Esc / Ctrl+C     →  cancel
///
/// Digit keys are only accepted by the level menu.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use log::debug;

use crate::domain::code::{Encoding, LevelId};
use crate::domain::error::MorseError;
use crate::sim::level::RoundInput;
use crate::sim::session::InputSource;
use crate::ui::gamepad::GamepadState;

/// How long to wait for a key before checking the gamepad.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntryAction {
    /// Append a character: `.`, `-`, ` ` or a digit.
    Push(char),
    Erase,
    Submit,
    Cancel,
}

/// Keyboard mapping. Release events and unmapped keys give `None`.
pub fn key_action(key: &KeyEvent) -> Option<EntryAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(EntryAction::Cancel),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char(c @ ('.' | '-' | ' ')) => Some(EntryAction::Push(c)),
        KeyCode::Char(c) if c.is_ascii_digit() => Some(EntryAction::Push(c)),
        KeyCode::Backspace => Some(EntryAction::Erase),
        KeyCode::Enter => Some(EntryAction::Submit),
        KeyCode::Esc => Some(EntryAction::Cancel),
        _ => None,
    }
}

/// Level menu choice: a plain digit `1`–`4` or its Morse encoding.
pub fn parse_level_choice(text: &str) -> Option<LevelId> {
    let text = text.trim();
    if let Ok(n) = text.parse::<u8>() {
        return LevelId::from_number(n).ok();
    }
    Encoding::parse(text).ok().and_then(|enc| LevelId::from_morse(&enc))
}

fn is_token_char(c: char) -> bool {
    matches!(c, '.' | '-' | ' ')
}

fn is_menu_char(c: char) -> bool {
    is_token_char(c) || c.is_ascii_digit()
}

/// Line being typed for the current prompt. Dropped after each submit.
#[derive(Debug, Default)]
pub struct TokenBuffer {
    text: String,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `c`. Leading and doubled gaps are not recorded.
    pub fn push(&mut self, c: char) {
        if c == ' ' && (self.text.is_empty() || self.text.ends_with(' ')) {
            return;
        }
        self.text.push(c);
    }

    pub fn erase(&mut self) {
        self.text.pop();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

pub struct TokenEntry {
    out: io::Stdout,
    gamepad: GamepadState,
}

impl TokenEntry {
    pub fn new(gamepad: GamepadState) -> Self {
        TokenEntry { out: io::stdout(), gamepad }
    }

    /// Read one line of entry. `None` on cancel.
    fn read_line(&mut self, accept: fn(char) -> bool) -> Result<Option<String>, MorseError> {
        let mut buffer = TokenBuffer::new();
        self.echo(&buffer)?;
        loop {
            let Some(action) = self.next_action()? else {
                continue;
            };
            match action {
                EntryAction::Push(c) if accept(c) => buffer.push(c),
                EntryAction::Push(_) => continue,
                EntryAction::Erase => buffer.erase(),
                EntryAction::Submit => {
                    queue!(self.out, Print("\r\n"))?;
                    self.out.flush()?;
                    return Ok(Some(buffer.take()));
                }
                EntryAction::Cancel => {
                    queue!(self.out, Print("\r\n"))?;
                    self.out.flush()?;
                    debug!("entry cancelled");
                    return Ok(None);
                }
            }
            self.echo(&buffer)?;
        }
    }

    /// Read the level menu answer. `Ok(None)` on cancel; `Ok(Some(None))`
    /// when the answer names no level.
    pub fn read_level(&mut self) -> Result<Option<Option<LevelId>>, MorseError> {
        Ok(self.read_line(is_menu_char)?.map(|text| parse_level_choice(&text)))
    }

    /// Block until a key press or gamepad button maps to an action,
    /// or one poll interval passes.
    fn next_action(&mut self) -> Result<Option<EntryAction>, MorseError> {
        if poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                return Ok(key_action(&key));
            }
            return Ok(None);
        }
        Ok(self.gamepad.poll_action())
    }

    fn echo(&mut self, buffer: &TokenBuffer) -> io::Result<()> {
        queue!(
            self.out,
            Print("\r"),
            Clear(ClearType::CurrentLine),
            Print("> "),
            Print(buffer.as_str())
        )?;
        self.out.flush()
    }
}

impl InputSource for TokenEntry {
    fn read_candidate(&mut self) -> Result<RoundInput, MorseError> {
        Ok(match self.read_line(is_token_char)? {
            Some(text) => RoundInput::Candidate(text),
            None => RoundInput::Cancel,
        })
    }
}
