/// Presentation layer: line-oriented terminal console.
///
/// The quiz is a scrolling transcript rather than a redrawn screen, so the
/// console only needs raw mode (for key-at-a-time entry) and coloured lines.
/// Raw mode does not translate `\n`, so every line ends in `\r\n`.
///
/// Event text is built by pure functions (`describe`, `chart_lines`) so it
/// can be checked without a terminal.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};

use crate::domain::alphabet::{Dictionary, DIGIT_MORSE};
use crate::domain::code::{LevelId, MorseSymbol, Unit};
use crate::domain::rules::{LevelStats, MAX_LIVES, STREAK_TO_ADVANCE};
use crate::sim::event::{GameEvent, Status};
use crate::ui::indicator::Lamp;

const RULE: &str = "──────────────────────────────────────────────────────────────";

const TITLE: Color = Color::Rgb { r: 255, g: 220, b: 50 };
const GOOD: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const BAD: Color = Color::Rgb { r: 255, g: 60, b: 60 };
const DIM: Color = Color::Rgb { r: 140, g: 140, b: 160 };
const KEY: Color = Color::Rgb { r: 100, g: 200, b: 255 };

/// One line of output with an optional colour.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub text: String,
    pub colour: Option<Color>,
}

impl Line {
    fn plain(text: impl Into<String>) -> Self {
        Line { text: text.into(), colour: None }
    }

    fn coloured(text: impl Into<String>, colour: Color) -> Self {
        Line { text: text.into(), colour: Some(colour) }
    }
}

// ── Pure text builders ──

pub fn welcome_lines() -> Vec<Line> {
    let art = [
        "#       #   # # #   # # #     # # #   # # # #",
        "# #   # #  #     #  #     #  #        #      ",
        "#   #   #  #     #  # # #     # # #   # # # #",
        "#       #  #     #  #   #           # #      ",
        "#       #   # # #   #     #   # # #   # # # #",
    ];
    let mut out = vec![Line::coloured(RULE, DIM)];
    out.extend(art.iter().map(|l| Line::coloured(*l, TITLE)));
    out.push(Line::plain("Morse code trainer: four levels, three lives, five in a row to advance."));
    out.push(Line::coloured(RULE, DIM));
    out
}

pub fn menu_lines() -> Vec<Line> {
    let mut out = vec![Line::plain("Please choose a level using the corresponding Morse code (or its digit):")];
    for level in LevelId::ALL {
        out.push(Line::coloured(
            format!(
                "{} ( {} ) : {}",
                level,
                DIGIT_MORSE[level.number() as usize],
                level_blurb(level)
            ),
            KEY,
        ));
    }
    out.push(Line::coloured("Keys: . dot  - dash  Space gap  Backspace erase  Enter submit  Esc quit", DIM));
    out
}

pub fn menu_reply_lines(choice: Option<LevelId>) -> Vec<Line> {
    match choice {
        Some(level) => vec![Line::coloured(format!("{level} selected!"), GOOD)],
        None => vec![Line::coloured("Invalid input, try again!", BAD)],
    }
}

pub fn level_blurb(level: LevelId) -> &'static str {
    match (level.unit(), level.shows_pattern()) {
        (Unit::Character, true) => "individual characters with their Morse code provided",
        (Unit::Character, false) => "individual characters without their Morse code",
        (Unit::Word, true) => "individual words with their Morse code provided",
        (Unit::Word, false) => "individual words without their Morse code",
    }
}

/// A–Z reference chart, six per row; patterns included when `with_patterns`.
pub fn chart_lines(dict: &Dictionary, with_patterns: bool) -> Vec<String> {
    let cells: Vec<String> = ('A'..='Z')
        .map(|c| match dict.letter(c) {
            Some(enc) if with_patterns => format!("{c} [{enc}]"),
            _ => c.to_string(),
        })
        .collect();
    let width = if with_patterns { 10 } else { 4 };
    let mut rows: Vec<String> = cells
        .chunks(6)
        .map(|row| {
            row.iter()
                .map(|cell| format!("{cell:<width$}"))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect();
    rows.push("Digits 0-9".to_string());
    rows
}

pub fn rules_lines(level: LevelId, dict: &Dictionary) -> Vec<Line> {
    let mut out = vec![
        Line::coloured(RULE, DIM),
        Line::coloured(format!("{level} begins!"), TITLE),
        Line::plain(format!("Key the Morse code for {}.", level_blurb(level))),
        Line::plain(format!(
            "{STREAK_TO_ADVANCE} correct in a row advances; a miss costs a life, a hit restores one (max {MAX_LIVES})."
        )),
    ];
    if level.unit() == Unit::Word {
        out.push(Line::plain("Separate the letters of a word with a single space."));
    }
    out.extend(chart_lines(dict, level.shows_pattern()).into_iter().map(Line::plain));
    out.push(Line::coloured(RULE, DIM));
    out
}

pub fn stats_lines(title: &str, stats: LevelStats) -> Vec<Line> {
    vec![
        Line::coloured(title, TITLE),
        Line::plain(format!("  Total number of attempts:      {}", stats.attempts())),
        Line::plain(format!("  Number of successful attempts: {}", stats.successes)),
        Line::plain(format!("  Number of failed attempts:     {}", stats.failures)),
        Line::plain(format!("  Success rate:                  {}%", stats.success_rate())),
    ]
}

/// Transcript lines for one event. `LevelStarted` needs the dictionary
/// for its chart, so it is handled by `Console::show`.
pub fn describe(event: &GameEvent) -> Vec<Line> {
    match event {
        GameEvent::LevelStarted { level } => vec![Line::coloured(format!("{level} begins!"), TITLE)],
        GameEvent::StatusChanged(_) => vec![],
        GameEvent::SymbolShown { symbol, label, hint } => {
            let kind = match symbol {
                MorseSymbol::Letter(_) => "Letter",
                MorseSymbol::Digit(_) => "Digit",
                MorseSymbol::Word(_) => "Word",
            };
            let mut out = vec![Line::coloured(format!("{kind}: {label}"), KEY)];
            if let Some(enc) = hint {
                out.push(Line::plain(format!("Morse code: {enc}")));
            }
            out
        }
        GameEvent::Correct { streak, lives } => vec![Line::coloured(
            format!(
                "Correct! You are {streak}/{STREAK_TO_ADVANCE} of the way to the next level. {lives} lives remaining."
            ),
            GOOD,
        )],
        GameEvent::Incorrect { lives, malformed } => {
            let mut out = vec![];
            if let Some(c) = malformed {
                out.push(Line::coloured(format!("'{c}' is not a Morse token."), DIM));
            }
            out.push(Line::coloured(format!("That is incorrect - {lives} lives remaining."), BAD));
            out
        }
        GameEvent::LevelComplete { level, stats } => {
            let mut out = vec![match level.next() {
                Some(next) => Line::coloured(
                    format!("You have completed {level}. Moving to {next}."),
                    GOOD,
                ),
                None => Line::coloured(format!("You have completed {level}."), GOOD),
            }];
            out.extend(stats_lines(&format!("{level} statistics"), *stats));
            out
        }
        GameEvent::GameOver { level, stats } => {
            let mut out = vec![Line::coloured("You have run out of lives - Game Over!", BAD)];
            out.extend(stats_lines(&format!("{level} statistics"), *stats));
            out
        }
        GameEvent::Victory => vec![Line::coloured("All four levels cleared. Well keyed!", TITLE)],
        GameEvent::Cancelled => vec![Line::coloured("Session cancelled.", DIM)],
        GameEvent::FinalStats(stats) => stats_lines("Session statistics", *stats),
    }
}

// ── Terminal writer ──

pub struct Console {
    writer: BufWriter<Stdout>,
}

impl Console {
    pub fn new() -> Self {
        Console {
            writer: BufWriter::with_capacity(4096, io::stdout()),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor)?;
        terminal::disable_raw_mode()
    }

    pub fn write_lines(&mut self, lines: &[Line]) -> io::Result<()> {
        for line in lines {
            match line.colour {
                Some(c) => queue!(
                    self.writer,
                    SetForegroundColor(c),
                    Print(&line.text),
                    ResetColor,
                    Print("\r\n")
                )?,
                None => queue!(self.writer, Print(&line.text), Print("\r\n"))?,
            }
        }
        self.writer.flush()
    }

    pub fn show(&mut self, event: &GameEvent, dict: &Dictionary) -> io::Result<()> {
        match event {
            GameEvent::LevelStarted { level } => self.write_lines(&rules_lines(*level, dict)),
            other => self.write_lines(&describe(other)),
        }
    }

    /// Coloured lamp swatch with its meaning.
    pub fn lamp(&mut self, status: Status) -> io::Result<()> {
        let lamp = Lamp::from_status(status);
        queue!(
            self.writer,
            Print("["),
            SetForegroundColor(lamp.colour()),
            Print("●"),
            ResetColor,
            Print("] "),
            SetForegroundColor(DIM),
            Print(lamp.label()),
            ResetColor,
            Print("\r\n")
        )?;
        self.writer.flush()
    }
}
