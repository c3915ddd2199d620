/// Level controller: one level attempt as an explicit state machine.
///
/// ## Phases
///   `Start` → `AwaitingInput` → `Evaluating` → one of
///     - `AwaitingInput` (round done, next symbol drawn)
///     - `Finished(outcome)` (streak reached or lives exhausted)
///     - `Cancelled` (input source gave up)
///
/// `start()` and `step()` mutate the controller and return the events the
/// transition produced. All game state lives here. Nothing is global, and
/// the controller never starts another level itself: the session reads
/// `phase()` and decides what runs next.
///
/// A round is applied to `ProgressState` in one `apply_result` call, so a
/// cancellation can never leave it half-updated.

use log::{debug, info};

use crate::domain::alphabet::Dictionary;
use crate::domain::code::{LevelId, MorseSymbol};
use crate::domain::error::MorseError;
use crate::domain::rules::{self, ProgressState, Signal};
use crate::domain::verify::{self, Verdict};
use crate::sim::event::{GameEvent, Status};
use crate::sim::generator::SymbolSource;

/// Terminal result of a level attempt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameOutcome {
    Advance(LevelId),
    Failed,
    Victory,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelPhase {
    Start,
    AwaitingInput,
    Evaluating,
    Finished(GameOutcome),
    Cancelled,
}

/// What the input side delivers for a round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundInput {
    /// A complete candidate in `.`/`-`/space text.
    Candidate(String),
    Cancel,
}

pub struct LevelController {
    level: LevelId,
    phase: LevelPhase,
    progress: ProgressState,
    current: Option<MorseSymbol>,
    repeat_after_miss: bool,
}

impl LevelController {
    pub fn new(level: LevelId, repeat_after_miss: bool) -> Self {
        LevelController {
            level,
            phase: LevelPhase::Start,
            progress: ProgressState::new(),
            current: None,
            repeat_after_miss,
        }
    }

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    pub fn current_symbol(&self) -> Option<MorseSymbol> {
        self.current
    }

    /// `Start` → `AwaitingInput`: fresh progress, first symbol drawn.
    /// Calling it in any other phase does nothing.
    pub fn start(
        &mut self,
        dict: &Dictionary,
        source: &mut dyn SymbolSource,
    ) -> Result<Vec<GameEvent>, MorseError> {
        if self.phase != LevelPhase::Start {
            return Ok(vec![]);
        }
        info!("{} started", self.level);
        self.progress = ProgressState::new();
        let mut events = vec![
            GameEvent::LevelStarted { level: self.level },
            GameEvent::StatusChanged(self.status(true)),
        ];
        events.push(self.draw(dict, source)?);
        self.phase = LevelPhase::AwaitingInput;
        Ok(events)
    }

    /// Feed one round's input. Ignored unless awaiting input.
    pub fn step(
        &mut self,
        input: RoundInput,
        dict: &Dictionary,
        source: &mut dyn SymbolSource,
    ) -> Result<Vec<GameEvent>, MorseError> {
        if self.phase != LevelPhase::AwaitingInput {
            debug!("{} ignoring input in phase {:?}", self.level, self.phase);
            return Ok(vec![]);
        }
        let Some(symbol) = self.current else {
            return Ok(vec![]);
        };

        let raw = match input {
            RoundInput::Cancel => {
                info!("{} cancelled", self.level);
                self.phase = LevelPhase::Cancelled;
                return Ok(vec![
                    GameEvent::StatusChanged(self.status(false)),
                    GameEvent::Cancelled,
                ]);
            }
            RoundInput::Candidate(raw) => raw,
        };

        self.phase = LevelPhase::Evaluating;
        let verdict = verify::check(dict, self.level, symbol, &raw)?;
        debug!("{} symbol {} candidate {:?}: {:?}", self.level, symbol, raw, verdict);

        let (next, signal) = rules::apply_result(self.progress, verdict.is_correct());
        self.progress = next;

        let mut events = Vec::with_capacity(4);
        events.push(match verdict {
            Verdict::Correct => GameEvent::Correct {
                streak: next.consecutive_correct,
                lives: next.lives,
            },
            Verdict::Incorrect => GameEvent::Incorrect { lives: next.lives, malformed: None },
            Verdict::Malformed(ch) => GameEvent::Incorrect { lives: next.lives, malformed: Some(ch) },
        });

        match signal {
            Signal::Continue => {
                events.push(GameEvent::StatusChanged(self.status(true)));
                if verdict.is_correct() || !self.repeat_after_miss {
                    events.push(self.draw(dict, source)?);
                } else {
                    events.push(self.show(dict, symbol)?);
                }
                self.phase = LevelPhase::AwaitingInput;
            }
            Signal::LevelComplete => {
                let outcome = match self.level.next() {
                    Some(next_level) => GameOutcome::Advance(next_level),
                    None => GameOutcome::Victory,
                };
                info!("{} complete: {:?}", self.level, outcome);
                events.push(GameEvent::StatusChanged(self.status(false)));
                events.push(GameEvent::LevelComplete {
                    level: self.level,
                    stats: next.stats(),
                });
                self.phase = LevelPhase::Finished(outcome);
            }
            Signal::OutOfLives => {
                info!("{} failed", self.level);
                events.push(GameEvent::StatusChanged(self.status(false)));
                events.push(GameEvent::GameOver {
                    level: self.level,
                    stats: next.stats(),
                });
                self.phase = LevelPhase::Finished(GameOutcome::Failed);
            }
        }

        Ok(events)
    }

    // ── Internal ──

    fn status(&self, game_active: bool) -> Status {
        Status { lives: self.progress.lives, game_active }
    }

    fn draw(&mut self, dict: &Dictionary, source: &mut dyn SymbolSource) -> Result<GameEvent, MorseError> {
        let symbol = source.next_symbol(self.level, dict);
        self.show(dict, symbol)
    }

    fn show(&mut self, dict: &Dictionary, symbol: MorseSymbol) -> Result<GameEvent, MorseError> {
        // Resolving the answer up front surfaces a bad draw before the player types.
        let expected = verify::expected(dict, self.level, symbol)?;
        self.current = Some(symbol);
        Ok(GameEvent::SymbolShown {
            symbol,
            label: dict.label(symbol),
            hint: self.level.shows_pattern().then(|| expected.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::code::Encoding;
    use std::collections::VecDeque;

    /// Hands out a fixed script of symbols, then repeats the last one.
    struct Scripted(VecDeque<MorseSymbol>, MorseSymbol);

    impl Scripted {
        fn new(symbols: &[MorseSymbol]) -> Self {
            Scripted(symbols.iter().copied().collect(), symbols[symbols.len() - 1])
        }
    }

    impl SymbolSource for Scripted {
        fn next_symbol(&mut self, _level: LevelId, _dict: &Dictionary) -> MorseSymbol {
            self.0.pop_front().unwrap_or(self.1)
        }
    }

    fn answer(s: &str) -> RoundInput {
        RoundInput::Candidate(s.to_string())
    }

    fn started(level: LevelId, src: &mut Scripted, d: &Dictionary) -> LevelController {
        let mut ctl = LevelController::new(level, false);
        ctl.start(d, src).unwrap();
        ctl
    }

    #[test]
    fn start_resets_and_shows_first_symbol() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Letter('E')]);
        let mut ctl = LevelController::new(LevelId::One, false);
        assert_eq!(ctl.phase(), LevelPhase::Start);

        let events = ctl.start(&d, &mut src).unwrap();
        assert_eq!(events[0], GameEvent::LevelStarted { level: LevelId::One });
        assert_eq!(events[1], GameEvent::StatusChanged(Status { lives: 3, game_active: true }));
        assert_eq!(
            events[2],
            GameEvent::SymbolShown {
                symbol: MorseSymbol::Letter('E'),
                label: "E".into(),
                hint: Some(Encoding::parse(".").unwrap()),
            }
        );
        assert_eq!(ctl.phase(), LevelPhase::AwaitingInput);
        assert_eq!(ctl.current_symbol(), Some(MorseSymbol::Letter('E')));

        // Second start is a no-op.
        assert!(ctl.start(&d, &mut src).unwrap().is_empty());
    }

    #[test]
    fn level_one_correct_then_incorrect() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Letter('E'), MorseSymbol::Letter('E')]);
        let mut ctl = started(LevelId::One, &mut src, &d);

        let events = ctl.step(answer("."), &d, &mut src).unwrap();
        assert_eq!(events[0], GameEvent::Correct { streak: 1, lives: 3 });
        assert_eq!(ctl.progress().lives, 3);
        assert_eq!(ctl.progress().consecutive_correct, 1);

        let events = ctl.step(answer("-"), &d, &mut src).unwrap();
        assert_eq!(events[0], GameEvent::Incorrect { lives: 2, malformed: None });
        assert_eq!(events[1], GameEvent::StatusChanged(Status { lives: 2, game_active: true }));
        assert_eq!(ctl.progress().lives, 2);
        assert_eq!(ctl.progress().consecutive_correct, 0);
        assert_eq!(ctl.phase(), LevelPhase::AwaitingInput);
    }

    #[test]
    fn level_three_word_round() {
        let d = Dictionary::new().unwrap();
        let run = d.index().get("run").unwrap().symbol;
        let mut src = Scripted::new(&[run]);
        let mut ctl = started(LevelId::Three, &mut src, &d);

        let expected = d.index().find("run").unwrap().to_string();
        let events = ctl.step(answer(&expected), &d, &mut src).unwrap();
        assert!(matches!(events[0], GameEvent::Correct { .. }));

        let events = ctl.step(answer(".-. ..- --"), &d, &mut src).unwrap();
        assert!(matches!(events[0], GameEvent::Incorrect { .. }));
    }

    #[test]
    fn hidden_pattern_on_levels_two_and_four() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Digit('3')]);
        let mut ctl = LevelController::new(LevelId::Two, false);
        let events = ctl.start(&d, &mut src).unwrap();
        assert!(matches!(&events[2], GameEvent::SymbolShown { hint: None, .. }));

        let mut src = Scripted::new(&[MorseSymbol::Word(0)]);
        let mut ctl = LevelController::new(LevelId::Four, false);
        let events = ctl.start(&d, &mut src).unwrap();
        match &events[2] {
            GameEvent::SymbolShown { label, hint, .. } => {
                assert_eq!(label, "cave");
                assert!(hint.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn five_in_a_row_advances() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Letter('T')]);
        let mut ctl = started(LevelId::Two, &mut src, &d);

        for _ in 0..4 {
            ctl.step(answer("-"), &d, &mut src).unwrap();
            assert_eq!(ctl.phase(), LevelPhase::AwaitingInput);
        }
        let events = ctl.step(answer("-"), &d, &mut src).unwrap();
        assert_eq!(ctl.phase(), LevelPhase::Finished(GameOutcome::Advance(LevelId::Three)));
        assert!(events.contains(&GameEvent::StatusChanged(Status { lives: 3, game_active: false })));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::LevelComplete { level: LevelId::Two, stats } if stats.successes == 5
        )));
    }

    #[test]
    fn level_four_completion_is_victory() {
        let d = Dictionary::new().unwrap();
        let nap = d.index().get("nap").unwrap().symbol;
        let mut src = Scripted::new(&[nap]);
        let mut ctl = started(LevelId::Four, &mut src, &d);
        for _ in 0..5 {
            ctl.step(answer("-. .- .--."), &d, &mut src).unwrap();
        }
        assert_eq!(ctl.phase(), LevelPhase::Finished(GameOutcome::Victory));
    }

    #[test]
    fn three_misses_fail_the_level() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Letter('A')]);
        let mut ctl = started(LevelId::One, &mut src, &d);

        ctl.step(answer("-"), &d, &mut src).unwrap();
        ctl.step(answer("?"), &d, &mut src).unwrap();
        let events = ctl.step(answer(""), &d, &mut src).unwrap();
        assert_eq!(ctl.phase(), LevelPhase::Finished(GameOutcome::Failed));
        assert_eq!(events[1], GameEvent::StatusChanged(Status { lives: 0, game_active: false }));
        assert!(matches!(
            events[2],
            GameEvent::GameOver { level: LevelId::One, stats } if stats.failures == 3
        ));

        // Finished: further input is ignored.
        assert!(ctl.step(answer(".-"), &d, &mut src).unwrap().is_empty());
        assert_eq!(ctl.progress().total_incorrect, 3);
    }

    #[test]
    fn malformed_input_costs_a_life() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Letter('A')]);
        let mut ctl = started(LevelId::One, &mut src, &d);
        let events = ctl.step(answer(".-x"), &d, &mut src).unwrap();
        assert_eq!(events[0], GameEvent::Incorrect { lives: 2, malformed: Some('x') });
    }

    #[test]
    fn cancel_keeps_applied_rounds() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Letter('E')]);
        let mut ctl = started(LevelId::One, &mut src, &d);
        ctl.step(answer("."), &d, &mut src).unwrap();
        ctl.step(answer(".."), &d, &mut src).unwrap();

        let before = ctl.progress();
        let events = ctl.step(RoundInput::Cancel, &d, &mut src).unwrap();
        assert_eq!(ctl.phase(), LevelPhase::Cancelled);
        assert_eq!(events.last(), Some(&GameEvent::Cancelled));
        assert_eq!(ctl.progress(), before);
        assert_eq!(ctl.progress().stats().attempts(), 2);
    }

    #[test]
    fn repeat_after_miss_keeps_the_symbol() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Letter('K'), MorseSymbol::Letter('M')]);
        let mut ctl = LevelController::new(LevelId::Two, true);
        ctl.start(&d, &mut src).unwrap();

        ctl.step(answer("..."), &d, &mut src).unwrap();
        assert_eq!(ctl.current_symbol(), Some(MorseSymbol::Letter('K')));

        ctl.step(answer("-.-"), &d, &mut src).unwrap();
        assert_eq!(ctl.current_symbol(), Some(MorseSymbol::Letter('M')));
    }

    #[test]
    fn without_repeat_a_miss_draws_a_new_symbol() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Letter('K'), MorseSymbol::Letter('M')]);
        let mut ctl = started(LevelId::Two, &mut src, &d);
        ctl.step(answer("..."), &d, &mut src).unwrap();
        assert_eq!(ctl.current_symbol(), Some(MorseSymbol::Letter('M')));
    }

    #[test]
    fn step_before_start_is_ignored() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Letter('E')]);
        let mut ctl = LevelController::new(LevelId::One, false);
        assert!(ctl.step(answer("."), &d, &mut src).unwrap().is_empty());
        assert_eq!(ctl.phase(), LevelPhase::Start);
    }

    #[test]
    fn bad_draw_is_an_error() {
        let d = Dictionary::new().unwrap();
        let mut src = Scripted::new(&[MorseSymbol::Word(3)]);
        let mut ctl = LevelController::new(LevelId::One, false);
        assert!(matches!(
            ctl.start(&d, &mut src),
            Err(MorseError::UnitMismatch { .. })
        ));
    }
}
