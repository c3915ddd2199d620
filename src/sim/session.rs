/// Game session: runs levels back to back until victory, failure or cancel.
///
/// The session owns the round generator and borrows the dictionary. Input
/// and presentation are seams (`InputSource`, `EventSink`) so the same loop
/// drives the terminal frontend and the tests.

use log::info;

use crate::domain::alphabet::Dictionary;
use crate::domain::code::LevelId;
use crate::domain::error::MorseError;
use crate::domain::rules::LevelStats;
use crate::sim::event::GameEvent;
use crate::sim::generator::SymbolSource;
use crate::sim::level::{GameOutcome, LevelController, LevelPhase, RoundInput};

/// Delivers one completed candidate per round, or a cancellation.
/// Blocks until one is available.
pub trait InputSource {
    fn read_candidate(&mut self) -> Result<RoundInput, MorseError>;
}

/// Consumes game events for display, sound, indicators.
pub trait EventSink {
    fn emit(&mut self, event: &GameEvent) -> Result<(), MorseError>;
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) -> Result<(), MorseError> {
        self.push(event.clone());
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionOutcome {
    /// Level 4 completed.
    Victory,
    /// Lives ran out on this level.
    Failed { level: LevelId },
    /// Input was cancelled while playing this level.
    Cancelled { level: LevelId },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub totals: LevelStats,
    pub levels_cleared: u32,
}

pub struct GameSession<'d, S: SymbolSource> {
    dict: &'d Dictionary,
    source: S,
    repeat_after_miss: bool,
}

impl<'d, S: SymbolSource> GameSession<'d, S> {
    pub fn new(dict: &'d Dictionary, source: S, repeat_after_miss: bool) -> Self {
        GameSession { dict, source, repeat_after_miss }
    }

    /// Play from `start` until the session ends. Reports final statistics
    /// through `sink` before returning.
    pub fn run(
        &mut self,
        start: LevelId,
        input: &mut dyn InputSource,
        sink: &mut dyn EventSink,
    ) -> Result<SessionReport, MorseError> {
        let mut level = start;
        let mut totals = LevelStats::default();
        let mut levels_cleared = 0;

        let outcome = loop {
            let mut ctl = LevelController::new(level, self.repeat_after_miss);
            emit_all(sink, ctl.start(self.dict, &mut self.source)?)?;

            let end = loop {
                match ctl.phase() {
                    LevelPhase::Finished(outcome) => break Some(outcome),
                    LevelPhase::Cancelled => break None,
                    _ => {}
                }
                let round = input.read_candidate()?;
                emit_all(sink, ctl.step(round, self.dict, &mut self.source)?)?;
            };

            totals += ctl.progress().stats();

            match end {
                Some(GameOutcome::Advance(next)) => {
                    levels_cleared += 1;
                    level = next;
                }
                Some(GameOutcome::Victory) => {
                    levels_cleared += 1;
                    sink.emit(&GameEvent::Victory)?;
                    break SessionOutcome::Victory;
                }
                Some(GameOutcome::Failed) => break SessionOutcome::Failed { level },
                None => break SessionOutcome::Cancelled { level },
            }
        };

        info!(
            "session over: {:?}, {} attempts, {}% success",
            outcome,
            totals.attempts(),
            totals.success_rate()
        );
        sink.emit(&GameEvent::FinalStats(totals))?;

        Ok(SessionReport { outcome, totals, levels_cleared })
    }
}

fn emit_all(sink: &mut dyn EventSink, events: Vec<GameEvent>) -> Result<(), MorseError> {
    for event in &events {
        sink.emit(event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::code::MorseSymbol;
    use std::collections::VecDeque;

    /// Always draws 'E' on character levels and "run" on word levels.
    struct Fixed;

    impl SymbolSource for Fixed {
        fn next_symbol(&mut self, level: LevelId, dict: &Dictionary) -> MorseSymbol {
            match level.unit() {
                crate::domain::code::Unit::Character => MorseSymbol::Letter('E'),
                crate::domain::code::Unit::Word => dict.index().get("run").unwrap().symbol,
            }
        }
    }

    const E: &str = ".";
    const RUN: &str = ".-. ..- -.";

    /// Replays answers, then cancels once the script runs out.
    struct Script(VecDeque<RoundInput>);

    impl Script {
        fn new(answers: &[&str]) -> Self {
            Script(answers.iter().map(|a| RoundInput::Candidate(a.to_string())).collect())
        }
    }

    impl InputSource for Script {
        fn read_candidate(&mut self) -> Result<RoundInput, MorseError> {
            Ok(self.0.pop_front().unwrap_or(RoundInput::Cancel))
        }
    }

    fn play(start: LevelId, answers: &[&str]) -> (SessionReport, Vec<GameEvent>) {
        let d = Dictionary::new().unwrap();
        let mut session = GameSession::new(&d, Fixed, false);
        let mut events: Vec<GameEvent> = vec![];
        let report = session.run(start, &mut Script::new(answers), &mut events).unwrap();
        (report, events)
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn perfect_run_from_level_one_is_victory() {
        let answers: Vec<&str> = [E; 10].into_iter().chain([RUN; 10]).collect();
        let (report, events) = play(LevelId::One, &answers);

        assert_eq!(report.outcome, SessionOutcome::Victory);
        assert_eq!(report.levels_cleared, 4);
        assert_eq!(report.totals, LevelStats::new(20, 0));
        assert_eq!(count(&events, |e| matches!(e, GameEvent::LevelStarted { .. })), 4);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::LevelComplete { .. })), 4);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::Victory)), 1);
        assert_eq!(events.last(), Some(&GameEvent::FinalStats(LevelStats::new(20, 0))));
    }

    #[test]
    fn levels_follow_in_order() {
        let (_, events) = play(LevelId::Three, &[RUN; 10]);
        let started: Vec<LevelId> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LevelStarted { level } => Some(*level),
                _ => None,
            })
            .collect();
        assert_eq!(started, vec![LevelId::Three, LevelId::Four]);
    }

    #[test]
    fn each_level_starts_with_full_lives() {
        // Lose a life on level 1, then clear it: level 2 starts at 3 again.
        let (_, events) = play(LevelId::One, &["-", E, E, E, E, E]);
        let statuses: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::StatusChanged(s) if s.game_active => Some(s.lives),
                _ => None,
            })
            .collect();
        assert_eq!(statuses, vec![3, 2, 3, 3, 3, 3, 3]);
    }

    #[test]
    fn running_out_of_lives_ends_the_session() {
        let (report, events) = play(LevelId::One, &[E, E, E, E, E, "x", "-", ""]);
        assert_eq!(report.outcome, SessionOutcome::Failed { level: LevelId::Two });
        assert_eq!(report.levels_cleared, 1);
        assert_eq!(report.totals, LevelStats::new(5, 3));
        assert_eq!(report.totals.success_rate(), 62);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::GameOver { .. })), 1);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::Victory)), 0);
    }

    #[test]
    fn cancel_keeps_committed_statistics() {
        let (report, events) = play(LevelId::Two, &[E, "........"]);
        assert_eq!(report.outcome, SessionOutcome::Cancelled { level: LevelId::Two });
        assert_eq!(report.totals, LevelStats::new(1, 1));
        assert!(events.contains(&GameEvent::Cancelled));
        assert_eq!(events.last(), Some(&GameEvent::FinalStats(LevelStats::new(1, 1))));
    }

    #[test]
    fn cancel_before_any_round() {
        let (report, _) = play(LevelId::Four, &[]);
        assert_eq!(report.outcome, SessionOutcome::Cancelled { level: LevelId::Four });
        assert_eq!(report.totals.attempts(), 0);
        assert_eq!(report.totals.success_rate(), 0);
    }

    #[test]
    fn seeded_generator_drives_a_session() {
        let d = Dictionary::new().unwrap();
        let mut session = GameSession::new(&d, crate::sim::generator::RoundGenerator::new(5), false);
        let mut events: Vec<GameEvent> = vec![];
        let report = session.run(LevelId::Two, &mut Script::new(&["?", "?", "?"]), &mut events).unwrap();
        assert_eq!(report.outcome, SessionOutcome::Failed { level: LevelId::Two });
        assert_eq!(count(&events, |e| matches!(e, GameEvent::SymbolShown { .. })), 3);
    }
}
