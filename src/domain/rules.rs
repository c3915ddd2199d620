/// Progress rules, truth-table driven.
///
/// Pure functions over `ProgressState`: no hidden state, no side effects.
/// The level controller feeds every verified round through `apply_result`
/// and acts on the returned `Signal`.
///
/// ## Result Truth Table
///
/// ┌───────────┬──────────────────────────────┬──────────────────────┐
/// │ Answer    │ State change                 │ Signal               │
/// ├───────────┼──────────────────────────────┼──────────────────────┤
/// │ correct   │ streak += 1                  │ LevelComplete if     │
/// │           │ lives = min(lives + 1, 3)    │ streak == 5          │
/// │           │ total_correct += 1           │ else Continue        │
/// ├───────────┼──────────────────────────────┼──────────────────────┤
/// │ incorrect │ streak = 0                   │ OutOfLives if        │
/// │           │ lives -= 1                   │ lives == 0           │
/// │           │ total_incorrect += 1         │ else Continue        │
/// └───────────┴──────────────────────────────┴──────────────────────┘
///
/// Lives stay within [0, 3]; the streak stays within [0, 5].

pub const MAX_LIVES: u8 = 3;
pub const STREAK_TO_ADVANCE: u8 = 5;

/// Per-level-attempt bookkeeping. Created at level start, dropped at level end.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ProgressState {
    pub lives: u8,
    pub consecutive_correct: u8,
    pub total_correct: u32,
    pub total_incorrect: u32,
}

impl ProgressState {
    pub fn new() -> Self {
        ProgressState {
            lives: MAX_LIVES,
            consecutive_correct: 0,
            total_correct: 0,
            total_incorrect: 0,
        }
    }

    pub fn stats(&self) -> LevelStats {
        LevelStats::new(self.total_correct, self.total_incorrect)
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Signal {
    Continue,
    LevelComplete,
    OutOfLives,
}

/// Apply one verified answer.
pub fn apply_result(state: ProgressState, correct: bool) -> (ProgressState, Signal) {
    let mut next = state;
    if correct {
        next.consecutive_correct = next.consecutive_correct.saturating_add(1).min(STREAK_TO_ADVANCE);
        next.lives = next.lives.saturating_add(1).min(MAX_LIVES);
        next.total_correct += 1;
        let signal = if next.consecutive_correct == STREAK_TO_ADVANCE {
            Signal::LevelComplete
        } else {
            Signal::Continue
        };
        (next, signal)
    } else {
        next.consecutive_correct = 0;
        next.lives = next.lives.saturating_sub(1);
        next.total_incorrect += 1;
        let signal = if next.lives == 0 {
            Signal::OutOfLives
        } else {
            Signal::Continue
        };
        (next, signal)
    }
}

/// Attempt tallies for a level or a whole session.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LevelStats {
    pub successes: u32,
    pub failures: u32,
}

impl LevelStats {
    pub fn new(successes: u32, failures: u32) -> Self {
        LevelStats { successes, failures }
    }

    pub fn attempts(&self) -> u32 {
        self.successes + self.failures
    }

    /// Whole-percent success rate, rounded down. Zero attempts is 0%.
    pub fn success_rate(&self) -> u32 {
        match self.attempts() {
            0 => 0,
            n => (self.successes as u64 * 100 / n as u64) as u32,
        }
    }
}

impl std::ops::AddAssign for LevelStats {
    fn add_assign(&mut self, other: LevelStats) {
        self.successes += other.successes;
        self.failures += other.failures;
    }
}
