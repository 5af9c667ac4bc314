//! Pure typewriter state machine.
//!
//! [`AnimationState::advance`] moves the animation forward by exactly one
//! character and reports which delay should elapse before the next step.
//! Nothing here touches timers or sinks, so every transition can be tested
//! by calling it in a loop.

use crate::sequence::AnimationSequence;

/// Where the animation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not running: not started yet, stopped, finished or detached.
    Idle,
    Typing,
    /// Fully typed, waiting out the pause before deleting.
    Paused,
    Deleting,
}

/// Whether the animation loops or types a single entry once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Type, pause, delete, move to the next entry, forever.
    Cycle,
    /// Type the first entry once, then finish.
    Reveal,
}

/// Which delay to wait before the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTick {
    Type,
    Pause,
    Delete,
    /// Nothing more to do.
    Done,
}

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Text to display after this step.
    pub text: String,
    pub next: NextTick,
    /// Set when the step moved from the last entry back to the first.
    pub wrapped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationState {
    pub sequence_index: usize,
    /// Number of chars of the current entry on display.
    pub char_index: usize,
    pub phase: Phase,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationState {
    pub const fn new() -> Self {
        Self {
            sequence_index: 0,
            char_index: 0,
            phase: Phase::Idle,
        }
    }

    /// Advance by one character.
    ///
    /// `Idle` and `Typing` type a character; `Paused` and `Deleting` delete
    /// one. A step that completes an entry changes phase so the following
    /// call goes the other way.
    pub fn advance(&mut self, sequence: &AnimationSequence, mode: Mode) -> Step {
        let len = sequence.char_len(self.sequence_index);

        match self.phase {
            Phase::Idle | Phase::Typing => {
                self.phase = Phase::Typing;
                if self.char_index < len {
                    self.char_index += 1;
                }
            }
            Phase::Paused | Phase::Deleting => {
                self.phase = Phase::Deleting;
                self.char_index = self.char_index.saturating_sub(1);
            }
        }

        let text = sequence
            .prefix(self.sequence_index, self.char_index)
            .to_owned();

        if self.phase == Phase::Typing {
            if self.char_index < len {
                return Step {
                    text,
                    next: NextTick::Type,
                    wrapped: false,
                };
            }
            let next = match mode {
                Mode::Cycle => {
                    self.phase = Phase::Paused;
                    NextTick::Pause
                }
                Mode::Reveal => {
                    self.phase = Phase::Idle;
                    NextTick::Done
                }
            };
            return Step {
                text,
                next,
                wrapped: false,
            };
        }

        if self.char_index > 0 {
            return Step {
                text,
                next: NextTick::Delete,
                wrapped: false,
            };
        }

        self.phase = Phase::Typing;
        self.sequence_index = sequence.next_index(self.sequence_index);
        Step {
            text,
            next: NextTick::Type,
            wrapped: self.sequence_index == 0,
        }
    }
}
