//! The typewriter animation engine.
//!
//! A [`TextAnimator`] turns a sequence of strings into a chain of scheduled
//! ticks. Each tick advances the [`AnimationState`] by one character,
//! pushes the visible prefix to a [`RenderSink`] and schedules its
//! successor. Every call to [`TextAnimator::start`] or
//! [`TextAnimator::reveal`] creates an independent animation controlled
//! through the returned [`AnimationHandle`].

use std::sync::{Arc, Mutex, Weak};

use crate::config::{AnimationConfig, RevealConfig, Timing};
use crate::error::AnimationError;
use crate::scheduler::{lock, Scheduler, TimerId};
use crate::sequence::AnimationSequence;
use crate::sink::RenderSink;
use crate::state::{AnimationState, Mode, NextTick, Phase};

/// Why an animation is no longer running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// [`AnimationHandle::stop`] was called.
    Stopped,
    /// A reveal finished, or the configured number of cycles ran.
    Completed,
    /// The render target went away.
    SinkDetached,
}

/// Starts animations on a scheduler.
#[derive(Clone)]
pub struct TextAnimator<Sc> {
    scheduler: Sc,
}

impl<Sc: Scheduler> TextAnimator<Sc> {
    pub fn new(scheduler: Sc) -> Self {
        Self { scheduler }
    }

    /// Cycle through `entries` until stopped, typing and deleting each one.
    ///
    /// Fails with [`AnimationError::InvalidConfiguration`] before anything is
    /// scheduled if `entries` is empty or `config` holds a negative delay.
    pub fn start<I, T, S>(
        &self,
        entries: I,
        sink: &Arc<Mutex<S>>,
        config: &AnimationConfig,
    ) -> Result<AnimationHandle, AnimationError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
        S: RenderSink,
    {
        let sequence = AnimationSequence::new(entries)?;
        let timing = config.timing()?;
        let cycle_limit = config.cycle_limit()?;
        Ok(self.launch(sequence, sink, timing, Mode::Cycle, cycle_limit))
    }

    /// Type `text` once at a fixed per-character delay, then finish.
    pub fn reveal<S: RenderSink>(
        &self,
        text: impl Into<String>,
        sink: &Arc<Mutex<S>>,
        config: &RevealConfig,
    ) -> Result<AnimationHandle, AnimationError> {
        let timing = config.timing()?;
        Ok(self.launch(
            AnimationSequence::single(text),
            sink,
            timing,
            Mode::Reveal,
            None,
        ))
    }

    fn launch<S: RenderSink>(
        &self,
        sequence: AnimationSequence,
        sink: &Arc<Mutex<S>>,
        timing: Timing,
        mode: Mode,
        cycle_limit: Option<u32>,
    ) -> AnimationHandle {
        tracing::debug!(
            entries = sequence.len(),
            ?mode,
            ?timing,
            ?cycle_limit,
            "animation started"
        );
        let runner = Arc::new(Runner {
            scheduler: self.scheduler.clone(),
            shared: Mutex::new(Shared {
                sequence,
                timing,
                mode,
                state: AnimationState::new(),
                sink: Arc::downgrade(sink),
                pending: None,
                outcome: None,
                cycle_limit,
                cycles_done: 0,
            }),
        });

        {
            let mut shared = lock(&runner.shared);
            let delay = shared.timing.start_delay;
            shared.pending = Some(Runner::schedule_tick(&runner, delay));
        }

        AnimationHandle { control: runner }
    }
}

/// Controls and observes one running animation.
///
/// Clones refer to the same animation. Dropping every handle does not stop
/// it; call [`stop`](Self::stop).
#[derive(Clone)]
pub struct AnimationHandle {
    control: Arc<dyn Control>,
}

impl AnimationHandle {
    /// Cancel the pending tick. Calling this again, or after the animation
    /// ended on its own, has no effect.
    pub fn stop(&self) {
        self.control.stop();
    }

    pub fn is_running(&self) -> bool {
        self.control.outcome().is_none()
    }

    /// Current phase; `Idle` once the animation is no longer running.
    pub fn phase(&self) -> Phase {
        if self.is_running() {
            self.control.snapshot().phase
        } else {
            Phase::Idle
        }
    }

    pub fn snapshot(&self) -> AnimationState {
        self.control.snapshot()
    }

    /// Why the animation ended, or `None` while it is still running.
    pub fn outcome(&self) -> Option<StopReason> {
        self.control.outcome()
    }
}

impl std::fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("state", &self.snapshot())
            .field("outcome", &self.outcome())
            .finish()
    }
}

/// Type-erased view of a runner, so handles do not carry its generics.
trait Control: Send + Sync {
    fn stop(&self);
    fn snapshot(&self) -> AnimationState;
    fn outcome(&self) -> Option<StopReason>;
}

struct Runner<S, Sc> {
    scheduler: Sc,
    shared: Mutex<Shared<S>>,
}

struct Shared<S> {
    sequence: AnimationSequence,
    timing: Timing,
    mode: Mode,
    state: AnimationState,
    sink: Weak<Mutex<S>>,
    /// The single outstanding tick, if any.
    pending: Option<TimerId>,
    /// Liveness flag: set once, never cleared.
    outcome: Option<StopReason>,
    cycle_limit: Option<u32>,
    cycles_done: u32,
}

impl<S: RenderSink> Shared<S> {
    fn finish(&mut self, reason: StopReason) {
        if self.outcome.is_none() {
            tracing::debug!(?reason, state = ?self.state, "animation ended");
            self.outcome = Some(reason);
        }
    }
}

impl<S: RenderSink, Sc: Scheduler> Runner<S, Sc> {
    fn schedule_tick(this: &Arc<Self>, delay: std::time::Duration) -> TimerId {
        let runner = Arc::clone(this);
        this.scheduler
            .schedule_after(delay, Box::new(move || runner.tick()))
    }

    fn tick(self: Arc<Self>) {
        let mut shared = lock(&self.shared);
        shared.pending = None;
        if shared.outcome.is_some() {
            return;
        }

        let Some(sink) = shared.sink.upgrade() else {
            shared.finish(StopReason::SinkDetached);
            return;
        };

        // The state only moves once the sink has accepted the new text.
        let Shared {
            sequence,
            mode,
            state,
            ..
        } = &mut *shared;
        let mut next_state = *state;
        let step = next_state.advance(sequence, *mode);
        tracing::trace!(text = %step.text, next = ?step.next, "tick");

        if lock(&sink).set_text(&step.text).is_err() {
            shared.finish(StopReason::SinkDetached);
            return;
        }
        shared.state = next_state;

        if step.wrapped {
            shared.cycles_done += 1;
            if shared
                .cycle_limit
                .is_some_and(|limit| shared.cycles_done >= limit)
            {
                shared.finish(StopReason::Completed);
                return;
            }
        }

        match shared.timing.delay_for(step.next) {
            Some(delay) => shared.pending = Some(Self::schedule_tick(&self, delay)),
            None => shared.finish(StopReason::Completed),
        }
    }
}

impl<S: RenderSink, Sc: Scheduler> Control for Runner<S, Sc> {
    fn stop(&self) {
        let mut shared = lock(&self.shared);
        if let Some(id) = shared.pending.take() {
            self.scheduler.cancel(id);
        }
        shared.finish(StopReason::Stopped);
    }

    fn snapshot(&self) -> AnimationState {
        lock(&self.shared).state
    }

    fn outcome(&self) -> Option<StopReason> {
        lock(&self.shared).outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkUnavailable;
    use crate::scheduler::{ManualScheduler, TokioScheduler};
    use crate::sink::TextPanel;
    use std::time::Duration;

    /// Records every value pushed to it.
    #[derive(Default)]
    struct RecordingSink {
        values: Vec<String>,
    }

    impl RenderSink for RecordingSink {
        fn set_text(&mut self, text: &str) -> Result<(), SinkUnavailable> {
            self.values.push(text.to_owned());
            Ok(())
        }
    }

    fn recording() -> Arc<Mutex<RecordingSink>> {
        Arc::new(Mutex::new(RecordingSink::default()))
    }

    fn values(sink: &Arc<Mutex<RecordingSink>>) -> Vec<String> {
        lock(sink).values.clone()
    }

    fn config(typing: i64, deleting: i64, pause: i64) -> AnimationConfig {
        AnimationConfig {
            typing_delay_ms: typing,
            deleting_delay_ms: deleting,
            pause_after_typed_ms: pause,
            start_delay_ms: 0,
            cycles: None,
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn cycles_single_entry_with_expected_timing() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let handle = animator.start(["ab"], &sink, &config(10, 10, 20)).unwrap();

        let mut observed = Vec::new();
        for _ in 0..7 {
            assert!(scheduler.run_next());
            let last = values(&sink).last().cloned().unwrap();
            observed.push((last, scheduler.now()));
        }

        let expected = vec![
            ("a".to_owned(), ms(0)),
            ("ab".to_owned(), ms(10)),
            ("a".to_owned(), ms(30)),
            ("".to_owned(), ms(40)),
            ("a".to_owned(), ms(50)),
            ("ab".to_owned(), ms(60)),
            ("a".to_owned(), ms(80)),
        ];
        assert_eq!(observed, expected);
        assert!(handle.is_running());
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn phases_follow_state_machine() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let handle = animator.start(["ab"], &sink, &config(1, 1, 1)).unwrap();
        assert_eq!(handle.phase(), Phase::Idle);

        let mut phases = Vec::new();
        for _ in 0..5 {
            scheduler.run_next();
            phases.push(handle.phase());
        }
        assert_eq!(
            phases,
            vec![
                Phase::Typing,
                Phase::Paused,
                Phase::Deleting,
                Phase::Typing,
                Phase::Typing,
            ]
        );
    }

    #[test]
    fn start_delay_defers_first_tick() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let cfg = AnimationConfig {
            start_delay_ms: 1000,
            ..config(100, 50, 2000)
        };
        animator.start(["ellie"], &sink, &cfg).unwrap();

        assert_eq!(scheduler.advance(ms(999)), 0);
        assert!(values(&sink).is_empty());
        assert_eq!(scheduler.advance(ms(1)), 1);
        assert_eq!(values(&sink), vec!["e"]);
    }

    #[test]
    fn one_shot_reveal_terminates() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let reveal = RevealConfig {
            delay_ms: 5,
            start_delay_ms: 0,
        };
        let handle = animator.reveal("hi", &sink, &reveal).unwrap();

        assert_eq!(scheduler.run_until_idle(100), 2);
        assert_eq!(values(&sink), vec!["h", "hi"]);
        assert_eq!(scheduler.now(), ms(5));
        assert_eq!(scheduler.pending(), 0);
        assert!(!handle.is_running());
        assert_eq!(handle.outcome(), Some(StopReason::Completed));
        assert_eq!(handle.phase(), Phase::Idle);
    }

    #[test]
    fn empty_sequence_rejected_before_scheduling() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let err = animator
            .start(Vec::<String>::new(), &sink, &AnimationConfig::default())
            .unwrap_err();
        assert!(matches!(err, AnimationError::InvalidConfiguration { .. }));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn negative_delay_rejected_before_scheduling() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        assert!(animator.start(["a"], &sink, &config(10, -1, 0)).is_err());
        let reveal = RevealConfig {
            delay_ms: 1,
            start_delay_ms: -3,
        };
        assert!(animator.reveal("a", &sink, &reveal).is_err());
        assert_eq!(scheduler.pending(), 0);
        assert!(values(&sink).is_empty());
    }

    #[test]
    fn stop_is_idempotent() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let handle = animator.start(["abc"], &sink, &config(10, 10, 10)).unwrap();
        scheduler.run_next();
        scheduler.run_next();

        handle.stop();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(handle.outcome(), Some(StopReason::Stopped));
        let state = handle.snapshot();

        handle.stop();
        handle.clone().stop();
        assert_eq!(handle.outcome(), Some(StopReason::Stopped));
        assert_eq!(handle.snapshot(), state);
        assert_eq!(scheduler.advance(ms(1000)), 0);
        assert_eq!(values(&sink), vec!["a", "ab"]);
    }

    #[test]
    fn stop_after_completion_keeps_outcome() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let handle = animator
            .reveal("x", &sink, &RevealConfig::default())
            .unwrap();
        scheduler.run_until_idle(10);
        handle.stop();
        assert_eq!(handle.outcome(), Some(StopReason::Completed));
    }

    /// Ignores cancellation, so a stopped animation's timer still fires.
    #[derive(Clone, Default)]
    struct LateCancelScheduler(ManualScheduler);

    impl Scheduler for LateCancelScheduler {
        fn schedule_after(&self, delay: Duration, task: crate::scheduler::Task) -> TimerId {
            self.0.schedule_after(delay, task)
        }

        fn cancel(&self, _id: TimerId) {}
    }

    #[test]
    fn already_fired_tick_is_ignored_after_stop() {
        let scheduler = LateCancelScheduler::default();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let handle = animator.start(["abc"], &sink, &config(10, 10, 10)).unwrap();
        scheduler.0.run_next();

        handle.stop();
        assert_eq!(scheduler.0.pending(), 1);
        assert!(scheduler.0.run_next());
        assert_eq!(scheduler.0.pending(), 0);
        assert_eq!(values(&sink), vec!["a"]);
        assert_eq!(handle.snapshot().char_index, 1);
    }

    #[test]
    fn dropped_sink_halts_silently() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let handle = animator.start(["abc"], &sink, &config(10, 10, 10)).unwrap();
        scheduler.run_next();
        drop(sink);

        assert!(scheduler.run_next());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(handle.outcome(), Some(StopReason::SinkDetached));
        assert_eq!(handle.phase(), Phase::Idle);
        assert_eq!(handle.snapshot().char_index, 1);
    }

    #[test]
    fn detached_panel_halts_silently() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let panel = Arc::new(Mutex::new(TextPanel::new()));
        let handle = animator.start(["abc"], &panel, &config(10, 10, 10)).unwrap();
        scheduler.run_next();
        lock(&panel).detach();

        scheduler.run_until_idle(10);
        assert_eq!(lock(&panel).text(), "a");
        assert_eq!(handle.outcome(), Some(StopReason::SinkDetached));
        let last = handle.snapshot();
        assert_eq!(last.char_index, 1);
        assert_eq!(last.phase, Phase::Typing);
    }

    #[test]
    fn cycle_limit_completes_after_wrapping() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let cfg = AnimationConfig {
            cycles: Some(2),
            ..config(0, 0, 0)
        };
        let handle = animator.start(["ab", "c"], &sink, &cfg).unwrap();

        // Two passes of 2 * (2 + 1) ticks each.
        assert_eq!(scheduler.run_until_idle(100), 12);
        assert_eq!(handle.outcome(), Some(StopReason::Completed));
        assert_eq!(values(&sink).last().map(String::as_str), Some(""));
    }

    #[test]
    fn zero_cycles_rejected() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let cfg = AnimationConfig {
            cycles: Some(0),
            ..AnimationConfig::default()
        };
        assert!(animator.start(["a"], &sink, &cfg).is_err());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn pushed_values_grow_then_shrink_within_cycle() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let sink = recording();
        let cfg = AnimationConfig {
            cycles: Some(1),
            ..config(1, 1, 1)
        };
        animator.start(["🌐 Network"], &sink, &cfg).unwrap();
        scheduler.run_until_idle(100);

        let lengths: Vec<usize> = values(&sink).iter().map(|v| v.chars().count()).collect();
        let peak = lengths.iter().position(|&n| n == 9).unwrap();
        assert!(lengths[..=peak].windows(2).all(|w| w[1] == w[0] + 1));
        assert!(lengths[peak..].windows(2).all(|w| w[1] + 1 == w[0]));
        assert_eq!(lengths.len(), 18);
    }

    #[test]
    fn independent_animations_share_a_scheduler() {
        let scheduler = ManualScheduler::new();
        let animator = TextAnimator::new(scheduler.clone());
        let header = recording();
        let demo = recording();
        let looping = animator.start(["xy"], &header, &config(10, 10, 10)).unwrap();
        let reveal = animator
            .reveal(
                "$ ok",
                &demo,
                &RevealConfig {
                    delay_ms: 3,
                    start_delay_ms: 0,
                },
            )
            .unwrap();

        scheduler.advance(ms(15));
        assert_eq!(values(&demo), vec!["$", "$ ", "$ o", "$ ok"]);
        assert_eq!(values(&header), vec!["x", "xy"]);
        assert!(!reveal.is_running());

        looping.stop();
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn reveal_on_tokio_timers() {
        let scheduler = TokioScheduler::new(tokio::runtime::Handle::current());
        let animator = TextAnimator::new(scheduler.clone());
        let panel = Arc::new(Mutex::new(TextPanel::new()));
        let handle = animator
            .reveal(
                "abc",
                &panel,
                &RevealConfig {
                    delay_ms: 1,
                    start_delay_ms: 0,
                },
            )
            .unwrap();

        for _ in 0..200 {
            if !handle.is_running() {
                break;
            }
            tokio::time::sleep(ms(5)).await;
        }
        assert_eq!(handle.outcome(), Some(StopReason::Completed));
        assert_eq!(lock(&panel).text(), "abc");
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn stop_on_tokio_timers_cancels_pending_tick() {
        let scheduler = TokioScheduler::new(tokio::runtime::Handle::current());
        let animator = TextAnimator::new(scheduler.clone());
        let panel = Arc::new(Mutex::new(TextPanel::new()));
        let cfg = AnimationConfig {
            start_delay_ms: 30,
            ..config(1, 1, 1)
        };
        let handle = animator.start(["abc"], &panel, &cfg).unwrap();
        handle.stop();

        tokio::time::sleep(ms(80)).await;
        assert_eq!(lock(&panel).revision(), 0);
        assert_eq!(scheduler.pending(), 0);
    }
}
