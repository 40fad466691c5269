// Transport - Play/pause/reset state and step position
// Owns the step counter, the pending poll continuation and the timeline anchor

use super::timer::TimerHandle;

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl TransportState {
    pub fn is_playing(&self) -> bool {
        matches!(self, TransportState::Playing)
    }
}

/// Audio-clock time at which a given step is due, for a given step length
///
/// Due times are computed by multiplication from the anchor rather than
/// accumulated, so they never drift.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StepAnchor {
    step: u64,
    time_seconds: f64,
    step_seconds: f64,
}

impl StepAnchor {
    fn due_seconds(&self, step: u64) -> f64 {
        self.time_seconds + step.saturating_sub(self.step) as f64 * self.step_seconds
    }
}

/// Transport controller
///
/// Pure state: the engine performs the timer cancellations this hands back.
#[derive(Debug, Default)]
pub struct Transport {
    state: TransportState,
    current_step: u64,
    pending_timer: Option<TimerHandle>,
    anchor: Option<StepAnchor>,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Next step to be emitted
    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.pending_timer
    }

    /// Start or resume playback with the next step due at `now_seconds`.
    ///
    /// Returns false (and changes nothing) if already playing.
    pub fn play(&mut self, now_seconds: f64, step_seconds: f64) -> bool {
        if self.state.is_playing() {
            return false;
        }
        self.anchor = Some(StepAnchor {
            step: self.current_step,
            time_seconds: now_seconds,
            step_seconds,
        });
        self.state = TransportState::Playing;
        true
    }

    /// Pause, keeping the position. Returns the continuation to cancel.
    pub fn pause(&mut self) -> Option<TimerHandle> {
        if !self.state.is_playing() {
            return None;
        }
        self.state = TransportState::Paused;
        self.anchor = None;
        self.pending_timer.take()
    }

    /// Stop and rewind to step 0. Returns the continuation to cancel.
    pub fn reset(&mut self) -> Option<TimerHandle> {
        self.state = TransportState::Stopped;
        self.current_step = 0;
        self.anchor = None;
        self.pending_timer.take()
    }

    /// Record the single outstanding poll continuation
    pub fn arm(&mut self, handle: TimerHandle) -> Option<TimerHandle> {
        self.pending_timer.replace(handle)
    }

    /// Consume `handle` if it is the live continuation.
    ///
    /// Returns false for any superseded or cancelled handle; such a timer
    /// must not run a poll iteration, whatever the current state is.
    pub fn claim(&mut self, handle: TimerHandle) -> bool {
        if self.pending_timer == Some(handle) {
            self.pending_timer = None;
            true
        } else {
            false
        }
    }

    /// Follow a tempo change: steps not yet emitted use the new step length,
    /// starting from where the next step was due under the old one.
    pub fn retune(&mut self, step_seconds: f64) {
        if let Some(anchor) = self.anchor {
            if anchor.step_seconds != step_seconds {
                self.anchor = Some(StepAnchor {
                    step: self.current_step,
                    time_seconds: anchor.due_seconds(self.current_step),
                    step_seconds,
                });
            }
        }
    }

    /// Audio-clock time at which `current_step` is due, if playing
    pub fn next_due_seconds(&self) -> Option<f64> {
        self.anchor
            .filter(|_| self.state.is_playing())
            .map(|anchor| anchor.due_seconds(self.current_step))
    }

    /// Mark the current step as emitted and move to the next one
    pub fn advance(&mut self) -> u64 {
        let emitted = self.current_step;
        self.current_step += 1;
        emitted
    }
}
