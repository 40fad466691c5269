// Engine - Owns the parameter state, the transport and the poll loop
//
// Single-threaded and cooperative: every call runs to completion and never
// blocks. The poll loop suspends by scheduling a one-shot continuation on the
// engine's timer queue; a host loop resumes it through `tick`.

use crate::audio::clock::AudioClock;
use crate::audio::renderer::{RendererError, RendererFactory};
use crate::config::{ConfigError, EngineConfig};
use crate::messaging::channels::{CommandConsumer, NotificationProducer};
use crate::messaging::command::{EngineCommand, ParameterUpdate, TransportCommand};
use crate::messaging::notification::{Notification, NotificationCategory, NotificationLevel};
use crate::sequencer::scheduler::{StepScheduler, StepSink};
use crate::sequencer::timer::{TimerHandle, TimerQueue};
use crate::sequencer::transport::{Transport, TransportState};
use crate::state::{ParameterError, ParameterState};
use ringbuf::traits::{Consumer, Producer};

/// Engine error types
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Renderer unavailable: {0}")]
    Renderer(#[from] RendererError),

    #[error("Rejected {group} update: {source}")]
    Parameter {
        group: &'static str,
        #[source]
        source: ParameterError,
    },

    #[error("Malformed parameter update: {0}")]
    MalformedUpdate(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Step-sequenced music engine
pub struct Engine<F: RendererFactory> {
    config: EngineConfig,
    state: ParameterState,
    transport: Transport,
    scheduler: StepScheduler,
    timers: TimerQueue,
    factory: F,
    renderer: Option<F::Output>,
    step_sink: Option<Box<dyn StepSink>>,
    notifications: Option<NotificationProducer>,
}

impl<F: RendererFactory> Engine<F> {
    /// Create an engine; the renderer is only acquired on the first `play`
    pub fn new(config: EngineConfig, factory: F) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            scheduler: StepScheduler::new(&config),
            config,
            state: ParameterState::new(),
            transport: Transport::new(),
            timers: TimerQueue::new(),
            factory,
            renderer: None,
            step_sink: None,
            notifications: None,
        })
    }

    /// Attach the step-advance callback
    pub fn with_step_sink(mut self, sink: impl StepSink + 'static) -> Self {
        self.step_sink = Some(Box::new(sink));
        self
    }

    /// Attach the diagnostic channel
    pub fn with_notifications(mut self, producer: NotificationProducer) -> Self {
        self.notifications = Some(producer);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn params(&self) -> &ParameterState {
        &self.state
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport.state()
    }

    /// Next step to be emitted
    pub fn current_step(&self) -> u64 {
        self.transport.current_step()
    }

    /// The live poll continuation, if any
    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.transport.pending_timer()
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn renderer(&self) -> Option<&F::Output> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut F::Output> {
        self.renderer.as_mut()
    }

    /// Execute a transport command
    pub fn handle(&mut self, command: TransportCommand) -> EngineResult<()> {
        match command {
            TransportCommand::Play => self.play(),
            TransportCommand::Pause => {
                self.pause();
                Ok(())
            }
            TransportCommand::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Start or resume playback. A no-op while already playing.
    pub fn play(&mut self) -> EngineResult<()> {
        if self.transport.state().is_playing() {
            log::debug!("Play ignored: already playing");
            return Ok(());
        }

        self.ensure_renderer()?;
        let now = match self.renderer.as_ref() {
            Some(renderer) => renderer.now_seconds(),
            None => return Ok(()),
        };

        self.transport
            .play(now, self.state.tempo.step_duration_seconds());
        let message = format!(
            "Playing from step {} at {} ({:.0} ms per step)",
            self.transport.current_step(),
            self.state.tempo,
            self.state.tempo.step_duration_ms()
        );
        self.report(NotificationLevel::Info, NotificationCategory::Transport, message);
        self.poll_and_reschedule();
        Ok(())
    }

    /// Pause, keeping the position. Safe in any state.
    pub fn pause(&mut self) {
        if !self.transport.state().is_playing() {
            return;
        }
        if let Some(handle) = self.transport.pause() {
            self.timers.cancel(handle);
        }
        let message = format!("Paused at step {}", self.transport.current_step());
        self.report(NotificationLevel::Info, NotificationCategory::Transport, message);
    }

    /// Stop and rewind to step 0. Safe in any state.
    pub fn reset(&mut self) {
        if let Some(handle) = self.transport.reset() {
            self.timers.cancel(handle);
        }
        self.report(
            NotificationLevel::Info,
            NotificationCategory::Transport,
            "Transport reset".to_string(),
        );
    }

    /// Run the poll iteration belonging to `handle`.
    ///
    /// Only the transport's live continuation may run; a handle from a
    /// paused or reset session is ignored even if the transport is playing
    /// again. Returns the number of steps emitted.
    pub fn on_timer(&mut self, handle: TimerHandle) -> usize {
        if !self.transport.claim(handle) {
            log::debug!("Ignoring stale {handle}");
            return 0;
        }
        self.poll_and_reschedule()
    }

    /// Advance host time and fire every due continuation
    pub fn tick(&mut self, host_now_ms: f64) -> usize {
        self.timers
            .advance_to(host_now_ms)
            .into_iter()
            .map(|handle| self.on_timer(handle))
            .sum()
    }

    /// Host time at which `tick` next has work to do
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.timers.next_deadline()
    }

    /// Apply a parameter update; rejected updates are reported and dropped
    pub fn apply(&mut self, update: ParameterUpdate) -> EngineResult<()> {
        let group = update.group();
        if let Err(source) = self.state.apply(update) {
            let err = EngineError::Parameter { group, source };
            self.report(
                NotificationLevel::Warning,
                NotificationCategory::Parameter,
                err.to_string(),
            );
            return Err(err);
        }
        Ok(())
    }

    /// Decode and apply a wire-format update; malformed ones are reported and dropped
    pub fn apply_json(&mut self, json: &str) -> EngineResult<()> {
        match ParameterUpdate::from_json(json) {
            Ok(update) => self.apply(update),
            Err(e) => {
                let err = EngineError::from(e);
                self.report(
                    NotificationLevel::Warning,
                    NotificationCategory::Parameter,
                    err.to_string(),
                );
                Err(err)
            }
        }
    }

    /// Execute one queued command
    pub fn execute(&mut self, command: EngineCommand) -> EngineResult<()> {
        match command {
            EngineCommand::Transport(command) => self.handle(command),
            EngineCommand::Update(update) => self.apply(update),
        }
    }

    /// Execute every queued command without blocking. Returns how many were processed.
    pub fn drain_commands(&mut self, commands: &mut CommandConsumer) -> usize {
        let mut processed = 0;
        while let Some(command) = commands.try_pop() {
            // Failures are already reported; keep draining
            let _ = self.execute(command);
            processed += 1;
        }
        processed
    }

    fn ensure_renderer(&mut self) -> EngineResult<()> {
        if self.renderer.is_some() {
            return Ok(());
        }
        match self.factory.create() {
            Ok(renderer) => {
                log::info!("Renderer acquired");
                self.renderer = Some(renderer);
                Ok(())
            }
            Err(e) => {
                self.report(
                    NotificationLevel::Error,
                    NotificationCategory::Renderer,
                    format!("Failed to acquire renderer: {e}"),
                );
                Err(e.into())
            }
        }
    }

    fn poll_and_reschedule(&mut self) -> usize {
        let Some(renderer) = self.renderer.as_mut() else {
            return 0;
        };

        let mut discard = |_: u64| {};
        let sink: &mut dyn StepSink = match self.step_sink.as_deref_mut() {
            Some(sink) => sink,
            None => &mut discard,
        };

        let emitted = self
            .scheduler
            .poll(&mut self.transport, &self.state, renderer, sink);

        if self.transport.state().is_playing() {
            let handle = self.timers.schedule(self.config.poll_interval_ms);
            if let Some(previous) = self.transport.arm(handle) {
                self.timers.cancel(previous);
            }
        }
        emitted
    }

    fn report(
        &mut self,
        level: NotificationLevel,
        category: NotificationCategory,
        message: String,
    ) {
        match level {
            NotificationLevel::Info => log::info!("{message}"),
            NotificationLevel::Warning => log::warn!("{message}"),
            NotificationLevel::Error => log::error!("{message}"),
        }
        let step = self.transport.current_step();
        if let Some(producer) = self.notifications.as_mut() {
            if producer
                .try_push(Notification::new(level, category, message, step))
                .is_err()
            {
                log::warn!("Notification channel full, diagnostic dropped");
            }
        }
    }
}
