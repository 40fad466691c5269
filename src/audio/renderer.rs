// Sound renderer boundary
// The engine hands fully-specified trigger descriptors to a renderer that
// performs the synthesis. Start/stop are absolute audio-clock seconds.

use crate::audio::clock::{AudioClock, ManualClock};
use crate::sequencer::pattern::DrumInstrument;
use crate::synth::delay::DelayParams;
use crate::synth::envelope::AdsrParams;
use crate::synth::lfo::LfoParams;
use crate::synth::oscillator::WaveformType;
use thiserror::Error;

/// Renderer-related errors
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("No output device available")]
    NoDevice,

    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RendererResult<T> = Result<T, RendererError>;

/// What kind of voice a trigger starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Melodic { waveform: WaveformType },
    Percussive { instrument: DrumInstrument },
}

/// One sound event, fully specified
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerDescriptor {
    pub kind: TriggerKind,
    /// Step this trigger was emitted for
    pub step: u64,
    /// Absolute audio-clock start time in seconds
    pub start_seconds: f64,
    /// Absolute audio-clock stop time in seconds
    pub stop_seconds: f64,
    /// Peak gain (0.0 to 1.0)
    pub gain: f32,
    /// Resolved pitch in Hz
    pub frequency: f32,
    pub envelope: AdsrParams,
    /// Pitch modulation, absent when the LFO is idle
    pub modulation: Option<LfoParams>,
    /// Feedback delay, absent when inactive
    pub delay: Option<DelayParams>,
}

impl TriggerDescriptor {
    pub fn is_melodic(&self) -> bool {
        matches!(self.kind, TriggerKind::Melodic { .. })
    }

    pub fn is_percussive(&self) -> bool {
        matches!(self.kind, TriggerKind::Percussive { .. })
    }

    pub fn duration_seconds(&self) -> f64 {
        self.stop_seconds - self.start_seconds
    }
}

/// Fixed voicing of a percussion instrument
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercussionProfile {
    pub duration_seconds: f64,
    pub frequency: f32,
    pub gain: f32,
    pub envelope: AdsrParams,
}

impl PercussionProfile {
    pub fn for_instrument(instrument: DrumInstrument) -> Self {
        match instrument {
            DrumInstrument::Kick => Self {
                duration_seconds: 0.5,
                frequency: 150.0,
                gain: 1.0,
                envelope: AdsrParams::new(0.001, 0.45, 0.0, 0.05),
            },
            DrumInstrument::Snare => Self {
                duration_seconds: 0.2,
                frequency: 180.0,
                gain: 0.7,
                envelope: AdsrParams::new(0.001, 0.18, 0.0, 0.02),
            },
            DrumInstrument::Hihat => Self {
                duration_seconds: 0.05,
                frequency: 8000.0,
                gain: 0.3,
                envelope: AdsrParams::new(0.001, 0.04, 0.0, 0.01),
            },
        }
    }
}

/// Anything that can turn trigger descriptors into sound
pub trait SoundRenderer: AudioClock {
    fn trigger(&mut self, trigger: &TriggerDescriptor);
}

/// Lazily produces the renderer on first `play`
pub trait RendererFactory {
    type Output: SoundRenderer;

    fn create(&mut self) -> RendererResult<Self::Output>;
}

impl<F, R> RendererFactory for F
where
    F: FnMut() -> RendererResult<R>,
    R: SoundRenderer,
{
    type Output = R;

    fn create(&mut self) -> RendererResult<R> {
        self()
    }
}

/// Renderer that records every trigger instead of playing it
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    clock: ManualClock,
    triggers: Vec<TriggerDescriptor>,
}

impl RecordingRenderer {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            triggers: Vec::new(),
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn triggers(&self) -> &[TriggerDescriptor] {
        &self.triggers
    }

    /// Distinct steps in emission order
    pub fn steps(&self) -> Vec<u64> {
        let mut steps: Vec<u64> = self.triggers.iter().map(|t| t.step).collect();
        steps.dedup();
        steps
    }

    pub fn clear(&mut self) {
        self.triggers.clear();
    }
}

impl AudioClock for RecordingRenderer {
    fn now_seconds(&self) -> f64 {
        self.clock.now_seconds()
    }
}

impl SoundRenderer for RecordingRenderer {
    fn trigger(&mut self, trigger: &TriggerDescriptor) {
        self.triggers.push(trigger.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percussion_profiles_differ() {
        let kick = PercussionProfile::for_instrument(DrumInstrument::Kick);
        let hihat = PercussionProfile::for_instrument(DrumInstrument::Hihat);
        assert!(kick.duration_seconds > hihat.duration_seconds);
        assert!(kick.frequency < hihat.frequency);
    }

    #[test]
    fn test_closure_factory() {
        let clock = ManualClock::new();
        let mut factory =
            move || -> RendererResult<RecordingRenderer> { Ok(RecordingRenderer::new(clock.clone())) };
        let renderer = factory.create().unwrap();
        assert!(renderer.triggers().is_empty());
    }

    #[test]
    fn test_failing_factory() {
        let mut factory = || -> RendererResult<RecordingRenderer> { Err(RendererError::NoDevice) };
        assert!(matches!(factory.create(), Err(RendererError::NoDevice)));
    }

    #[test]
    fn test_recording_renderer_steps() {
        let mut renderer = RecordingRenderer::default();
        let trigger = TriggerDescriptor {
            kind: TriggerKind::Percussive {
                instrument: DrumInstrument::Kick,
            },
            step: 0,
            start_seconds: 0.0,
            stop_seconds: 0.5,
            gain: 1.0,
            frequency: 150.0,
            envelope: AdsrParams::default(),
            modulation: None,
            delay: None,
        };
        renderer.trigger(&trigger);
        renderer.trigger(&trigger);
        renderer.trigger(&TriggerDescriptor { step: 1, ..trigger.clone() });

        assert_eq!(renderer.steps(), vec![0, 1]);
        assert!(renderer.triggers()[0].is_percussive());
        assert_eq!(renderer.triggers()[0].duration_seconds(), 0.5);
    }
}
