// Step scheduler - Lookahead polling loop
//
// The poll cadence (coarse, timer driven, jittery) is decoupled from the
// commit cadence (step boundaries on the audio clock). Each poll emits every
// step whose due time falls before now + lookahead, so a late timer catches
// up instead of skipping or drifting.

use super::resolver::{ResolvedStep, resolve};
use super::transport::Transport;
use crate::audio::renderer::{PercussionProfile, SoundRenderer, TriggerDescriptor, TriggerKind};
use crate::config::EngineConfig;
use crate::state::ParameterState;

/// Receives one callback per emitted step, for UI highlighting
pub trait StepSink {
    fn step_advanced(&mut self, step: u64);
}

impl<F: FnMut(u64)> StepSink for F {
    fn step_advanced(&mut self, step: u64) {
        self(step)
    }
}

impl StepSink for Vec<u64> {
    fn step_advanced(&mut self, step: u64) {
        self.push(step);
    }
}

/// Turns due steps into trigger descriptors
#[derive(Debug, Clone)]
pub struct StepScheduler {
    lookahead_seconds: f64,
    voice_duration_seconds: f64,
    voice_gain: f32,
}

impl StepScheduler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            lookahead_seconds: config.lookahead_ms / 1000.0,
            voice_duration_seconds: config.voice_duration_s,
            voice_gain: config.voice_gain,
        }
    }

    /// Run one poll iteration. Returns the number of steps emitted.
    pub fn poll<R>(
        &self,
        transport: &mut Transport,
        state: &ParameterState,
        renderer: &mut R,
        sink: &mut dyn StepSink,
    ) -> usize
    where
        R: SoundRenderer + ?Sized,
    {
        transport.retune(state.tempo.step_duration_seconds());

        let horizon = renderer.now_seconds() + self.lookahead_seconds;
        let mut emitted = 0;

        while let Some(start) = transport.next_due_seconds() {
            if start >= horizon {
                break;
            }
            let resolved = resolve(state, transport.current_step());
            for trigger in self.triggers_for(state, &resolved, start) {
                renderer.trigger(&trigger);
            }
            sink.step_advanced(resolved.step);
            transport.advance();
            emitted += 1;
        }

        if emitted > 1 {
            log::debug!("Poll caught up {emitted} steps");
        }
        emitted
    }

    /// Build every trigger for a resolved step starting at `start_seconds`
    pub fn triggers_for(
        &self,
        state: &ParameterState,
        resolved: &ResolvedStep,
        start_seconds: f64,
    ) -> Vec<TriggerDescriptor> {
        let modulation = state.lfo.is_active().then_some(state.lfo);
        let delay = state.delay.is_active().then_some(state.delay);

        let melodic = resolved.notes.iter().map(|note| TriggerDescriptor {
            kind: TriggerKind::Melodic {
                waveform: note.waveform,
            },
            step: resolved.step,
            start_seconds,
            stop_seconds: start_seconds + self.voice_duration_seconds,
            gain: self.voice_gain,
            frequency: note.frequency,
            envelope: state.envelope,
            modulation,
            delay,
        });

        let percussive = resolved.drum_hits.iter().map(|&instrument| {
            let profile = PercussionProfile::for_instrument(instrument);
            TriggerDescriptor {
                kind: TriggerKind::Percussive { instrument },
                step: resolved.step,
                start_seconds,
                stop_seconds: start_seconds + profile.duration_seconds,
                gain: profile.gain,
                frequency: profile.frequency,
                envelope: profile.envelope,
                modulation: None,
                delay,
            }
        });

        melodic.chain(percussive).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::clock::ManualClock;
    use crate::audio::renderer::RecordingRenderer;
    use crate::sequencer::pattern::DrumInstrument;
    use crate::synth::delay::DelayField;
    use crate::synth::lfo::LfoField;

    fn setup() -> (StepScheduler, Transport, ParameterState, RecordingRenderer) {
        let scheduler = StepScheduler::new(&EngineConfig::default());
        let transport = Transport::new();
        let mut state = ParameterState::new();
        state.replace_melody(vec![vec![220.0]]);
        state.clear_drums();
        let renderer = RecordingRenderer::new(ManualClock::new());
        (scheduler, transport, state, renderer)
    }

    #[test]
    fn test_poll_when_stopped_emits_nothing() {
        let (scheduler, mut transport, state, mut renderer) = setup();
        let mut steps = Vec::new();
        assert_eq!(scheduler.poll(&mut transport, &state, &mut renderer, &mut steps), 0);
        assert!(renderer.triggers().is_empty());
    }

    #[test]
    fn test_first_poll_emits_lookahead_window() {
        let (scheduler, mut transport, state, mut renderer) = setup();
        let mut steps = Vec::new();
        transport.play(0.0, state.tempo.step_duration_seconds());

        // 250ms steps, 75ms lookahead: only step 0 is due
        assert_eq!(scheduler.poll(&mut transport, &state, &mut renderer, &mut steps), 1);
        assert_eq!(steps, vec![0]);

        let trigger = &renderer.triggers()[0];
        assert_eq!(trigger.start_seconds, 0.0);
        assert!((trigger.stop_seconds - 0.2).abs() < 1e-9);
        assert_eq!(trigger.gain, 0.8);
    }

    #[test]
    fn test_late_poll_catches_up_in_order() {
        let (scheduler, mut transport, state, mut renderer) = setup();
        let mut steps = Vec::new();
        transport.play(0.0, state.tempo.step_duration_seconds());
        scheduler.poll(&mut transport, &state, &mut renderer, &mut steps);

        // Timer fired a full second late
        renderer.clock().advance_ms(1000.0);
        scheduler.poll(&mut transport, &state, &mut renderer, &mut steps);
        assert_eq!(steps, vec![0, 1, 2, 3, 4]);

        let starts: Vec<f64> = renderer.triggers().iter().map(|t| t.start_seconds).collect();
        assert_eq!(starts, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_snapshot_of_modulation_and_delay() {
        let (scheduler, mut transport, mut state, mut renderer) = setup();
        let mut steps = Vec::new();
        state.set_lfo(LfoField::Intensity(0.4));
        state.set_delay(DelayField::Feedback(0.5));
        state.toggle_drum(DrumInstrument::Snare, 0).unwrap();
        transport.play(0.0, state.tempo.step_duration_seconds());
        scheduler.poll(&mut transport, &state, &mut renderer, &mut steps);

        let triggers = renderer.triggers();
        assert_eq!(triggers.len(), 2);
        assert!(triggers[0].is_melodic());
        assert_eq!(triggers[0].modulation.map(|lfo| lfo.intensity), Some(0.4));
        assert_eq!(triggers[0].delay.map(|d| d.feedback), Some(0.5));

        assert_eq!(
            triggers[1].kind,
            TriggerKind::Percussive {
                instrument: DrumInstrument::Snare
            }
        );
        assert!(triggers[1].modulation.is_none());
        assert!(triggers[1].delay.is_some());
        assert!((triggers[1].duration_seconds() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_closure_sink() {
        let (scheduler, mut transport, state, mut renderer) = setup();
        let mut seen = 0u64;
        let mut sink = |step: u64| seen += step + 1;
        transport.play(0.0, state.tempo.step_duration_seconds());
        renderer.clock().advance_ms(300.0);
        scheduler.poll(&mut transport, &state, &mut renderer, &mut sink);
        // steps 0 and 1
        assert_eq!(seen, 3);
    }
}
