// ParameterState - Centralized mutable synthesis and sequencing parameters
//
// Owned by the engine and mutated only through the update operations below.
// The scheduler reads it fresh on every poll iteration, so an update is
// visible to the very next step that has not been emitted yet.

use crate::messaging::command::ParameterUpdate;
use crate::sequencer::pattern::{Chord, DrumInstrument, DrumLane, DrumPatterns, Melody};
use crate::sequencer::timeline::Tempo;
use crate::synth::delay::{DelayField, DelayParams};
use crate::synth::envelope::{AdsrParams, EnvelopeField};
use crate::synth::lfo::{LfoField, LfoParams};
use crate::synth::oscillator::{OscillatorField, OscillatorParams, WaveformType};

/// Parameter update rejected at the store boundary
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("Invalid tempo: {0} BPM")]
    InvalidTempo(f64),

    #[error("Drum step {index} is outside the {instrument} lane")]
    StepOutOfRange {
        instrument: DrumInstrument,
        index: usize,
    },
}

/// All parameters a trigger can be built from
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterState {
    pub tempo: Tempo,
    pub melody: Melody,
    pub drums: DrumPatterns,
    pub envelope: AdsrParams,
    pub lfo: LfoParams,
    pub oscillator: OscillatorParams,
    pub delay: DelayParams,
}

impl ParameterState {
    /// Create a new ParameterState with default values
    pub fn new() -> Self {
        Self {
            tempo: Tempo::default(),
            melody: Melody::default_progression(),
            drums: DrumPatterns::basic_beat(),
            envelope: AdsrParams::default(),
            lfo: LfoParams::default(),
            oscillator: OscillatorParams::default(),
            delay: DelayParams::default(),
        }
    }

    /// Apply one update message
    pub fn apply(&mut self, update: ParameterUpdate) -> Result<(), ParameterError> {
        match update {
            ParameterUpdate::Tempo(bpm) => self.set_tempo(bpm),
            ParameterUpdate::Melody(chords) => {
                self.replace_melody(chords);
                Ok(())
            }
            ParameterUpdate::DrumToggle { instrument, step } => {
                self.toggle_drum(instrument, step).map(|_| ())
            }
            ParameterUpdate::Waveform(waveform) => {
                self.set_waveform(waveform);
                Ok(())
            }
            ParameterUpdate::Envelope(field) => {
                self.set_envelope(field);
                Ok(())
            }
            ParameterUpdate::Lfo(field) => {
                self.set_lfo(field);
                Ok(())
            }
            ParameterUpdate::Oscillator(field) => {
                self.set_oscillator(field);
                Ok(())
            }
            ParameterUpdate::Delay(field) => {
                self.set_delay(field);
                Ok(())
            }
        }
    }

    /// Set the tempo; the previous tempo stays in force on error
    pub fn set_tempo(&mut self, bpm: f64) -> Result<(), ParameterError> {
        let tempo = Tempo::new(bpm).ok_or(ParameterError::InvalidTempo(bpm))?;
        if tempo.bpm() != bpm {
            log::warn!("Tempo {bpm} BPM clamped to {}", tempo);
        }
        self.tempo = tempo;
        Ok(())
    }

    /// Replace the whole melody. Returns the number of frequencies dropped.
    pub fn replace_melody(&mut self, chords: Vec<Chord>) -> usize {
        let (melody, dropped) = Melody::new(chords);
        if dropped > 0 {
            log::warn!("Dropped {dropped} invalid frequencies from melody");
        }
        self.melody = melody;
        dropped
    }

    /// Flip one drum cell. Returns the new cell value.
    pub fn toggle_drum(
        &mut self,
        instrument: DrumInstrument,
        index: usize,
    ) -> Result<bool, ParameterError> {
        self.drums
            .toggle(instrument, index)
            .ok_or(ParameterError::StepOutOfRange { instrument, index })
    }

    /// Replace one drum lane
    pub fn replace_drum_lane(&mut self, instrument: DrumInstrument, lane: DrumLane) {
        self.drums.set_lane(instrument, lane);
    }

    /// Silence the whole drum grid
    pub fn clear_drums(&mut self) {
        self.drums.clear();
    }

    pub fn set_waveform(&mut self, waveform: WaveformType) {
        self.oscillator.waveform = waveform;
    }

    pub fn set_envelope(&mut self, field: EnvelopeField) {
        self.envelope.set_field(field);
    }

    pub fn set_lfo(&mut self, field: LfoField) {
        self.lfo.set_field(field);
    }

    pub fn set_oscillator(&mut self, field: OscillatorField) {
        self.oscillator.set_field(field);
    }

    pub fn set_delay(&mut self, field: DelayField) {
        self.delay.set_field(field);
    }
}

impl Default for ParameterState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = ParameterState::new();
        assert_eq!(state.tempo.bpm(), 240.0);
        assert_eq!(state.melody.len(), 8);
        assert_eq!(state.oscillator.waveform, WaveformType::Sine);
        assert!(!state.delay.is_active());
    }

    #[test]
    fn test_invalid_tempo_keeps_previous() {
        let mut state = ParameterState::new();
        state.apply(ParameterUpdate::Tempo(120.0)).unwrap();

        let err = state.apply(ParameterUpdate::Tempo(-5.0)).unwrap_err();
        assert_eq!(err, ParameterError::InvalidTempo(-5.0));
        assert_eq!(state.tempo.bpm(), 120.0);
    }

    #[test]
    fn test_drum_toggle_via_update() {
        let mut state = ParameterState::new();
        state.clear_drums();
        state
            .apply(ParameterUpdate::DrumToggle {
                instrument: DrumInstrument::Kick,
                step: 3,
            })
            .unwrap();
        assert!(state.drums.is_set(DrumInstrument::Kick, 3));

        let err = state
            .apply(ParameterUpdate::DrumToggle {
                instrument: DrumInstrument::Kick,
                step: 16,
            })
            .unwrap_err();
        assert!(matches!(err, ParameterError::StepOutOfRange { index: 16, .. }));
    }

    #[test]
    fn test_waveform_group_sets_oscillator() {
        let mut state = ParameterState::new();
        state
            .apply(ParameterUpdate::Waveform(WaveformType::Square))
            .unwrap();
        assert_eq!(state.oscillator.waveform, WaveformType::Square);
    }

    #[test]
    fn test_delay_feedback_clamped() {
        let mut state = ParameterState::new();
        state
            .apply(ParameterUpdate::Delay(DelayField::Feedback(3.0)))
            .unwrap();
        assert_eq!(state.delay.feedback, 0.99);
    }

    #[test]
    fn test_replace_melody_reports_dropped() {
        let mut state = ParameterState::new();
        let dropped = state.replace_melody(vec![vec![110.0, f32::NAN]]);
        assert_eq!(dropped, 1);
        assert_eq!(state.melody.chords(), &[vec![110.0f32]]);
    }

    #[test]
    fn test_replace_drum_lane() {
        let mut state = ParameterState::new();
        state.replace_drum_lane(DrumInstrument::Hihat, [true; 16]);
        assert!((0..16).all(|i| state.drums.is_set(DrumInstrument::Hihat, i)));
    }
}
