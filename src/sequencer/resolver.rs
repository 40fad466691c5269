// Pattern resolver - Which notes and drum hits are due on a given step
// Pure function of (ParameterState, step); no side effects

use crate::sequencer::pattern::DrumInstrument;
use crate::state::ParameterState;
use crate::synth::oscillator::WaveformType;

/// A melodic note after oscillator shaping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedNote {
    /// Frequency as written in the melody
    pub base_frequency: f32,
    /// Frequency after octave shift and detune
    pub frequency: f32,
    pub waveform: WaveformType,
}

/// Everything due on one step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedStep {
    pub step: u64,
    pub notes: Vec<ResolvedNote>,
    pub drum_hits: Vec<DrumInstrument>,
}

impl ResolvedStep {
    pub fn is_silent(&self) -> bool {
        self.notes.is_empty() && self.drum_hits.is_empty()
    }
}

/// Resolve the notes and drum hits due on `step`.
///
/// A note whose shaped frequency is not a finite positive value (full negative
/// detune, or overflow of a huge base frequency) is dropped with a warning.
pub fn resolve(state: &ParameterState, step: u64) -> ResolvedStep {
    let oscillator = &state.oscillator;

    let notes = state
        .melody
        .chord_at(step)
        .iter()
        .filter_map(|&base_frequency| {
            let frequency = oscillator.apply(base_frequency);
            if !(frequency.is_finite() && frequency > 0.0) {
                log::warn!(
                    "Step {step}: {base_frequency} Hz shapes to {frequency} Hz, note dropped"
                );
                return None;
            }
            Some(ResolvedNote {
                base_frequency,
                frequency,
                waveform: oscillator.waveform,
            })
        })
        .collect();

    ResolvedStep {
        step,
        notes,
        drum_hits: state.drums.hits_at(step).collect(),
    }
}
