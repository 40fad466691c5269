// Oscillator - Waveform selection and per-voice pitch shaping
// Applied on top of each melody frequency before a trigger is handed to the renderer

use serde::{Deserialize, Serialize};

/// Waveform of a melodic voice or of the LFO
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveformType {
    #[default]
    Sine,
    Square,
    Saw,
    Triangle,
}

/// Oscillator tuning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OscillatorParams {
    /// Voice waveform
    pub waveform: WaveformType,
    /// Coarse detune as a ratio offset (-1.0 to 1.0)
    pub coarse_detune: f32,
    /// Fine detune (-100.0 to 100.0), contributes `fine / 100` to the ratio
    pub fine_detune_cents: f32,
    /// Octave shift (-4 to 4)
    pub octave_shift: i32,
}

impl OscillatorParams {
    pub const MAX_OCTAVE_SHIFT: i32 = 4;

    /// Create oscillator parameters with validation
    pub fn new(
        waveform: WaveformType,
        coarse_detune: f32,
        fine_detune_cents: f32,
        octave_shift: i32,
    ) -> Self {
        let mut params = Self {
            waveform,
            coarse_detune,
            fine_detune_cents,
            octave_shift,
        };
        params.validate();
        params
    }

    /// Validate and clamp parameters
    pub fn validate(&mut self) {
        self.coarse_detune = sanitize(self.coarse_detune).clamp(-1.0, 1.0);
        self.fine_detune_cents = sanitize(self.fine_detune_cents).clamp(-100.0, 100.0);
        self.octave_shift = self
            .octave_shift
            .clamp(-Self::MAX_OCTAVE_SHIFT, Self::MAX_OCTAVE_SHIFT);
    }

    /// Frequency ratio contributed by the detune controls
    pub fn detune_ratio(&self) -> f32 {
        1.0 + self.coarse_detune + self.fine_detune_cents / 100.0
    }

    /// Resolve a base frequency: octave shift first, then coarse/fine detune
    pub fn apply(&self, base_frequency: f32) -> f32 {
        base_frequency * 2f32.powi(self.octave_shift) * self.detune_ratio()
    }
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            waveform: WaveformType::Sine,
            coarse_detune: 0.0,
            fine_detune_cents: 0.0,
            octave_shift: 0,
        }
    }
}

/// Single-field oscillator update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum OscillatorField {
    Waveform(WaveformType),
    CoarseDetune(f32),
    FineDetuneCents(f32),
    OctaveShift(i32),
}

impl OscillatorParams {
    /// Apply a single-field update, clamping the result
    pub fn set_field(&mut self, field: OscillatorField) {
        match field {
            OscillatorField::Waveform(waveform) => self.waveform = waveform,
            OscillatorField::CoarseDetune(value) => self.coarse_detune = value,
            OscillatorField::FineDetuneCents(value) => self.fine_detune_cents = value,
            OscillatorField::OctaveShift(value) => self.octave_shift = value,
        }
        self.validate();
    }
}

// NaN would survive clamp(); treat it as "no offset"
fn sanitize(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}
