// LFO (Low Frequency Oscillator) parameters
//
// Pitch modulation applied to every melodic voice.
// Operates at low frequencies (0.1 Hz - 20 Hz)

use super::oscillator::WaveformType;
use serde::{Deserialize, Serialize};

/// LFO parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LfoParams {
    /// LFO frequency in Hz (0.1 to 20.0)
    pub frequency_hz: f32,
    /// Modulation depth (0.0 to 1.0)
    pub intensity: f32,
    /// LFO waveform
    pub waveform: WaveformType,
}

impl LfoParams {
    /// Create LFO parameters with validation
    pub fn new(frequency_hz: f32, intensity: f32, waveform: WaveformType) -> Self {
        let mut params = Self {
            frequency_hz,
            intensity,
            waveform,
        };
        params.validate();
        params
    }

    /// Validate and clamp parameters
    pub fn validate(&mut self) {
        self.frequency_hz = if self.frequency_hz.is_nan() {
            0.1
        } else {
            self.frequency_hz.clamp(0.1, 20.0)
        };
        self.intensity = if self.intensity.is_nan() {
            0.0
        } else {
            self.intensity.clamp(0.0, 1.0)
        };
    }

    /// Whether this LFO modulates anything at all
    pub fn is_active(&self) -> bool {
        self.intensity > 0.0
    }

    /// Apply a single-field update, clamping the result
    pub fn set_field(&mut self, field: LfoField) {
        match field {
            LfoField::FrequencyHz(value) => self.frequency_hz = value,
            LfoField::Intensity(value) => self.intensity = value,
            LfoField::Waveform(waveform) => self.waveform = waveform,
        }
        self.validate();
    }
}

impl Default for LfoParams {
    fn default() -> Self {
        Self {
            frequency_hz: 5.0,
            intensity: 0.0, // no vibrato until asked for
            waveform: WaveformType::Sine,
        }
    }
}

/// Single-field LFO update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum LfoField {
    FrequencyHz(f32),
    Intensity(f32),
    Waveform(WaveformType),
}
