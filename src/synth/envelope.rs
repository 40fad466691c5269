// ADSR Envelope parameters
//
// Attack-Decay-Sustain-Release coefficients snapshotted into every melodic trigger.
// The renderer owns the actual envelope generator.

use serde::{Deserialize, Serialize};

/// ADSR Envelope parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdsrParams {
    /// Attack time in seconds (0.001 to 5.0)
    pub attack: f32,
    /// Decay time in seconds (0.001 to 5.0)
    pub decay: f32,
    /// Sustain level (0.0 to 1.0)
    pub sustain: f32,
    /// Release time in seconds (0.001 to 5.0)
    pub release: f32,
}

impl AdsrParams {
    /// Create ADSR parameters with validation
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: clamp_time(attack),
            decay: clamp_time(decay),
            sustain: clamp_level(sustain),
            release: clamp_time(release),
        }
    }

    /// Apply a single-field update, clamping the value
    pub fn set_field(&mut self, field: EnvelopeField) {
        match field {
            EnvelopeField::Attack(value) => self.attack = clamp_time(value),
            EnvelopeField::Decay(value) => self.decay = clamp_time(value),
            EnvelopeField::Sustain(value) => self.sustain = clamp_level(value),
            EnvelopeField::Release(value) => self.release = clamp_time(value),
        }
    }
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.01, // 10ms attack
            decay: 0.1,   // 100ms decay
            sustain: 0.7, // 70% sustain level
            release: 0.2, // 200ms release
        }
    }
}

/// Single-field envelope update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum EnvelopeField {
    Attack(f32),
    Decay(f32),
    Sustain(f32),
    Release(f32),
}

fn clamp_time(seconds: f32) -> f32 {
    if seconds.is_nan() {
        return 0.001;
    }
    seconds.clamp(0.001, 5.0)
}

fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        return 0.0;
    }
    level.clamp(0.0, 1.0)
}
