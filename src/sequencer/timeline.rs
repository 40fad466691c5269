// Timeline - Tempo and step duration
// One step lasts one beat: step_seconds = 60 / bpm

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tempo in BPM (Beats Per Minute)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub const MIN_BPM: f64 = 20.0;
    pub const MAX_BPM: f64 = 999.0;

    /// Creates a new tempo, clamped to [MIN_BPM, MAX_BPM]
    ///
    /// Returns `None` for non-finite or non-positive input, which would
    /// otherwise yield a step duration the poll loop can never get past.
    pub fn new(bpm: f64) -> Option<Self> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return None;
        }
        Some(Self {
            bpm: bpm.clamp(Self::MIN_BPM, Self::MAX_BPM),
        })
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Duration of one step in seconds
    pub fn step_duration_seconds(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Duration of one step in milliseconds
    pub fn step_duration_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }
}

impl Default for Tempo {
    // 250ms per step
    fn default() -> Self {
        Self { bpm: 240.0 }
    }
}

impl TryFrom<f64> for Tempo {
    type Error = String;

    fn try_from(bpm: f64) -> Result<Self, Self::Error> {
        Tempo::new(bpm).ok_or_else(|| format!("invalid tempo: {bpm}"))
    }
}

impl From<Tempo> for f64 {
    fn from(tempo: Tempo) -> Self {
        tempo.bpm
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM", self.bpm)
    }
}
