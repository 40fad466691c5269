// Pattern - Melody chords and drum step grids
// The melody repeats every `len()` steps, the drum grid every PATTERN_LENGTH steps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of steps in every drum lane
pub const PATTERN_LENGTH: usize = 16;

const LANE_COUNT: usize = 3;

/// Percussion voices available in the drum grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrumInstrument {
    Kick,
    Snare,
    Hihat,
}

impl DrumInstrument {
    /// All instruments, in lane order
    pub const ALL: [DrumInstrument; LANE_COUNT] = [
        DrumInstrument::Kick,
        DrumInstrument::Snare,
        DrumInstrument::Hihat,
    ];

    fn lane(self) -> usize {
        match self {
            DrumInstrument::Kick => 0,
            DrumInstrument::Snare => 1,
            DrumInstrument::Hihat => 2,
        }
    }
}

impl fmt::Display for DrumInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrumInstrument::Kick => "kick",
            DrumInstrument::Snare => "snare",
            DrumInstrument::Hihat => "hihat",
        };
        f.write_str(name)
    }
}

/// One lane of the drum grid
pub type DrumLane = [bool; PATTERN_LENGTH];

/// Drum grid: one fixed-length lane per instrument
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrumPatterns {
    lanes: [DrumLane; LANE_COUNT],
}

impl DrumPatterns {
    /// Empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Basic four-on-the-floor groove
    pub fn basic_beat() -> Self {
        let mut patterns = Self::new();
        for step in 0..PATTERN_LENGTH {
            patterns.lanes[DrumInstrument::Kick.lane()][step] = step % 4 == 0;
            patterns.lanes[DrumInstrument::Snare.lane()][step] = step % 8 == 4;
            patterns.lanes[DrumInstrument::Hihat.lane()][step] = step % 2 == 0;
        }
        patterns
    }

    /// Lane of a single instrument
    pub fn lane(&self, instrument: DrumInstrument) -> &DrumLane {
        &self.lanes[instrument.lane()]
    }

    /// Whether `instrument` is set at `index` (wrapped to the grid)
    pub fn is_set(&self, instrument: DrumInstrument, index: usize) -> bool {
        self.lanes[instrument.lane()][index % PATTERN_LENGTH]
    }

    /// Flip a single cell. Returns the new value, or `None` if `index` is off the grid.
    pub fn toggle(&mut self, instrument: DrumInstrument, index: usize) -> Option<bool> {
        let cell = self.lanes[instrument.lane()].get_mut(index)?;
        *cell = !*cell;
        Some(*cell)
    }

    /// Replace a whole lane
    pub fn set_lane(&mut self, instrument: DrumInstrument, lane: DrumLane) {
        self.lanes[instrument.lane()] = lane;
    }

    /// Clear every lane
    pub fn clear(&mut self) {
        self.lanes = Default::default();
    }

    /// Instruments set at `step`
    pub fn hits_at(&self, step: u64) -> impl Iterator<Item = DrumInstrument> + '_ {
        let index = (step % PATTERN_LENGTH as u64) as usize;
        DrumInstrument::ALL
            .into_iter()
            .filter(move |instrument| self.lanes[instrument.lane()][index])
    }
}

/// A chord is the set of frequencies sounding on one step
pub type Chord = Vec<f32>;

/// Melody: ordered chords, indexed by `step mod len()`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Melody {
    chords: Vec<Chord>,
}

impl Melody {
    /// Build a melody, dropping non-finite and non-positive frequencies.
    ///
    /// Returns the melody together with the number of frequencies dropped.
    pub fn new(chords: Vec<Chord>) -> (Self, usize) {
        let mut dropped = 0;
        let chords = chords
            .into_iter()
            .map(|chord| {
                let before = chord.len();
                let kept: Chord = chord
                    .into_iter()
                    .filter(|freq| freq.is_finite() && *freq > 0.0)
                    .collect();
                dropped += before - kept.len();
                kept
            })
            .collect();
        (Self { chords }, dropped)
    }

    /// Eight-chord loop used until the caller supplies its own
    pub fn default_progression() -> Self {
        let chords = vec![
            vec![261.63, 329.63, 392.00], // C
            vec![220.00, 261.63, 329.63], // Am
            vec![174.61, 220.00, 261.63], // F
            vec![196.00, 246.94, 293.66], // G
            vec![261.63, 329.63, 392.00],
            vec![164.81, 196.00, 246.94], // Em
            vec![174.61, 220.00, 261.63],
            vec![196.00, 246.94, 293.66],
        ];
        Self { chords }
    }

    /// Number of steps before the melody repeats
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    /// Chord sounding at `step`; empty for an empty melody
    pub fn chord_at(&self, step: u64) -> &[f32] {
        if self.chords.is_empty() {
            return &[];
        }
        let index = (step % self.chords.len() as u64) as usize;
        &self.chords[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cell() {
        let mut patterns = DrumPatterns::new();
        assert_eq!(patterns.toggle(DrumInstrument::Kick, 3), Some(true));
        assert!(patterns.is_set(DrumInstrument::Kick, 3));
        assert!(!patterns.is_set(DrumInstrument::Snare, 3));
        assert_eq!(patterns.toggle(DrumInstrument::Kick, 3), Some(false));
        assert!(!patterns.is_set(DrumInstrument::Kick, 3));
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut patterns = DrumPatterns::new();
        assert_eq!(patterns.toggle(DrumInstrument::Hihat, PATTERN_LENGTH), None);
        assert_eq!(patterns, DrumPatterns::new());
    }

    #[test]
    fn test_hits_wrap_around() {
        let mut patterns = DrumPatterns::new();
        patterns.toggle(DrumInstrument::Snare, 2);
        patterns.toggle(DrumInstrument::Hihat, 2);

        let hits: Vec<_> = patterns.hits_at(2 + PATTERN_LENGTH as u64 * 3).collect();
        assert_eq!(hits, vec![DrumInstrument::Snare, DrumInstrument::Hihat]);
        assert_eq!(patterns.hits_at(3).count(), 0);
    }

    #[test]
    fn test_basic_beat() {
        let patterns = DrumPatterns::basic_beat();
        let kicks = patterns.lane(DrumInstrument::Kick).iter().filter(|b| **b).count();
        assert_eq!(kicks, 4);
        assert!(patterns.is_set(DrumInstrument::Snare, 4));
        assert!(patterns.is_set(DrumInstrument::Snare, 12));

        let mut cleared = patterns.clone();
        cleared.clear();
        assert_eq!(cleared, DrumPatterns::new());
    }

    #[test]
    fn test_melody_sanitized() {
        let (melody, dropped) = Melody::new(vec![
            vec![220.0, -1.0, f32::NAN],
            vec![],
            vec![440.0, 0.0],
        ]);
        assert_eq!(dropped, 3);
        assert_eq!(melody.len(), 3);
        assert_eq!(melody.chord_at(0), &[220.0]);
        assert!(melody.chord_at(1).is_empty());
        assert_eq!(melody.chord_at(5), &[440.0]);
    }

    #[test]
    fn test_empty_melody() {
        let melody = Melody::default();
        assert!(melody.is_empty());
        assert!(melody.chord_at(42).is_empty());
    }

    #[test]
    fn test_default_progression_length() {
        assert_eq!(Melody::default_progression().len(), 8);
    }
}
