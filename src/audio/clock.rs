// Audio clock - Monotonic time source of the sound renderer
// Every trigger timestamp is expressed in this domain, never in wall-clock time

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic clock supplied by the sound renderer
pub trait AudioClock {
    /// Current time in seconds
    fn now_seconds(&self) -> f64;

    /// Current time in milliseconds
    fn now_ms(&self) -> f64 {
        self.now_seconds() * 1000.0
    }
}

/// Clock driven by the audio callback's sample counter
#[derive(Clone)]
pub struct SampleClock {
    /// Current sample position (incremented by audio callback)
    sample_position: Arc<AtomicU64>,
    sample_rate: f64,
}

impl SampleClock {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_position: Arc::new(AtomicU64::new(0)),
            sample_rate: sample_rate as f64,
        }
    }

    /// Get current sample position
    pub fn current_sample(&self) -> u64 {
        self.sample_position.load(Ordering::Relaxed)
    }

    /// Advance sample position (called from audio callback)
    pub fn advance(&self, frames: usize) {
        self.sample_position
            .fetch_add(frames as u64, Ordering::Relaxed);
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate as f32
    }

    /// Convert an audio-clock time to a sample position
    pub fn seconds_to_samples(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate) as u64
    }
}

impl AudioClock for SampleClock {
    fn now_seconds(&self) -> f64 {
        self.current_sample() as f64 / self.sample_rate
    }
}

/// Settable clock for tests and offline drivers
///
/// Clones share the same time, so a test can keep one handle while the
/// renderer owns another. Time is stored as f64 bits in an atomic.
#[derive(Clone, Default)]
pub struct ManualClock {
    seconds_bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time; going backwards is ignored to stay monotonic
    pub fn set_seconds(&self, seconds: f64) {
        if seconds > self.now_seconds() {
            self.seconds_bits.store(seconds.to_bits(), Ordering::Relaxed);
        }
    }

    pub fn advance_ms(&self, ms: f64) {
        self.set_seconds(self.now_seconds() + ms / 1000.0);
    }
}

impl AudioClock for ManualClock {
    fn now_seconds(&self) -> f64 {
        f64::from_bits(self.seconds_bits.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_clock_advance() {
        let clock = SampleClock::new(48000.0);
        assert_eq!(clock.now_seconds(), 0.0);

        clock.advance(24000);
        assert_eq!(clock.current_sample(), 24000);
        assert_eq!(clock.now_seconds(), 0.5);
        assert_eq!(clock.now_ms(), 500.0);
    }

    #[test]
    fn test_seconds_to_samples() {
        let clock = SampleClock::new(48000.0);
        assert_eq!(clock.seconds_to_samples(0.25), 12000);
        assert_eq!(clock.seconds_to_samples(-1.0), 0);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance_ms(150.0);
        assert!((clock.now_ms() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_manual_clock_monotonic() {
        let clock = ManualClock::new();
        clock.set_seconds(2.0);
        clock.set_seconds(1.0);
        assert_eq!(clock.now_seconds(), 2.0);
    }
}
