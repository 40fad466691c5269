// Delay - Feedback delay parameters
//
// The renderer runs the delay line; the engine only tracks the settings and
// attaches them to triggers while the effect is active.

use serde::{Deserialize, Serialize};

/// Delay parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayParams {
    /// Delay time in seconds (0.0 - MAX_TIME_SECONDS)
    pub time_seconds: f32,
    /// Feedback amount (0.0 - 0.99)
    pub feedback: f32,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            time_seconds: 0.25,
            feedback: 0.0, // off by default
        }
    }
}

impl DelayParams {
    pub const MAX_TIME_SECONDS: f32 = 5.0;
    pub const MAX_FEEDBACK: f32 = 0.99;

    /// Create new delay parameters with clamping
    pub fn new(time_seconds: f32, feedback: f32) -> Self {
        let mut params = Self {
            time_seconds,
            feedback,
        };
        params.validate();
        params
    }

    /// Validate and clamp parameters to safe ranges
    pub fn validate(&mut self) {
        self.time_seconds = if self.time_seconds.is_nan() {
            0.0
        } else {
            self.time_seconds.clamp(0.0, Self::MAX_TIME_SECONDS)
        };
        // Max 0.99 to avoid runaway feedback
        self.feedback = if self.feedback.is_nan() {
            0.0
        } else {
            self.feedback.clamp(0.0, Self::MAX_FEEDBACK)
        };
    }

    /// Inactive when there is no feedback or no delay time
    pub fn is_active(&self) -> bool {
        self.feedback > 0.0 && self.time_seconds > 0.0
    }

    /// Apply a single-field update, clamping the result
    pub fn set_field(&mut self, field: DelayField) {
        match field {
            DelayField::TimeSeconds(value) => self.time_seconds = value,
            DelayField::Feedback(value) => self.feedback = value,
        }
        self.validate();
    }
}

/// Single-field delay update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum DelayField {
    TimeSeconds(f32),
    Feedback(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_params_default() {
        let params = DelayParams::default();
        assert_eq!(params.time_seconds, 0.25);
        assert!(!params.is_active());
    }

    #[test]
    fn test_feedback_clamped_below_one() {
        let params = DelayParams::new(0.5, 1.5);
        assert_eq!(params.feedback, 0.99);
        assert!(params.is_active());

        let params = DelayParams::new(10.0, -0.5);
        assert_eq!(params.time_seconds, 5.0);
        assert_eq!(params.feedback, 0.0);
        assert!(!params.is_active());
    }

    #[test]
    fn test_zero_time_is_inactive() {
        let mut params = DelayParams::new(0.3, 0.5);
        params.set_field(DelayField::TimeSeconds(0.0));
        assert!(!params.is_active());
    }
}
