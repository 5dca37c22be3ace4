use crate::error::{Result, RevealError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_THRESHOLD: f64 = 30.0;
pub const DEFAULT_MID_TIER: f64 = 20.0;
pub const DEFAULT_BRUSH_RADIUS: f64 = 20.0;
pub const DEFAULT_SPECKLES: usize = 100;
pub const DEFAULT_FADE_MS: u64 = 500;
pub const DEFAULT_COMPLETION_DELAY_MS: u64 = 2000;

/// Tuning for the scratch card. Percentages are in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    /// Progress at which the card reveals itself.
    pub threshold: f64,
    /// Progress at which the indicator switches to its second message.
    pub mid_tier: f64,
    pub brush_radius: f64,
    pub speckles: usize,
    pub fade_ms: u64,
    /// Delay between the reveal and the completion callback.
    pub completion_delay_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            mid_tier: DEFAULT_MID_TIER,
            brush_radius: DEFAULT_BRUSH_RADIUS,
            speckles: DEFAULT_SPECKLES,
            fade_ms: DEFAULT_FADE_MS,
            completion_delay_ms: DEFAULT_COMPLETION_DELAY_MS,
        }
    }
}

impl RevealConfig {
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold <= 100.0) {
            return Err(RevealError::Config(format!(
                "threshold must be in (0, 100], got {}",
                self.threshold
            )));
        }
        if !(self.mid_tier >= 0.0 && self.mid_tier <= self.threshold) {
            return Err(RevealError::Config(format!(
                "mid tier {} must lie between 0 and the threshold {}",
                self.mid_tier, self.threshold
            )));
        }
        if !(self.brush_radius > 0.0) {
            return Err(RevealError::Config(format!(
                "brush radius must be positive, got {}",
                self.brush_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RevealConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fade(), Duration::from_millis(500));
        assert_eq!(config.completion_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let bad = [
            RevealConfig {
                threshold: 0.0,
                ..RevealConfig::default()
            },
            RevealConfig {
                threshold: 100.5,
                ..RevealConfig::default()
            },
            RevealConfig {
                mid_tier: 40.0,
                ..RevealConfig::default()
            },
            RevealConfig {
                brush_radius: 0.0,
                ..RevealConfig::default()
            },
            RevealConfig {
                threshold: f64::NAN,
                ..RevealConfig::default()
            },
        ];

        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RevealConfig = serde_json::from_str(r#"{"threshold": 50}"#).unwrap();
        assert_eq!(config.threshold, 50.0);
        assert_eq!(config.mid_tier, DEFAULT_MID_TIER);
        assert_eq!(config.speckles, DEFAULT_SPECKLES);
    }
}
