use crate::error::TrackError;
use serde::{Deserialize, Serialize};
use std::io::Read;

pub const DEFAULT_RECOGNITION_COUNT: usize = 20;
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.25;
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 50;
pub const DEFAULT_HISTORY_CAP: usize = 50;
pub const DEFAULT_MAX_MISSED: usize = 30;
/// Per-coordinate matching tolerance in normalized `[0, 1]` coordinates.
pub const DEFAULT_PROXIMITY_THRESHOLD: f32 = 0.03;

/// Construction parameters for [`StableTracker`](crate::StableTracker).
///
/// Only `height` and `width` are required; every other field falls back to
/// its default, both through [`TrackerConfig::new`] and when deserialized.
///
/// # Example
/// ```
/// use steadytrack_rs::TrackerConfig;
/// let config = TrackerConfig::new(640.0, 480.0)
///     .with_recognition_count(10)
///     .with_score_threshold(0.4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub height: f32,
    pub width: f32,

    /// Minimum number of matched frames before a track may be reported as
    /// the confident object.
    #[serde(default = "default_recognition_count")]
    pub recognition_count: usize,

    /// Detections scoring strictly below this are ignored.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,

    /// Milliseconds during which a computed confident object is reused.
    #[serde(default = "default_check_interval_ms", rename = "check_interval_ms")]
    pub check_interval: u64,

    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    /// Consecutive missed frames after which a track is evicted.
    #[serde(default = "default_max_missed")]
    pub max_missed: usize,

    #[serde(default = "default_proximity_threshold")]
    pub proximity_threshold: f32,
}

fn default_recognition_count() -> usize {
    DEFAULT_RECOGNITION_COUNT
}

fn default_score_threshold() -> f32 {
    DEFAULT_SCORE_THRESHOLD
}

fn default_check_interval_ms() -> u64 {
    DEFAULT_CHECK_INTERVAL_MS
}

fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}

fn default_max_missed() -> usize {
    DEFAULT_MAX_MISSED
}

fn default_proximity_threshold() -> f32 {
    DEFAULT_PROXIMITY_THRESHOLD
}

impl TrackerConfig {
    pub fn new(height: f32, width: f32) -> Self {
        Self {
            height,
            width,
            recognition_count: DEFAULT_RECOGNITION_COUNT,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            check_interval: DEFAULT_CHECK_INTERVAL_MS,
            history_cap: DEFAULT_HISTORY_CAP,
            max_missed: DEFAULT_MAX_MISSED,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
        }
    }

    pub fn with_recognition_count(self, recognition_count: usize) -> Self {
        Self {
            recognition_count,
            ..self
        }
    }

    pub fn with_score_threshold(self, score_threshold: f32) -> Self {
        Self {
            score_threshold,
            ..self
        }
    }

    pub fn with_check_interval(self, check_interval_ms: u64) -> Self {
        Self {
            check_interval: check_interval_ms,
            ..self
        }
    }

    pub fn with_history_cap(self, history_cap: usize) -> Self {
        Self {
            history_cap,
            ..self
        }
    }

    pub fn with_max_missed(self, max_missed: usize) -> Self {
        Self { max_missed, ..self }
    }

    pub fn with_proximity_threshold(self, proximity_threshold: f32) -> Self {
        Self {
            proximity_threshold,
            ..self
        }
    }

    /// Parse a JSON document. The result is validated.
    pub fn from_json_str(json: &str) -> Result<Self, TrackError> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, TrackError> {
        let config: TrackerConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// `width / height`, the factor applied to vertical coordinates.
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    pub fn validate(&self) -> Result<(), TrackError> {
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(TrackError::InvalidConfig(format!(
                "height must be a positive number, got {}",
                self.height
            )));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(TrackError::InvalidConfig(format!(
                "width must be a positive number, got {}",
                self.width
            )));
        }
        if !self.score_threshold.is_finite() {
            return Err(TrackError::InvalidConfig(format!(
                "score_threshold must be finite, got {}",
                self.score_threshold
            )));
        }
        if !(self.proximity_threshold.is_finite() && self.proximity_threshold >= 0.0) {
            return Err(TrackError::InvalidConfig(format!(
                "proximity_threshold must be a non-negative number, got {}",
                self.proximity_threshold
            )));
        }
        if self.history_cap == 0 {
            return Err(TrackError::InvalidConfig(
                "history_cap must be at least 1".to_string(),
            ));
        }
        if self.max_missed == 0 {
            return Err(TrackError::InvalidConfig(
                "max_missed must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
