//! Runtime configuration structs for the lid-timer engine.
//!
//! These are the validated, in-memory knobs used by the engine. They are
//! separate from the TOML-deserialized schema in `lidminder_config`; the
//! `From` conversions live in `conversions`.

use crate::status::Severity;
use crate::util::{MILLIS_PER_HOUR, MILLIS_PER_MIN, elapsed_ms};

/// Debounce configuration for the lid orientation filter.
#[derive(Debug, Clone, Copy)]
pub struct DebounceCfg {
    /// A candidate state must hold this long before promotion.
    pub window_ms: u64,
}

impl Default for DebounceCfg {
    fn default() -> Self {
        Self { window_ms: 100 }
    }
}

/// Severity thresholds measured from the baseline. Strictly increasing:
/// warn < critical < alarm.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdCfg {
    pub warn_ms: u64,
    pub critical_ms: u64,
    pub alarm_ms: u64,
    /// Extra grace granted by one snooze.
    pub grace_unit_ms: u64,
}

impl Default for ThresholdCfg {
    fn default() -> Self {
        Self {
            warn_ms: 4 * MILLIS_PER_HOUR,
            critical_ms: 8 * MILLIS_PER_HOUR,
            alarm_ms: 12 * MILLIS_PER_HOUR,
            grace_unit_ms: MILLIS_PER_HOUR,
        }
    }
}

impl ThresholdCfg {
    /// Map elapsed time since the baseline to a severity bucket.
    /// Boundaries belong to the lower bucket: elapsed == warn_ms is `Ok`.
    pub fn severity(&self, elapsed: u64) -> Severity {
        if elapsed > self.alarm_ms {
            Severity::Alarm
        } else if elapsed > self.critical_ms {
            Severity::Critical
        } else if elapsed > self.warn_ms {
            Severity::Warn
        } else {
            Severity::Ok
        }
    }

    /// Severity at `now_ms` for a baseline stamped at `baseline_ms`.
    pub fn severity_at(&self, now_ms: u64, baseline_ms: u64) -> Severity {
        self.severity(elapsed_ms(now_ms, baseline_ms))
    }
}

/// Alert cadence once the alarm threshold is crossed.
#[derive(Debug, Clone, Copy)]
pub struct AlarmCfg {
    /// Indicator flash period while alarming.
    pub visible_interval_ms: u64,
    /// First audible firing interval; halves after every firing.
    pub audible_max_ms: u64,
    /// Floor for the audible firing interval.
    pub audible_min_ms: u64,
    /// Length of one beep.
    pub beep_on_ms: u64,
    /// Silence between beeps within a burst.
    pub beep_off_ms: u64,
    /// Beeps per firing.
    pub beeps_per_burst: u8,
    pub tone_hz: u32,
}

impl Default for AlarmCfg {
    fn default() -> Self {
        Self {
            visible_interval_ms: 1_000,
            audible_max_ms: MILLIS_PER_HOUR,
            audible_min_ms: MILLIS_PER_MIN,
            beep_on_ms: 600,
            beep_off_ms: 1_000,
            beeps_per_burst: 3,
            tone_hz: 1_760,
        }
    }
}

/// Button feedback chirps (undo / snooze acknowledgement).
#[derive(Debug, Clone, Copy)]
pub struct FeedbackCfg {
    pub chirp_ms: u64,
    pub undo_hz: u32,
    pub snooze_hz: u32,
}

impl Default for FeedbackCfg {
    fn default() -> Self {
        Self {
            chirp_ms: 150,
            undo_hz: 880,
            snooze_hz: 1_320,
        }
    }
}
