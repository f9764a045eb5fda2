//! Mappings from the TOML schema (`lidminder_config`) into the runtime
//! config structs used by the engine.

use crate::config::{AlarmCfg, DebounceCfg, FeedbackCfg, ThresholdCfg};

impl From<&lidminder_config::Debounce> for DebounceCfg {
    fn from(d: &lidminder_config::Debounce) -> Self {
        Self {
            window_ms: d.window_ms,
        }
    }
}

impl From<&lidminder_config::Thresholds> for ThresholdCfg {
    fn from(t: &lidminder_config::Thresholds) -> Self {
        Self {
            warn_ms: t.warn_ms,
            critical_ms: t.critical_ms,
            alarm_ms: t.alarm_ms,
            grace_unit_ms: t.grace_unit_ms,
        }
    }
}

impl From<&lidminder_config::Alarm> for AlarmCfg {
    fn from(a: &lidminder_config::Alarm) -> Self {
        Self {
            visible_interval_ms: a.visible_interval_ms,
            audible_max_ms: a.audible_max_ms,
            audible_min_ms: a.audible_min_ms,
            beep_on_ms: a.beep_on_ms,
            beep_off_ms: a.beep_off_ms,
            beeps_per_burst: a.beeps_per_burst,
            tone_hz: a.tone_hz,
        }
    }
}

impl From<&lidminder_config::Feedback> for FeedbackCfg {
    fn from(f: &lidminder_config::Feedback) -> Self {
        Self {
            chirp_ms: f.chirp_ms,
            undo_hz: f.undo_hz,
            snooze_hz: f.snooze_hz,
        }
    }
}
