#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and validation for the lid timer.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - These mirror the runtime structs in `lidminder_core::config`; the
//!   `From` conversions live in core so this crate stays serde-only.
use serde::Deserialize;

/// Debounce settings for the lid orientation filter.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Debounce {
    /// A candidate state must hold this long before it is confirmed.
    pub window_ms: u64,
}

impl Default for Debounce {
    fn default() -> Self {
        Self { window_ms: 100 }
    }
}

/// Elapsed-time severity thresholds, all measured from the baseline.
/// Must be strictly increasing: warn < critical < alarm.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Thresholds {
    pub warn_ms: u64,
    pub critical_ms: u64,
    pub alarm_ms: u64,
    /// Grace granted by one snooze. Also accepts alias "snooze_unit_ms".
    #[serde(alias = "snooze_unit_ms")]
    pub grace_unit_ms: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        const HOUR_MS: u64 = 3_600_000;
        Self {
            warn_ms: 4 * HOUR_MS,
            critical_ms: 8 * HOUR_MS,
            alarm_ms: 12 * HOUR_MS,
            grace_unit_ms: HOUR_MS,
        }
    }
}

/// Alert cadence once the alarm threshold is crossed.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Alarm {
    /// Indicator flash period while alarming.
    pub visible_interval_ms: u64,
    /// First audible firing interval; halves per firing.
    pub audible_max_ms: u64,
    /// Floor for the audible firing interval.
    pub audible_min_ms: u64,
    pub beep_on_ms: u64,
    pub beep_off_ms: u64,
    pub beeps_per_burst: u8,
    pub tone_hz: u32,
}

impl Default for Alarm {
    fn default() -> Self {
        Self {
            visible_interval_ms: 1_000,
            audible_max_ms: 3_600_000,
            audible_min_ms: 60_000,
            beep_on_ms: 600,
            beep_off_ms: 1_000,
            beeps_per_burst: 3,
            tone_hz: 1_760,
        }
    }
}

/// Button feedback chirps.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Feedback {
    pub chirp_ms: u64,
    pub undo_hz: u32,
    pub snooze_hz: u32,
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            chirp_ms: 150,
            undo_hz: 880,
            snooze_hz: 1_320,
        }
    }
}

/// Wiring for the hardware backend. Unused by the simulation backend but
/// tolerated in any config.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Pins {
    /// I²C bus index carrying the accelerometer.
    pub i2c_bus: u8,
    /// Accelerometer I²C address (LIS3DH default 0x18).
    pub accel_addr: u8,
    pub led_r: u8,
    pub led_g: u8,
    pub led_b: u8,
    pub button_a: u8,
    pub button_b: u8,
    /// Optional hardware mute line; absent means never muted.
    pub mute_switch: Option<u8>,
    /// PWM channel driving the buzzer.
    pub buzzer_pwm: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            i2c_bus: 1,
            accel_addr: 0x18,
            led_r: 17,
            led_g: 27,
            led_b: 22,
            button_a: 5,
            button_b: 6,
            mute_switch: None,
            buzzer_pwm: 0,
        }
    }
}

/// Host loop pacing.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Run {
    /// Pause between ticks; 0 = free-run.
    pub poll_ms: u64,
}

impl Default for Run {
    fn default() -> Self {
        Self { poll_ms: 5 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub debounce: Debounce,
    pub thresholds: Thresholds,
    pub alarm: Alarm,
    pub feedback: Feedback,
    pub pins: Pins,
    pub run: Run,
}

/// Parse config TOML (no validation; call `Config::validate`).
pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Debounce
        if self.debounce.window_ms == 0 {
            eyre::bail!("debounce.window_ms must be >= 1");
        }
        if self.debounce.window_ms > 60_000 {
            eyre::bail!("debounce.window_ms is unreasonably large (>1min)");
        }

        // Thresholds
        if self.thresholds.warn_ms == 0 {
            eyre::bail!("thresholds.warn_ms must be >= 1");
        }
        if self.thresholds.warn_ms >= self.thresholds.critical_ms {
            eyre::bail!("thresholds must be strictly increasing: warn_ms < critical_ms");
        }
        if self.thresholds.critical_ms >= self.thresholds.alarm_ms {
            eyre::bail!("thresholds must be strictly increasing: critical_ms < alarm_ms");
        }
        if self.thresholds.grace_unit_ms == 0 {
            eyre::bail!("thresholds.grace_unit_ms must be >= 1");
        }
        if self.thresholds.grace_unit_ms > self.thresholds.alarm_ms {
            eyre::bail!("thresholds.grace_unit_ms must not exceed alarm_ms");
        }

        // Alarm cadence
        if self.alarm.visible_interval_ms == 0 {
            eyre::bail!("alarm.visible_interval_ms must be >= 1");
        }
        if self.alarm.audible_min_ms == 0 {
            eyre::bail!("alarm.audible_min_ms must be >= 1");
        }
        if self.alarm.audible_min_ms > self.alarm.audible_max_ms {
            eyre::bail!("alarm.audible_min_ms must not exceed audible_max_ms");
        }
        if self.alarm.beep_on_ms == 0 {
            eyre::bail!("alarm.beep_on_ms must be >= 1");
        }
        if self.alarm.beeps_per_burst == 0 {
            eyre::bail!("alarm.beeps_per_burst must be >= 1");
        }
        if self.alarm.tone_hz == 0 || self.alarm.tone_hz > 20_000 {
            eyre::bail!("alarm.tone_hz must be in (0, 20000]");
        }

        // Feedback
        if self.feedback.chirp_ms == 0 {
            eyre::bail!("feedback.chirp_ms must be >= 1");
        }
        if self.feedback.undo_hz == 0 || self.feedback.snooze_hz == 0 {
            eyre::bail!("feedback chirp frequencies must be > 0");
        }

        Ok(())
    }
}
