//! Escalating two-channel alert.
//!
//! Once triggered, two periodic behaviors run from the orchestrator tick
//! with no sleeping: the indicator toggles between the alert color and off
//! on a fixed period, and a beep burst fires on an interval that starts at
//! its maximum and halves per firing down to a floor. Deactivation silences
//! any in-progress tone immediately and rewinds the escalation.

use lidminder_traits::{Indicator, IndicatorColor, Sounder};

use crate::config::AlarmCfg;
use crate::util::deadline_reached;

pub struct AlarmController {
    cfg: AlarmCfg,
    active: bool,
    led_on: bool,
    next_visible_ms: u64,
    next_audible_ms: u64,
    audible_interval_ms: u64,
    /// Logical tone state inside a burst. Advances even while muted.
    beep_on: bool,
    /// Whether a hardware tone was actually started (mute can keep this
    /// false while `beep_on` is true).
    sounding: bool,
    /// Next on/off transition within the current burst; `None` = burst done.
    next_beep_step_ms: Option<u64>,
    beeps_done: u8,
}

impl AlarmController {
    pub fn new(cfg: AlarmCfg) -> Self {
        Self {
            cfg,
            active: false,
            led_on: false,
            next_visible_ms: 0,
            next_audible_ms: 0,
            audible_interval_ms: cfg.audible_max_ms,
            beep_on: false,
            sounding: false,
            next_beep_step_ms: None,
            beeps_done: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current audible firing interval (telemetry; halves per firing).
    pub fn audible_interval_ms(&self) -> u64 {
        self.audible_interval_ms
    }

    /// Activate the alert. Idempotent while already active: escalation is
    /// never rewound by a re-trigger, only by a full deactivate cycle.
    pub fn trigger(&mut self, now_ms: u64) {
        if self.active {
            return;
        }
        self.active = true;
        self.led_on = false;
        self.next_visible_ms = now_ms;
        self.next_audible_ms = now_ms;
        tracing::info!("alarm triggered");
    }

    /// Silence immediately and rewind escalation to the maximum interval.
    /// Safe to call every tick; a no-op when already idle.
    pub fn deactivate(&mut self, sounder: &mut dyn Sounder) {
        self.stop_tone_if_sounding(sounder);
        if !self.active {
            return;
        }
        self.active = false;
        self.led_on = false;
        self.audible_interval_ms = self.cfg.audible_max_ms;
        self.beep_on = false;
        self.next_beep_step_ms = None;
        self.beeps_done = 0;
        self.next_visible_ms = 0;
        self.next_audible_ms = 0;
        tracing::info!("alarm deactivated");
    }

    /// Drive both periodic channels for this tick. `muted` suppresses tone
    /// output only; burst and interval bookkeeping still advance.
    pub fn service(
        &mut self,
        now_ms: u64,
        indicator: &mut dyn Indicator,
        sounder: &mut dyn Sounder,
        muted: bool,
    ) {
        if !self.active {
            return;
        }
        self.service_audible(now_ms, sounder, muted);
        self.service_visible(now_ms, indicator);
    }

    fn service_audible(&mut self, now_ms: u64, sounder: &mut dyn Sounder, muted: bool) {
        if deadline_reached(now_ms, self.next_audible_ms) {
            // Next firing is one current interval out; the halving applies
            // from the firing after this one.
            self.next_audible_ms = self.next_audible_ms.wrapping_add(self.audible_interval_ms);
            self.audible_interval_ms =
                (self.audible_interval_ms / 2).max(self.cfg.audible_min_ms);
            self.set_beep(false, sounder, muted);
            self.beeps_done = 0;
            self.next_beep_step_ms = Some(now_ms);
            tracing::debug!(
                next_interval_ms = self.audible_interval_ms,
                "audible alarm fired"
            );
        }

        if let Some(step_ms) = self.next_beep_step_ms
            && deadline_reached(now_ms, step_ms)
        {
            if self.beep_on {
                self.set_beep(false, sounder, muted);
                self.beeps_done += 1;
                if self.beeps_done >= self.cfg.beeps_per_burst {
                    self.next_beep_step_ms = None;
                    self.beeps_done = 0;
                } else {
                    self.next_beep_step_ms = Some(step_ms.wrapping_add(self.cfg.beep_off_ms));
                }
            } else {
                self.set_beep(true, sounder, muted);
                self.next_beep_step_ms = Some(step_ms.wrapping_add(self.cfg.beep_on_ms));
            }
        }
    }

    fn service_visible(&mut self, now_ms: u64, indicator: &mut dyn Indicator) {
        if !deadline_reached(now_ms, self.next_visible_ms) {
            return;
        }
        self.next_visible_ms = self.next_visible_ms.wrapping_add(self.cfg.visible_interval_ms);
        self.led_on = !self.led_on;
        let color = if self.led_on {
            IndicatorColor::Alert
        } else {
            IndicatorColor::Off
        };
        if let Err(e) = indicator.set_color(color) {
            tracing::warn!(error = %e, "indicator write failed");
        }
    }

    /// Transition the logical beep state, actuating the tone only on real
    /// transitions and only when not muted. Actuator failures degrade to a
    /// silent alarm rather than stopping the loop.
    fn set_beep(&mut self, on: bool, sounder: &mut dyn Sounder, muted: bool) {
        if on == self.beep_on {
            return;
        }
        if on {
            if !muted {
                match sounder.start_tone(self.cfg.tone_hz) {
                    Ok(()) => self.sounding = true,
                    Err(e) => tracing::warn!(error = %e, "tone start failed"),
                }
            }
        } else {
            self.stop_tone_if_sounding(sounder);
        }
        self.beep_on = on;
    }

    fn stop_tone_if_sounding(&mut self, sounder: &mut dyn Sounder) {
        if !self.sounding {
            return;
        }
        self.sounding = false;
        if let Err(e) = sounder.stop_tone() {
            tracing::warn!(error = %e, "tone stop failed");
        }
    }
}
