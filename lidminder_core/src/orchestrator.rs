//! The top-level polling state machine.
//!
//! Each `tick()` samples the accelerometer, feeds the debounced lid
//! monitor, re-baselines on a raised edge, maps elapsed time to severity,
//! drives the indicator and the escalating alarm, and finally processes
//! button edges (undo / snooze). Devices are injected behind the
//! `lidminder_traits` capability traits; device failures are best-effort
//! and never stop the loop.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use lidminder_traits::clock::Clock;
use lidminder_traits::{
    Accelerometer, Button, ButtonPad, ButtonSet, Indicator, IndicatorColor, MuteSwitch, Sounder,
};

use crate::alarm::AlarmController;
use crate::config::{FeedbackCfg, ThresholdCfg};
use crate::lid::{LidMonitor, LidState};
use crate::status::Severity;
use crate::util::{deadline_reached, elapsed_ms};

/// Undo history depth; pushing past this evicts the oldest entry.
pub const HISTORY_CAPACITY: usize = 10;

/// Unified engine for both dynamic (boxed) and static dispatch variants.
pub struct TimerOrchestrator<A, I, S, B>
where
    A: Accelerometer,
    I: Indicator,
    S: Sounder,
    B: ButtonPad,
{
    pub(crate) sensor: A,
    pub(crate) indicator: I,
    pub(crate) sounder: S,
    pub(crate) buttons: B,
    pub(crate) mute: Option<Box<dyn MuteSwitch>>,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,

    pub(crate) lid: LidMonitor,
    pub(crate) alarm: AlarmController,
    pub(crate) thresholds: ThresholdCfg,
    pub(crate) feedback: FeedbackCfg,

    /// Timestamp of the last confirmed lid-raise; all severity math is
    /// `now - baseline`.
    pub(crate) baseline_ms: u64,
    /// Past baselines, oldest first.
    pub(crate) history: VecDeque<u64>,
    pub(crate) prev_presses: ButtonSet,
    /// Deadline of an in-flight feedback chirp.
    pub(crate) chirp_until_ms: Option<u64>,
    /// Last color written on the steady path; skips redundant writes.
    pub(crate) last_color: Option<IndicatorColor>,
    pub(crate) last_severity: Severity,
}

impl<A, I, S, B> core::fmt::Debug for TimerOrchestrator<A, I, S, B>
where
    A: Accelerometer,
    I: Indicator,
    S: Sounder,
    B: ButtonPad,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimerOrchestrator")
            .field("lid", &self.lid.confirmed())
            .field("baseline_ms", &self.baseline_ms)
            .field("severity", &self.last_severity)
            .field("alarm_active", &self.alarm.is_active())
            .finish()
    }
}

impl<A, I, S, B> TimerOrchestrator<A, I, S, B>
where
    A: Accelerometer,
    I: Indicator,
    S: Sounder,
    B: ButtonPad,
{
    /// One full poll iteration. Never blocks, never fails; intended to be
    /// called as fast as the host loop permits.
    pub fn tick(&mut self) {
        let now = self.clock.ms_since(self.epoch);

        match self.sensor.sample() {
            Ok(sample) => self.lid.observe(sample, now),
            Err(e) => {
                tracing::warn!(error = %e, "accelerometer read failed; keeping last lid state");
            }
        }

        if self.lid.consume_edge(LidState::Raised) {
            tracing::info!(
                closed_for_ms = elapsed_ms(now, self.baseline_ms),
                "lid raised; recording new baseline"
            );
            self.alarm.deactivate(&mut self.sounder);
            self.record_baseline(now);
        }

        self.update_outputs(now);
        self.service_chirp(now);
        self.handle_buttons(now);
    }

    /// Severity of the current elapsed interval (telemetry).
    pub fn last_severity(&self) -> Severity {
        self.last_severity
    }

    pub fn baseline_ms(&self) -> u64 {
        self.baseline_ms
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn alarm(&self) -> &AlarmController {
        &self.alarm
    }

    pub fn lid(&self) -> &LidMonitor {
        &self.lid
    }

    /// Power-on self test: walk the indicator through every color, then
    /// off. Blocks through the injected clock; run it before the loop, not
    /// inside it.
    pub fn post(&mut self, dwell_ms: u64) {
        for color in [
            IndicatorColor::Ok,
            IndicatorColor::Warn,
            IndicatorColor::Critical,
            IndicatorColor::Alert,
        ] {
            self.set_color(color);
            self.clock.sleep(std::time::Duration::from_millis(dwell_ms));
        }
        self.set_color(IndicatorColor::Off);
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn update_outputs(&mut self, now: u64) {
        if self.lid.is_raised() {
            // Invariant: never alarm while the lid is up.
            self.alarm.deactivate(&mut self.sounder);
            self.set_color(IndicatorColor::Off);
            return;
        }

        let elapsed = elapsed_ms(now, self.baseline_ms);
        let severity = self.thresholds.severity(elapsed);
        if severity != self.last_severity {
            tracing::info!(from = ?self.last_severity, to = ?severity, elapsed_ms = elapsed, "severity changed");
            self.last_severity = severity;
        }

        if severity == Severity::Alarm {
            self.alarm.trigger(now);
            // The alarm writes the indicator directly; our cache is stale.
            self.last_color = None;
            let muted = self.mute_engaged();
            self.alarm
                .service(now, &mut self.indicator, &mut self.sounder, muted);
        } else {
            self.alarm.deactivate(&mut self.sounder);
            self.set_color(severity.color());
        }
    }

    fn handle_buttons(&mut self, now: u64) {
        let presses = match self.buttons.pressed() {
            Ok(p) => p,
            Err(e) => {
                // Keep prev_presses so a transient read failure cannot
                // re-fire a still-held button on the next good read.
                tracing::warn!(error = %e, "button read failed");
                return;
            }
        };
        let fresh = presses.newly_pressed(self.prev_presses);
        self.prev_presses = presses;
        for button in fresh.iter() {
            match button {
                Button::A => {
                    self.undo(now, false);
                }
                Button::B => self.snooze(now),
            }
        }
    }

    /// Record a new baseline, pushing the previous one into history.
    fn record_baseline(&mut self, at_ms: u64) {
        self.history.push_back(self.baseline_ms);
        if self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.baseline_ms = at_ms;
    }

    /// Pop the most recent history entry into the baseline. Returns the
    /// discarded (pre-undo) baseline, or `None` on empty history. The
    /// discarded value is lost unless the caller re-pushes it; undo is not
    /// reversible.
    fn undo(&mut self, now: u64, quiet: bool) -> Option<u64> {
        let Some(restored) = self.history.pop_back() else {
            tracing::debug!("undo with empty history; ignored");
            return None;
        };
        let discarded = self.baseline_ms;
        self.baseline_ms = restored;
        tracing::info!(restored_ms = restored, "baseline undone");
        if !quiet {
            self.chirp(now, self.feedback.undo_hz);
        }
        Some(discarded)
    }

    /// Grant one grace unit before the next alarm. Only applies once
    /// genuinely past the alarm threshold; pressed early it restores any
    /// state touched by its implicit undo and does nothing else.
    fn snooze(&mut self, now: u64) {
        // A raised lid already re-baselined; undo that quietly so snooze
        // operates on the alarm the user is reacting to.
        let undone = if self.lid.is_raised() {
            self.undo(now, true)
        } else {
            None
        };

        if elapsed_ms(now, self.baseline_ms) < self.thresholds.alarm_ms {
            if let Some(discarded) = undone {
                // Not actually in alarm: reverse the implicit undo.
                self.record_baseline(discarded);
            }
            return;
        }

        let grace_start = now.wrapping_sub(self.thresholds.alarm_ms - self.thresholds.grace_unit_ms);
        self.record_baseline(grace_start);
        // Elapsed is below the alarm threshold again; silence the alert now
        // so the acknowledgement chirp owns the tone channel.
        self.alarm.deactivate(&mut self.sounder);
        tracing::info!(grace_ms = self.thresholds.grace_unit_ms, "snoozed");
        self.chirp(now, self.feedback.snooze_hz);
    }

    /// Start a short acknowledgement tone without blocking the loop. The
    /// alarm owns the tone channel while active, and the hardware mute
    /// suppresses chirps like any other tone.
    fn chirp(&mut self, now: u64, freq_hz: u32) {
        if self.alarm.is_active() || self.mute_engaged() {
            return;
        }
        match self.sounder.start_tone(freq_hz) {
            Ok(()) => {
                self.chirp_until_ms = Some(now.wrapping_add(self.feedback.chirp_ms));
            }
            Err(e) => tracing::warn!(error = %e, "feedback tone failed"),
        }
    }

    fn service_chirp(&mut self, now: u64) {
        let Some(until_ms) = self.chirp_until_ms else {
            return;
        };
        if self.alarm.is_active() {
            // The alarm took over the sounder; it restarts the tone at its
            // own frequency, so just forget the chirp.
            self.chirp_until_ms = None;
        } else if deadline_reached(now, until_ms) {
            self.chirp_until_ms = None;
            if let Err(e) = self.sounder.stop_tone() {
                tracing::warn!(error = %e, "feedback tone stop failed");
            }
        }
    }

    fn set_color(&mut self, color: IndicatorColor) {
        if self.last_color == Some(color) {
            return;
        }
        match self.indicator.set_color(color) {
            Ok(()) => self.last_color = Some(color),
            Err(e) => tracing::warn!(error = %e, "indicator write failed"),
        }
    }

    fn mute_engaged(&mut self) -> bool {
        self.mute.as_mut().is_some_and(|m| m.engaged())
    }
}
