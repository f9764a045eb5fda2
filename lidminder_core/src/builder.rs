//! Type-state builder for `Timer` and generic `build_timer` constructor.
//!
//! The builder enforces at compile time that the accelerometer, indicator,
//! sounder, and button pad are provided before `build()` is available.
//! `try_build()` is always available for dynamic checks.

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;

use lidminder_traits::clock::{Clock, MonotonicClock};
use lidminder_traits::{
    Accelerometer, ButtonPad, ButtonSet, Indicator, MuteSwitch, Sounder,
};

use crate::alarm::AlarmController;
use crate::config::{AlarmCfg, DebounceCfg, FeedbackCfg, ThresholdCfg};
use crate::error::{BuildError, Result};
use crate::lid::LidMonitor;
use crate::orchestrator::TimerOrchestrator;
use crate::status::Severity;

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Public dynamic (boxed) timer that preserves a stable API via composition.
pub struct Timer {
    pub(crate) inner: TimerOrchestrator<
        Box<dyn Accelerometer>,
        Box<dyn Indicator>,
        Box<dyn Sounder>,
        Box<dyn ButtonPad>,
    >,
}

impl core::fmt::Debug for Timer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl Timer {
    /// Start building a Timer.
    pub fn builder() -> TimerBuilder<Missing, Missing, Missing, Missing> {
        TimerBuilder::default()
    }

    /// One full poll iteration.
    pub fn tick(&mut self) {
        self.inner.tick();
    }

    /// Timestamp (ms since construction) of the last confirmed lid-raise.
    pub fn baseline_ms(&self) -> u64 {
        self.inner.baseline_ms()
    }

    /// Number of undo entries currently held.
    pub fn history_depth(&self) -> usize {
        self.inner.history_depth()
    }

    /// Severity of the last tick's elapsed interval.
    pub fn last_severity(&self) -> Severity {
        self.inner.last_severity()
    }

    /// Whether the escalating alert is currently active.
    pub fn alarm_active(&self) -> bool {
        self.inner.alarm().is_active()
    }

    /// Confirmed (debounced) lid state.
    pub fn lid_state(&self) -> crate::lid::LidState {
        self.inner.lid().confirmed()
    }

    /// Power-on self test: cycle the indicator colors, then off.
    pub fn post(&mut self, dwell_ms: u64) {
        self.inner.post(dwell_ms);
    }

    /// Current audible escalation interval (telemetry).
    pub fn audible_interval_ms(&self) -> u64 {
        self.inner.alarm().audible_interval_ms()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Timer`. Config is validated on `build()`.
pub struct TimerBuilder<A, I, O, B> {
    sensor: Option<Box<dyn Accelerometer>>,
    indicator: Option<Box<dyn Indicator>>,
    sounder: Option<Box<dyn Sounder>>,
    buttons: Option<Box<dyn ButtonPad>>,
    mute: Option<Box<dyn MuteSwitch>>,
    debounce: Option<DebounceCfg>,
    thresholds: Option<ThresholdCfg>,
    alarm: Option<AlarmCfg>,
    feedback: Option<FeedbackCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _a: PhantomData<A>,
    _i: PhantomData<I>,
    _o: PhantomData<O>,
    _b: PhantomData<B>,
}

impl Default for TimerBuilder<Missing, Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            sensor: None,
            indicator: None,
            sounder: None,
            buttons: None,
            mute: None,
            debounce: None,
            thresholds: None,
            alarm: None,
            feedback: None,
            clock: None,
            _a: PhantomData,
            _i: PhantomData,
            _o: PhantomData,
            _b: PhantomData,
        }
    }
}

impl<A, I, O, B> TimerBuilder<A, I, O, B> {
    fn transmute_markers<A2, I2, O2, B2>(self) -> TimerBuilder<A2, I2, O2, B2> {
        TimerBuilder {
            sensor: self.sensor,
            indicator: self.indicator,
            sounder: self.sounder,
            buttons: self.buttons,
            mute: self.mute,
            debounce: self.debounce,
            thresholds: self.thresholds,
            alarm: self.alarm,
            feedback: self.feedback,
            clock: self.clock,
            _a: PhantomData,
            _i: PhantomData,
            _o: PhantomData,
            _b: PhantomData,
        }
    }

    pub fn with_sensor(mut self, sensor: impl Accelerometer + 'static) -> TimerBuilder<Set, I, O, B> {
        self.sensor = Some(Box::new(sensor));
        self.transmute_markers()
    }

    pub fn with_indicator(
        mut self,
        indicator: impl Indicator + 'static,
    ) -> TimerBuilder<A, Set, O, B> {
        self.indicator = Some(Box::new(indicator));
        self.transmute_markers()
    }

    pub fn with_sounder(mut self, sounder: impl Sounder + 'static) -> TimerBuilder<A, I, Set, B> {
        self.sounder = Some(Box::new(sounder));
        self.transmute_markers()
    }

    pub fn with_buttons(mut self, buttons: impl ButtonPad + 'static) -> TimerBuilder<A, I, O, Set> {
        self.buttons = Some(Box::new(buttons));
        self.transmute_markers()
    }

    /// Optional hardware mute line; absent means never muted.
    #[must_use]
    pub fn with_mute_switch(mut self, mute: impl MuteSwitch + 'static) -> Self {
        self.mute = Some(Box::new(mute));
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: DebounceCfg) -> Self {
        self.debounce = Some(debounce);
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ThresholdCfg) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    #[must_use]
    pub fn with_alarm(mut self, alarm: AlarmCfg) -> Self {
        self.alarm = Some(alarm);
        self
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: FeedbackCfg) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// Inject a clock (tests use a manually advanced one).
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Dynamic variant of `build()`: reports missing devices at runtime.
    pub fn try_build(self) -> Result<Timer> {
        let sensor = self
            .sensor
            .ok_or_else(|| eyre::Report::new(BuildError::MissingAccelerometer))?;
        let indicator = self
            .indicator
            .ok_or_else(|| eyre::Report::new(BuildError::MissingIndicator))?;
        let sounder = self
            .sounder
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSounder))?;
        let buttons = self
            .buttons
            .ok_or_else(|| eyre::Report::new(BuildError::MissingButtons))?;

        let inner = validate_and_build(
            sensor,
            indicator,
            sounder,
            buttons,
            self.mute,
            self.debounce.unwrap_or_default(),
            self.thresholds.unwrap_or_default(),
            self.alarm.unwrap_or_default(),
            self.feedback.unwrap_or_default(),
            self.clock,
        )?;
        Ok(Timer { inner })
    }
}

impl TimerBuilder<Set, Set, Set, Set> {
    /// Validate configuration and construct the timer. Only available once
    /// all four devices have been provided.
    pub fn build(self) -> Result<Timer> {
        self.try_build()
    }
}

/// Validate configuration and construct a `TimerOrchestrator`.
///
/// This is the single source of truth for validation and construction,
/// used by `TimerBuilder` and by static-dispatch callers.
#[allow(clippy::too_many_arguments)]
pub fn build_timer<A, I, S, B>(
    sensor: A,
    indicator: I,
    sounder: S,
    buttons: B,
    mute: Option<Box<dyn MuteSwitch>>,
    debounce: DebounceCfg,
    thresholds: ThresholdCfg,
    alarm: AlarmCfg,
    feedback: FeedbackCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<TimerOrchestrator<A, I, S, B>>
where
    A: Accelerometer,
    I: Indicator,
    S: Sounder,
    B: ButtonPad,
{
    validate_and_build(
        sensor, indicator, sounder, buttons, mute, debounce, thresholds, alarm, feedback, clock,
    )
}

#[allow(clippy::too_many_arguments)]
fn validate_and_build<A, I, S, B>(
    sensor: A,
    indicator: I,
    sounder: S,
    buttons: B,
    mute: Option<Box<dyn MuteSwitch>>,
    debounce: DebounceCfg,
    thresholds: ThresholdCfg,
    alarm: AlarmCfg,
    feedback: FeedbackCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<TimerOrchestrator<A, I, S, B>>
where
    A: Accelerometer,
    I: Indicator,
    S: Sounder,
    B: ButtonPad,
{
    // ── Validation ───────────────────────────────────────────────────────────
    if debounce.window_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "debounce window_ms must be >= 1",
        )));
    }
    if thresholds.warn_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "warn_ms must be >= 1",
        )));
    }
    if thresholds.warn_ms >= thresholds.critical_ms
        || thresholds.critical_ms >= thresholds.alarm_ms
    {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "thresholds must be strictly increasing",
        )));
    }
    if thresholds.grace_unit_ms == 0 || thresholds.grace_unit_ms > thresholds.alarm_ms {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "grace_unit_ms must be in 1..=alarm_ms",
        )));
    }
    if alarm.visible_interval_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "visible_interval_ms must be >= 1",
        )));
    }
    if alarm.audible_min_ms == 0 || alarm.audible_min_ms > alarm.audible_max_ms {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "audible interval floor must be in 1..=audible_max_ms",
        )));
    }
    if alarm.beep_on_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "beep_on_ms must be >= 1",
        )));
    }
    if alarm.beeps_per_burst == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "beeps_per_burst must be >= 1",
        )));
    }
    if alarm.tone_hz == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "tone_hz must be > 0",
        )));
    }
    if feedback.chirp_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "chirp_ms must be >= 1",
        )));
    }

    // ── Construction ─────────────────────────────────────────────────────────
    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(boxed) => Arc::from(boxed),
        None => Arc::new(MonotonicClock::new()),
    };
    let epoch = clock.now();
    let baseline_ms = clock.ms_since(epoch);

    Ok(TimerOrchestrator {
        sensor,
        indicator,
        sounder,
        buttons,
        mute,
        clock,
        epoch,
        lid: LidMonitor::new(debounce.window_ms),
        alarm: AlarmController::new(alarm),
        thresholds,
        feedback,
        baseline_ms,
        history: VecDeque::with_capacity(crate::orchestrator::HISTORY_CAPACITY + 1),
        prev_presses: ButtonSet::EMPTY,
        chirp_until_ms: None,
        last_color: None,
        last_severity: Severity::Ok,
    })
}
