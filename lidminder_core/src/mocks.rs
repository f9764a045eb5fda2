//! Test and helper mocks for lidminder_core.
//!
//! Shared-handle devices: each mock hands out a cheap clone of its state so
//! a test can keep steering/inspecting it after the device moves into the
//! engine.

use std::cell::Cell;
use std::error::Error;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use lidminder_traits::clock::Clock;
use lidminder_traits::{
    Accelerometer, ButtonPad, ButtonSet, Indicator, IndicatorColor, OrientationSample, Sounder,
};

/// Deterministic clock advanced manually by tests.
///
/// now() = origin + offset; sleep(d) advances by d without sleeping.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(Duration::from_millis(ms));
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let off = self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO);
        self.origin + off
    }

    fn sleep(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(d);
        }
    }
}

/// Accelerometer returning whatever orientation the shared handle holds.
pub struct ScriptedAccelerometer {
    current: Rc<Cell<OrientationSample>>,
}

/// A sample that classifies as RAISED (gravity off the z axis).
pub fn raised_sample() -> OrientationSample {
    OrientationSample::new(9.8, 0.2, 0.3)
}

/// A sample that classifies as LOWERED (gravity on the z axis).
pub fn lowered_sample() -> OrientationSample {
    OrientationSample::new(0.2, 0.1, 9.8)
}

/// A sample on neither side of the classification rule.
pub fn ambiguous_sample() -> OrientationSample {
    OrientationSample::new(6.0, 1.0, 7.0)
}

impl ScriptedAccelerometer {
    pub fn new(initial: OrientationSample) -> (Self, Rc<Cell<OrientationSample>>) {
        let current = Rc::new(Cell::new(initial));
        (
            Self {
                current: current.clone(),
            },
            current,
        )
    }
}

impl Accelerometer for ScriptedAccelerometer {
    fn sample(&mut self) -> Result<OrientationSample, Box<dyn Error + Send + Sync>> {
        Ok(self.current.get())
    }
}

/// Indicator remembering the last color written.
pub struct RecordingIndicator {
    last: Rc<Cell<Option<IndicatorColor>>>,
}

impl RecordingIndicator {
    pub fn new() -> (Self, Rc<Cell<Option<IndicatorColor>>>) {
        let last = Rc::new(Cell::new(None));
        (Self { last: last.clone() }, last)
    }
}

impl Indicator for RecordingIndicator {
    fn set_color(
        &mut self,
        color: IndicatorColor,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.last.set(Some(color));
        Ok(())
    }
}

/// Shared view of a `RecordingSounder`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SounderState {
    /// Whether a tone is currently on.
    pub on: bool,
    /// Frequency of the last started tone.
    pub last_hz: u32,
    /// Total `start_tone` calls.
    pub starts: u32,
    /// Total `stop_tone` calls.
    pub stops: u32,
}

/// Sounder counting starts/stops and tracking the current tone.
pub struct RecordingSounder {
    state: Rc<Cell<SounderState>>,
}

impl RecordingSounder {
    pub fn new() -> (Self, Rc<Cell<SounderState>>) {
        let state = Rc::new(Cell::new(SounderState::default()));
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

impl Sounder for RecordingSounder {
    fn start_tone(&mut self, freq_hz: u32) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut s = self.state.get();
        s.on = true;
        s.last_hz = freq_hz;
        s.starts += 1;
        self.state.set(s);
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut s = self.state.get();
        s.on = false;
        s.stops += 1;
        self.state.set(s);
        Ok(())
    }
}

/// Button pad reporting whatever the shared handle holds.
pub struct ScriptedButtonPad {
    pressed: Rc<Cell<ButtonSet>>,
}

impl ScriptedButtonPad {
    pub fn new() -> (Self, Rc<Cell<ButtonSet>>) {
        let pressed = Rc::new(Cell::new(ButtonSet::EMPTY));
        (
            Self {
                pressed: pressed.clone(),
            },
            pressed,
        )
    }
}

impl ButtonPad for ScriptedButtonPad {
    fn pressed(&mut self) -> Result<ButtonSet, Box<dyn Error + Send + Sync>> {
        Ok(self.pressed.get())
    }
}

/// A sounder that always errors; useful for best-effort degradation tests.
pub struct FailingSounder;

impl Sounder for FailingSounder {
    fn start_tone(&mut self, _freq_hz: u32) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("sounder offline")))
    }

    fn stop_tone(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("sounder offline")))
    }
}
