//! Device backends for the lid timer.
//!
//! The simulated backend is always available and is what the CLI uses off
//! the device; it narrates actuator activity through `tracing` so a dry run
//! shows what the hardware would do. The `hardware` feature adds Raspberry
//! Pi backends via `rppal`: an LIS3DH accelerometer on I²C, an RGB LED on
//! three GPIO lines, a buzzer on a PWM channel, and GPIO buttons.

pub mod error;
#[cfg(feature = "hardware")]
pub mod lis3dh;

use std::cell::Cell;
use std::error::Error;
use std::rc::Rc;

use lidminder_traits::{
    Accelerometer, ButtonPad, ButtonSet, Indicator, IndicatorColor, OrientationSample, Sounder,
};

/// Simulated accelerometer: reports a fixed lid orientation that a test or
/// demo harness can flip through the shared handle.
pub struct SimulatedAccelerometer {
    raised: Rc<Cell<bool>>,
}

impl SimulatedAccelerometer {
    pub fn new(start_raised: bool) -> Self {
        Self {
            raised: Rc::new(Cell::new(start_raised)),
        }
    }

    /// Handle for flipping the simulated lid from outside the engine.
    pub fn lid_handle(&self) -> Rc<Cell<bool>> {
        self.raised.clone()
    }
}

impl Accelerometer for SimulatedAccelerometer {
    fn sample(&mut self) -> Result<OrientationSample, Box<dyn Error + Send + Sync>> {
        // Gravity on x when the lid hangs open, on z when it lies closed.
        let sample = if self.raised.get() {
            OrientationSample::new(9.8, 0.1, 0.2)
        } else {
            OrientationSample::new(0.1, 0.2, 9.8)
        };
        Ok(sample)
    }
}

/// Simulated indicator: narrates color changes.
#[derive(Default)]
pub struct SimulatedIndicator {
    current: Option<IndicatorColor>,
}

impl SimulatedIndicator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Indicator for SimulatedIndicator {
    fn set_color(&mut self, color: IndicatorColor) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.current != Some(color) {
            self.current = Some(color);
            tracing::info!(?color, "indicator (simulated)");
        }
        Ok(())
    }
}

/// Simulated sounder: narrates tone changes.
#[derive(Default)]
pub struct SimulatedSounder {
    freq_hz: Option<u32>,
}

impl SimulatedSounder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sounder for SimulatedSounder {
    fn start_tone(&mut self, freq_hz: u32) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.freq_hz != Some(freq_hz) {
            self.freq_hz = Some(freq_hz);
            tracing::info!(freq_hz, "tone on (simulated)");
        }
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.freq_hz.take().is_some() {
            tracing::info!("tone off (simulated)");
        }
        Ok(())
    }
}

/// Simulated button pad: presses are injected through the shared handle.
pub struct SimulatedButtonPad {
    pressed: Rc<Cell<ButtonSet>>,
}

impl Default for SimulatedButtonPad {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedButtonPad {
    pub fn new() -> Self {
        Self {
            pressed: Rc::new(Cell::new(ButtonSet::EMPTY)),
        }
    }

    pub fn press_handle(&self) -> Rc<Cell<ButtonSet>> {
        self.pressed.clone()
    }
}

impl ButtonPad for SimulatedButtonPad {
    fn pressed(&mut self) -> Result<ButtonSet, Box<dyn Error + Send + Sync>> {
        Ok(self.pressed.get())
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub use hardware::{GpioButtonPad, GpioIndicator, GpioMuteSwitch, PwmSounder};

#[cfg(all(feature = "hardware", target_os = "linux"))]
mod hardware {
    use super::*;
    use crate::error::HwError;
    use lidminder_traits::{Button, MuteSwitch};
    use rppal::gpio::{Gpio, InputPin, OutputPin};
    use rppal::pwm::{Channel, Polarity, Pwm};

    fn gpio_err(e: rppal::gpio::Error) -> HwError {
        HwError::Gpio(e.to_string())
    }

    fn drive(pin: &mut OutputPin, on: bool) {
        if on {
            pin.set_high();
        } else {
            pin.set_low();
        }
    }

    /// Common-cathode RGB LED on three GPIO lines.
    pub struct GpioIndicator {
        r: OutputPin,
        g: OutputPin,
        b: OutputPin,
    }

    impl GpioIndicator {
        pub fn new(r_pin: u8, g_pin: u8, b_pin: u8) -> Result<Self, HwError> {
            let gpio = Gpio::new().map_err(gpio_err)?;
            Ok(Self {
                r: gpio.get(r_pin).map_err(gpio_err)?.into_output_low(),
                g: gpio.get(g_pin).map_err(gpio_err)?.into_output_low(),
                b: gpio.get(b_pin).map_err(gpio_err)?.into_output_low(),
            })
        }

        fn write(&mut self, r: bool, g: bool, b: bool) {
            drive(&mut self.r, r);
            drive(&mut self.g, g);
            drive(&mut self.b, b);
        }
    }

    impl Indicator for GpioIndicator {
        fn set_color(
            &mut self,
            color: IndicatorColor,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            match color {
                IndicatorColor::Ok => self.write(false, true, false),
                // amber: red + green
                IndicatorColor::Warn => self.write(true, true, false),
                IndicatorColor::Critical | IndicatorColor::Alert => {
                    self.write(true, false, false);
                }
                IndicatorColor::Off => self.write(false, false, false),
            }
            Ok(())
        }
    }

    /// Buzzer on a hardware PWM channel; 50% duty square wave.
    pub struct PwmSounder {
        pwm: Pwm,
    }

    impl PwmSounder {
        pub fn new(channel: u8) -> Result<Self, HwError> {
            let channel = match channel {
                0 => Channel::Pwm0,
                _ => Channel::Pwm1,
            };
            let pwm = Pwm::with_frequency(channel, 440.0, 0.5, Polarity::Normal, false)
                .map_err(|e| HwError::Pwm(e.to_string()))?;
            Ok(Self { pwm })
        }
    }

    impl Sounder for PwmSounder {
        fn start_tone(
            &mut self,
            freq_hz: u32,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.pwm
                .set_frequency(f64::from(freq_hz), 0.5)
                .map_err(|e| HwError::Pwm(e.to_string()))?;
            self.pwm
                .enable()
                .map_err(|e| HwError::Pwm(e.to_string()))?;
            Ok(())
        }

        fn stop_tone(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.pwm
                .disable()
                .map_err(|e| HwError::Pwm(e.to_string()))?;
            Ok(())
        }
    }

    /// Two momentary buttons wired active-low with internal pull-ups.
    pub struct GpioButtonPad {
        a: InputPin,
        b: InputPin,
    }

    impl GpioButtonPad {
        pub fn new(a_pin: u8, b_pin: u8) -> Result<Self, HwError> {
            let gpio = Gpio::new().map_err(gpio_err)?;
            Ok(Self {
                a: gpio.get(a_pin).map_err(gpio_err)?.into_input_pullup(),
                b: gpio.get(b_pin).map_err(gpio_err)?.into_input_pullup(),
            })
        }
    }

    impl ButtonPad for GpioButtonPad {
        fn pressed(
            &mut self,
        ) -> Result<ButtonSet, Box<dyn std::error::Error + Send + Sync>> {
            let mut set = ButtonSet::EMPTY;
            if self.a.is_low() {
                set.insert(Button::A);
            }
            if self.b.is_low() {
                set.insert(Button::B);
            }
            Ok(set)
        }
    }

    /// Slide switch wired active-low with an internal pull-up.
    pub struct GpioMuteSwitch {
        pin: InputPin,
    }

    impl GpioMuteSwitch {
        pub fn new(pin: u8) -> Result<Self, HwError> {
            let gpio = Gpio::new().map_err(gpio_err)?;
            Ok(Self {
                pin: gpio.get(pin).map_err(gpio_err)?.into_input_pullup(),
            })
        }
    }

    impl MuteSwitch for GpioMuteSwitch {
        fn engaged(&mut self) -> bool {
            self.pin.is_low()
        }
    }
}
