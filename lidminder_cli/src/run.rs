//! Device assembly and the polling loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lidminder_config::Config;
use lidminder_core::Timer;
use lidminder_core::error::Result as CoreResult;
use lidminder_traits::clock::{Clock, MonotonicClock};

use crate::cli::JSON_MODE;

/// Dwell per color during the power-on self test.
const POST_DWELL_MS: u64 = 500;

pub struct RunOpts {
    pub max_ticks: Option<u64>,
    pub poll_ms: Option<u64>,
    pub post: bool,
    pub start_raised: bool,
}

/// Drive the timer until Ctrl-C or `max_ticks`, then print a summary.
pub fn run(cfg: &Config, opts: &RunOpts, shutdown: &Arc<AtomicBool>) -> CoreResult<()> {
    let mut timer = build_timer_from(cfg, opts.start_raised)?;
    if opts.post {
        timer.post(POST_DWELL_MS);
    }

    let poll_ms = opts.poll_ms.unwrap_or(cfg.run.poll_ms);
    let clock = MonotonicClock::new();
    tracing::info!(poll_ms, "lid timer running");

    let mut ticks: u64 = 0;
    loop {
        if shutdown.load(Ordering::SeqCst) {
            tracing::info!("shutdown requested");
            break;
        }
        timer.tick();
        ticks += 1;
        if let Some(max) = opts.max_ticks
            && ticks >= max
        {
            break;
        }
        if poll_ms > 0 {
            clock.sleep(Duration::from_millis(poll_ms));
        }
    }

    print_summary(&timer, ticks);
    Ok(())
}

/// Cycle the indicator colors once and exit.
pub fn selftest(cfg: &Config) -> CoreResult<()> {
    let mut timer = build_timer_from(cfg, false)?;
    timer.post(POST_DWELL_MS);
    println!("selftest complete");
    Ok(())
}

fn print_summary(timer: &Timer, ticks: u64) {
    let severity = format!("{:?}", timer.last_severity()).to_lowercase();
    let lid = format!("{:?}", timer.lid_state()).to_lowercase();
    if JSON_MODE.get().copied().unwrap_or(false) {
        println!(
            "{}",
            serde_json::json!({
                "ticks": ticks,
                "lid": lid,
                "severity": severity,
                "alarm_active": timer.alarm_active(),
                "history_depth": timer.history_depth(),
            })
        );
    } else {
        println!(
            "ticks={ticks} lid={lid} severity={severity} alarm_active={} history_depth={}",
            timer.alarm_active(),
            timer.history_depth(),
        );
    }
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn build_timer_from(cfg: &Config, start_raised: bool) -> CoreResult<Timer> {
    use lidminder_hardware::{
        SimulatedAccelerometer, SimulatedButtonPad, SimulatedIndicator, SimulatedSounder,
    };

    Timer::builder()
        .with_sensor(SimulatedAccelerometer::new(start_raised))
        .with_indicator(SimulatedIndicator::new())
        .with_sounder(SimulatedSounder::new())
        .with_buttons(SimulatedButtonPad::new())
        .with_debounce((&cfg.debounce).into())
        .with_thresholds((&cfg.thresholds).into())
        .with_alarm((&cfg.alarm).into())
        .with_feedback((&cfg.feedback).into())
        .build()
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn build_timer_from(cfg: &Config, _start_raised: bool) -> CoreResult<Timer> {
    use eyre::WrapErr;
    use lidminder_hardware::lis3dh::Lis3dh;
    use lidminder_hardware::{GpioButtonPad, GpioIndicator, GpioMuteSwitch, PwmSounder};

    let sensor =
        Lis3dh::new(cfg.pins.i2c_bus, cfg.pins.accel_addr).wrap_err("open accelerometer")?;
    let indicator = GpioIndicator::new(cfg.pins.led_r, cfg.pins.led_g, cfg.pins.led_b)
        .wrap_err("open indicator pins")?;
    let sounder = PwmSounder::new(cfg.pins.buzzer_pwm).wrap_err("open buzzer pwm")?;
    let buttons =
        GpioButtonPad::new(cfg.pins.button_a, cfg.pins.button_b).wrap_err("open button pins")?;

    let mut builder = Timer::builder()
        .with_sensor(sensor)
        .with_indicator(indicator)
        .with_sounder(sounder)
        .with_buttons(buttons)
        .with_debounce((&cfg.debounce).into())
        .with_thresholds((&cfg.thresholds).into())
        .with_alarm((&cfg.alarm).into())
        .with_feedback((&cfg.feedback).into());

    if let Some(pin) = cfg.pins.mute_switch {
        match GpioMuteSwitch::new(pin) {
            Ok(sw) => builder = builder.with_mute_switch(sw),
            Err(e) => {
                tracing::warn!(error = %e, pin, "failed to init mute switch; continuing without it");
            }
        }
    }
    builder.build()
}
