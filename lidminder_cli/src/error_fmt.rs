//! Human-readable error descriptions and structured JSON error formatting.

use lidminder_core::error::BuildError;

/// Map an eyre::Report to a human-readable explanation with likely causes
/// and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingAccelerometer => {
                "What happened: No accelerometer was provided to the timer engine.\nLikely causes: The sensor failed to initialize or was not wired into the builder.\nHow to fix: Ensure the accelerometer is created successfully and passed via with_sensor(...).".to_string()
            }
            BuildError::MissingIndicator => {
                "What happened: No indicator was provided to the timer engine.\nLikely causes: The LED driver failed to initialize or was not wired into the builder.\nHow to fix: Ensure the indicator is created successfully and passed via with_indicator(...).".to_string()
            }
            BuildError::MissingSounder => {
                "What happened: No sounder was provided to the timer engine.\nLikely causes: The buzzer failed to initialize or was not wired into the builder.\nHow to fix: Ensure the sounder is created successfully and passed via with_sounder(...).".to_string()
            }
            BuildError::MissingButtons => {
                "What happened: No button pad was provided to the timer engine.\nLikely causes: The GPIO buttons failed to initialize or were not wired into the builder.\nHow to fix: Ensure the button pad is created successfully and passed via with_buttons(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("config file not found") {
        return format!(
            "What happened: {msg}.\nLikely causes: Wrong --config path or the file was never created.\nHow to fix: Point --config at an existing TOML file, or omit it to use built-in defaults."
        );
    }

    if lower.contains("parse config") {
        return format!(
            "What happened: {msg}.\nLikely causes: A typo or wrong value type in the TOML.\nHow to fix: Correct the reported line in the config file and rerun."
        );
    }

    if lower.contains("accelerometer") || lower.contains("i2c") {
        return format!(
            "What happened: {msg}.\nLikely causes: Wrong [pins] i2c_bus/accel_addr, wiring or power issues, or I2C disabled on the host.\nHow to fix: Check the sensor wiring and the [pins] section; enable the I2C interface on the device."
        );
    }

    if lower.contains("indicator pins")
        || lower.contains("button pins")
        || lower.contains("buzzer pwm")
    {
        return format!(
            "What happened: {msg}.\nLikely causes: Incorrect pin numbers or insufficient GPIO/PWM permissions.\nHow to fix: Fix the [pins] values in the config; ensure the process may access GPIO and PWM."
        );
    }

    format!(
        "What happened: {msg}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
    )
}

/// Structured single-line error object for --json mode.
pub fn json_error(err: &eyre::Report) -> String {
    serde_json::json!({
        "error": err.to_string(),
        "detail": format!("{err:#}"),
    })
    .to_string()
}
