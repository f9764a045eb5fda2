use lidminder_config::load_toml;
use rstest::rstest;

#[test]
fn empty_toml_yields_spec_defaults() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults must validate");
    assert_eq!(cfg.debounce.window_ms, 100);
    assert_eq!(cfg.thresholds.warn_ms, 4 * 3_600_000);
    assert_eq!(cfg.thresholds.critical_ms, 8 * 3_600_000);
    assert_eq!(cfg.thresholds.alarm_ms, 12 * 3_600_000);
    assert_eq!(cfg.alarm.audible_max_ms, 3_600_000);
    assert_eq!(cfg.alarm.audible_min_ms, 60_000);
    assert_eq!(cfg.alarm.beeps_per_burst, 3);
    assert_eq!(cfg.alarm.tone_hz, 1_760);
}

#[test]
fn rejects_non_increasing_thresholds() {
    let toml = r#"
[thresholds]
warn_ms = 1000
critical_ms = 1000
alarm_ms = 2000
grace_unit_ms = 100
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject warn == critical");
    assert!(format!("{err}").contains("strictly increasing"));
}

#[test]
fn rejects_grace_unit_beyond_alarm() {
    let toml = r#"
[thresholds]
warn_ms = 1000
critical_ms = 2000
alarm_ms = 3000
grace_unit_ms = 4000
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject oversized grace");
    assert!(format!("{err}").contains("grace_unit_ms"));
}

#[rstest]
#[case("[debounce]\nwindow_ms = 0\n", "debounce.window_ms")]
#[case(
    "[alarm]\naudible_max_ms = 1000\naudible_min_ms = 2000\n",
    "audible_min_ms"
)]
#[case("[alarm]\nbeeps_per_burst = 0\n", "beeps_per_burst")]
#[case("[alarm]\ntone_hz = 0\n", "tone_hz")]
#[case("[feedback]\nchirp_ms = 0\n", "feedback.chirp_ms")]
fn rejects_out_of_range_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "error {err} does not mention {needle}"
    );
}

#[test]
fn accepts_snooze_unit_alias() {
    let toml = r#"
[thresholds]
warn_ms = 1000
critical_ms = 2000
alarm_ms = 3000
snooze_unit_ms = 500
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("alias config must validate");
    assert_eq!(cfg.thresholds.grace_unit_ms, 500);
}

#[test]
fn tolerates_pins_for_sim_backend() {
    let toml = r#"
[pins]
i2c_bus = 1
accel_addr = 24
led_r = 17
led_g = 27
led_b = 22
button_a = 5
button_b = 6
mute_switch = 13
buzzer_pwm = 0
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("pins-only config must validate");
    assert_eq!(cfg.pins.mute_switch, Some(13));
}
