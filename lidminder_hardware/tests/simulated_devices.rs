use lidminder_hardware::{
    SimulatedAccelerometer, SimulatedButtonPad, SimulatedIndicator, SimulatedSounder,
};
use lidminder_traits::{
    Accelerometer, Button, ButtonPad, ButtonSet, Indicator, IndicatorColor, Sounder,
};
use rstest::rstest;

#[rstest]
#[case(true)]
#[case(false)]
fn simulated_accelerometer_tracks_lid_handle(#[case] start_raised: bool) {
    let mut accel = SimulatedAccelerometer::new(start_raised);
    let lid = accel.lid_handle();

    let s = accel.sample().expect("sample");
    // Gravity lands on z only when the lid is down.
    assert_eq!(s.z.abs() > 4.0, !start_raised);

    lid.set(!start_raised);
    let s = accel.sample().expect("sample");
    assert_eq!(s.z.abs() > 4.0, start_raised);
}

#[test]
fn simulated_indicator_and_sounder_accept_all_commands() {
    let mut indicator = SimulatedIndicator::new();
    for color in [
        IndicatorColor::Ok,
        IndicatorColor::Warn,
        IndicatorColor::Critical,
        IndicatorColor::Alert,
        IndicatorColor::Off,
    ] {
        indicator.set_color(color).expect("set_color");
    }

    let mut sounder = SimulatedSounder::new();
    sounder.start_tone(1_760).expect("start");
    sounder.start_tone(1_760).expect("repeat start is fine");
    sounder.stop_tone().expect("stop");
    sounder.stop_tone().expect("repeat stop is fine");
}

#[test]
fn simulated_buttons_report_injected_presses() {
    let mut pad = SimulatedButtonPad::new();
    let handle = pad.press_handle();

    assert!(pad.pressed().expect("read").is_empty());
    handle.set(ButtonSet::EMPTY.with(Button::A));
    assert!(pad.pressed().expect("read").contains(Button::A));
    handle.set(ButtonSet::EMPTY);
    assert!(pad.pressed().expect("read").is_empty());
}
