use lidminder_core::alarm::AlarmController;
use lidminder_core::lid::{LidMonitor, LidState};
use lidminder_core::mocks::{
    ManualClock, RecordingIndicator, RecordingSounder, ScriptedAccelerometer, ScriptedButtonPad,
    lowered_sample, raised_sample,
};
use lidminder_core::{AlarmCfg, Timer};
use lidminder_traits::{Button, ButtonSet};
use proptest::prelude::*;

const WINDOW_MS: u64 = 100;

prop_compose! {
    /// Alternating RAISED/LOWERED runs, each shorter than the debounce
    /// window, sampled every 10 ms.
    fn jitter_runs()(
        start_raised in any::<bool>(),
        runs in prop::collection::vec(1u64..=9, 1..40),
    ) -> Vec<(bool, u64)> {
        runs.iter()
            .enumerate()
            .map(|(i, ticks)| ((i % 2 == 0) == start_raised, ticks * 10))
            .collect()
    }
}

proptest! {
    #[test]
    fn no_promotion_without_a_sustained_window(runs in jitter_runs()) {
        let mut lid = LidMonitor::new(WINDOW_MS);
        let mut t = 0u64;
        for (raised, run_ms) in &runs {
            let sample = if *raised { raised_sample() } else { lowered_sample() };
            let mut held = 0u64;
            while held < *run_ms {
                lid.observe(sample, t);
                prop_assert_eq!(lid.confirmed(), LidState::Unknown);
                t += 10;
                held += 10;
            }
        }

        // A genuine 150 ms hold then promotes, with exactly one edge.
        let final_state = LidState::Raised;
        let mut edges = 0;
        for _ in 0..16 {
            lid.observe(raised_sample(), t);
            if lid.consume_edge(final_state) {
                edges += 1;
            }
            t += 10;
        }
        prop_assert_eq!(edges, 1);
        prop_assert_eq!(lid.confirmed(), final_state);
    }

    #[test]
    fn audible_interval_never_increases_while_active(
        gaps in prop::collection::vec(1u64..2_000, 1..60),
    ) {
        let cfg = AlarmCfg {
            audible_max_ms: 1_000,
            audible_min_ms: 100,
            ..AlarmCfg::default()
        };
        let (mut ind, _) = RecordingIndicator::new();
        let (mut snd, _) = RecordingSounder::new();
        let mut alarm = AlarmController::new(cfg);

        alarm.trigger(0);
        let mut now = 0u64;
        let mut last = alarm.audible_interval_ms();
        prop_assert_eq!(last, 1_000);
        for gap in gaps {
            now += gap;
            alarm.service(now, &mut ind, &mut snd, false);
            let interval = alarm.audible_interval_ms();
            prop_assert!(interval <= last, "interval grew {last} -> {interval}");
            prop_assert!(interval >= 100, "interval below floor: {interval}");
            last = interval;
        }

        // Only a full off-cycle rewinds the escalation.
        alarm.deactivate(&mut snd);
        alarm.trigger(now);
        prop_assert_eq!(alarm.audible_interval_ms(), 1_000);
    }

    #[test]
    fn history_stays_bounded_and_alarm_respects_raised_lid(
        ops in prop::collection::vec((0u8..3, 0u64..5 * 3_600_000), 1..30),
    ) {
        let clock = ManualClock::new();
        let (accel, orientation) = ScriptedAccelerometer::new(lowered_sample());
        let (indicator, _) = RecordingIndicator::new();
        let (sounder, _) = RecordingSounder::new();
        let (pad, buttons) = ScriptedButtonPad::new();
        let mut timer = Timer::builder()
            .with_sensor(accel)
            .with_indicator(indicator)
            .with_sounder(sounder)
            .with_buttons(pad)
            .with_clock(clock.clone())
            .build()
            .unwrap();

        let mut settle = |timer: &mut Timer, raised: bool| {
            orientation.set(if raised { raised_sample() } else { lowered_sample() });
            clock.advance_ms(1);
            timer.tick();
            clock.advance_ms(150);
            timer.tick();
        };
        settle(&mut timer, false);

        for (op, advance) in ops {
            clock.advance_ms(advance);
            timer.tick();
            match op {
                0 => {
                    settle(&mut timer, true);
                    settle(&mut timer, false);
                }
                1 | 2 => {
                    let button = if op == 1 { Button::A } else { Button::B };
                    let depth_before = timer.history_depth();
                    let baseline_before = timer.baseline_ms();
                    buttons.set(ButtonSet::EMPTY.with(button));
                    timer.tick();
                    buttons.set(ButtonSet::EMPTY);
                    timer.tick();
                    if op == 1 && depth_before == 0 {
                        prop_assert_eq!(timer.baseline_ms(), baseline_before);
                    }
                }
                _ => unreachable!(),
            }
            prop_assert!(timer.history_depth() <= 10);
            if timer.lid_state() == LidState::Raised {
                prop_assert!(!timer.alarm_active(), "alarm active with lid raised");
            }
        }
    }
}
