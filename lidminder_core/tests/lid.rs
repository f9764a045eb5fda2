use lidminder_core::lid::{LidMonitor, LidState};
use lidminder_core::mocks::{ambiguous_sample, lowered_sample, raised_sample};

const WINDOW_MS: u64 = 100;

#[test]
fn starts_unknown() {
    let lid = LidMonitor::new(WINDOW_MS);
    assert_eq!(lid.confirmed(), LidState::Unknown);
    assert!(!lid.is_raised());
    assert!(!lid.is_lowered());
}

#[test]
fn promotes_after_sustained_window() {
    let mut lid = LidMonitor::new(WINDOW_MS);
    lid.observe(lowered_sample(), 0);
    assert_eq!(lid.confirmed(), LidState::Unknown); // candidate only
    lid.observe(lowered_sample(), 50);
    assert_eq!(lid.confirmed(), LidState::Unknown); // still inside window
    lid.observe(lowered_sample(), 100);
    assert_eq!(lid.confirmed(), LidState::Lowered);
    assert!(lid.is_lowered());
    assert!(lid.consume_edge(LidState::Lowered));
}

#[test]
fn alternating_stream_never_promotes() {
    // RAISED/LOWERED every 50 ms for 500 ms never sustains a window; a
    // 150 ms hold afterwards promotes with exactly one edge.
    let mut lid = LidMonitor::new(WINDOW_MS);
    for i in 0..10u64 {
        let sample = if i % 2 == 0 {
            raised_sample()
        } else {
            lowered_sample()
        };
        lid.observe(sample, i * 50);
        assert_eq!(lid.confirmed(), LidState::Unknown);
        assert!(!lid.consume_edge(LidState::Raised));
        assert!(!lid.consume_edge(LidState::Lowered));
    }

    let mut edges = 0;
    for t in [500u64, 550, 600, 650] {
        lid.observe(raised_sample(), t);
        if lid.consume_edge(LidState::Raised) {
            edges += 1;
        }
    }
    assert_eq!(edges, 1);
    assert!(lid.is_raised());
}

#[test]
fn outlier_replaces_candidate_without_touching_confirmed() {
    let mut lid = LidMonitor::new(WINDOW_MS);
    // Establish LOWERED.
    lid.observe(lowered_sample(), 0);
    lid.observe(lowered_sample(), 120);
    assert!(lid.is_lowered());
    lid.consume_edge(LidState::Lowered);

    // Start a RAISED candidate, interrupt it with one LOWERED outlier...
    lid.observe(raised_sample(), 200);
    lid.observe(lowered_sample(), 250); // steady state: clears candidate
    assert!(lid.is_lowered());
    // ...so the next RAISED run restarts its window from scratch.
    lid.observe(raised_sample(), 300);
    lid.observe(raised_sample(), 390);
    assert!(lid.is_lowered()); // 90 ms < window
    lid.observe(raised_sample(), 400);
    assert!(lid.is_raised());
}

#[test]
fn ambiguous_samples_do_not_touch_debounce_state() {
    let mut lid = LidMonitor::new(WINDOW_MS);
    lid.observe(raised_sample(), 0);
    // A long ambiguous stretch neither promotes nor clears the candidate.
    for t in [10u64, 30, 60, 90] {
        lid.observe(ambiguous_sample(), t);
    }
    assert_eq!(lid.confirmed(), LidState::Unknown);
    // The original candidate is still alive and promotes on its own window.
    lid.observe(raised_sample(), 100);
    assert!(lid.is_raised());
}

#[test]
fn edge_is_one_shot_and_cleared_by_any_consume() {
    let mut lid = LidMonitor::new(WINDOW_MS);
    lid.observe(raised_sample(), 0);
    lid.observe(raised_sample(), 150);
    assert!(lid.is_raised());

    // A mismatched consume clears the pending edge too.
    assert!(!lid.consume_edge(LidState::Lowered));
    assert!(!lid.consume_edge(LidState::Raised));

    // No promotion, no edge.
    lid.observe(raised_sample(), 300);
    assert!(!lid.consume_edge(LidState::Raised));
}

#[test]
fn reverse_promotion_fires_opposite_edge() {
    let mut lid = LidMonitor::new(WINDOW_MS);
    lid.observe(raised_sample(), 0);
    lid.observe(raised_sample(), 100);
    assert!(lid.consume_edge(LidState::Raised));

    lid.observe(lowered_sample(), 200);
    lid.observe(lowered_sample(), 300);
    assert!(lid.is_lowered());
    assert!(lid.consume_edge(LidState::Lowered));
    assert!(!lid.consume_edge(LidState::Lowered));
}
