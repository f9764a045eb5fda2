#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core lid-timer logic (hardware-agnostic).
//!
//! This crate provides the behavioral engine of the lid timer. All device
//! interactions go through the `lidminder_traits` capability traits, so the
//! engine runs unchanged against real hardware, the simulation backend, or
//! synthetic devices in tests.
//!
//! ## Architecture
//!
//! - **Lid**: debounced orientation classifier with edge detection (`lid`)
//! - **Alarm**: escalating visible + audible alert (`alarm`)
//! - **Orchestrator**: severity mapping, undo history, snooze (`orchestrator`)
//! - **Configuration**: runtime config structs (`config`)
//! - **Severity**: four-level elapsed-time state (`status`)
//!
//! ## Timing
//!
//! The engine never sleeps. Every periodic behavior compares the current
//! timestamp against a stored next-fire time, so a tick is always cheap and
//! lid/button handling is never blocked by an in-progress alert. Timestamps
//! are `u64` milliseconds from the injected clock and all deadline math is
//! modular (`util`), tolerating a wrapping time source.

// Module declarations
pub mod alarm;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod lid;
pub mod mocks;
pub mod orchestrator;
pub mod status;
pub mod util;

pub use alarm::AlarmController;
pub use builder::{Timer, TimerBuilder, build_timer};
pub use config::{AlarmCfg, DebounceCfg, FeedbackCfg, ThresholdCfg};
pub use error::{BuildError, Result};
pub use lid::{LidMonitor, LidState};
pub use orchestrator::TimerOrchestrator;
pub use status::Severity;
