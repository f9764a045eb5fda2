//! Severity level derived from elapsed time since the baseline.

use lidminder_traits::IndicatorColor;

/// Four-level severity, determined purely by elapsed time since the lid
/// was last confirmed closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Within the warn threshold; nothing to report.
    Ok,
    /// Past warn, within critical.
    Warn,
    /// Past critical, within alarm.
    Critical,
    /// Past the alarm threshold; the escalating alert owns the outputs.
    Alarm,
}

impl Severity {
    /// Indicator color for the steady (non-alarming) display.
    pub fn color(self) -> IndicatorColor {
        match self {
            Self::Ok => IndicatorColor::Ok,
            Self::Warn => IndicatorColor::Warn,
            Self::Critical => IndicatorColor::Critical,
            Self::Alarm => IndicatorColor::Alert,
        }
    }
}
