//! Enumerated lookback windows
//!
//! Every feed query is bounded by one of a fixed set of windows. Cache keys
//! are derived from the window label, and hierarchical cache reuse relies on
//! the covers-relation between windows.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A fixed lookback duration bounding aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    /// Last hour
    OneHour,
    /// Last 3 hours
    ThreeHours,
    /// Last 24 hours
    OneDay,
    /// Last 7 days
    SevenDays,
    /// Last 30 days
    ThirtyDays,
}

impl TimeWindow {
    /// All windows, narrowest first
    pub const ALL: [TimeWindow; 5] = [
        TimeWindow::OneHour,
        TimeWindow::ThreeHours,
        TimeWindow::OneDay,
        TimeWindow::SevenDays,
        TimeWindow::ThirtyDays,
    ];

    /// Parse a window label ("1h", "3h", "24h", "7d", "30d")
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "1h" => Some(TimeWindow::OneHour),
            "3h" => Some(TimeWindow::ThreeHours),
            "24h" => Some(TimeWindow::OneDay),
            "7d" => Some(TimeWindow::SevenDays),
            "30d" => Some(TimeWindow::ThirtyDays),
            _ => None,
        }
    }

    /// Parse a window label, falling back to the 24h default for
    /// unrecognized values
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or(TimeWindow::OneDay)
    }

    /// The wire/cache label for this window
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::OneHour => "1h",
            TimeWindow::ThreeHours => "3h",
            TimeWindow::OneDay => "24h",
            TimeWindow::SevenDays => "7d",
            TimeWindow::ThirtyDays => "30d",
        }
    }

    /// Window length in hours
    pub fn hours(&self) -> i64 {
        match self {
            TimeWindow::OneHour => 1,
            TimeWindow::ThreeHours => 3,
            TimeWindow::OneDay => 24,
            TimeWindow::SevenDays => 24 * 7,
            TimeWindow::ThirtyDays => 24 * 30,
        }
    }

    /// Window length as a duration
    pub fn duration(&self) -> Duration {
        Duration::hours(self.hours())
    }

    /// Absolute cutoff for this window relative to `now`
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }

    /// Whether this window's data covers a query for `other`
    pub fn covers(&self, other: TimeWindow) -> bool {
        self.hours() >= other.hours()
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
