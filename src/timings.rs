//! Phase timings for a single query invocation.

use std::fmt;
use std::time::Duration;

/// Accumulated durations for the phases of one query.
///
/// Merging is pairwise addition, so sub-phase timings can be folded together
/// before the summary is printed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub warmup: Duration,
    pub execute: Duration,
    pub do_get: Duration,
}

impl Timings {
    /// Add another set of timings into this one, phase by phase.
    pub fn merge(mut self, other: Timings) -> Timings {
        self.warmup += other.warmup;
        self.execute += other.execute;
        self.do_get += other.do_get;

        self
    }

    pub fn total(&self) -> Duration {
        self.warmup + self.execute + self.do_get
    }
}

impl fmt::Display for Timings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Warmup: {:?}, Execute: {:?}, DoGet: {:?}, Total: {:?}",
            self.warmup,
            self.execute,
            self.do_get,
            self.total()
        )
    }
}
