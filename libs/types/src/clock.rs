//! Timestamp sources
//!
//! Orders are stamped in Unix nanoseconds. The clock is injected so tests
//! can produce deterministic timestamps.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of Unix-nanosecond timestamps
pub trait Clock: Send + Sync {
    fn now_nanos(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> i64 {
        // Out of range only after the year 2262
        Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
    }
}

/// Clock that advances by a fixed step on every read
#[derive(Debug)]
pub struct StepClock {
    next: AtomicI64,
    step: i64,
}

impl StepClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step,
        }
    }
}

impl Clock for StepClock {
    fn now_nanos(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::Relaxed)
    }
}
