//! Timing for the gesture and flush paths.
//!
//! `profile_scope!` compiles to nothing unless the `profiling` feature is on:
//! ```toml
//! [dependencies]
//! notecanvas = { features = ["profiling"] }
//! ```
//!
//! [`measure_and_log`] always runs and warns when an operation overruns its
//! budget. The session records every scene flush in a [`FlushStats`].

use std::collections::VecDeque;
use std::time::Instant;
use tracing::warn;
#[cfg(feature = "profiling")]
use tracing::trace;

/// Frame budget at 60 FPS.
pub const TARGET_FRAME_MS: f64 = 16.67;

/// Budget for a single pointer event.
pub const GESTURE_BUDGET_MS: f64 = 1.0;

/// Flushes kept for the rolling statistics.
const FLUSH_WINDOW: usize = 32;

/// Time the enclosing scope when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _scope_timer = $crate::perf::ScopeTimer::start($name, $crate::perf::GESTURE_BUDGET_MS);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
}

pub use profile_scope;

#[cfg(feature = "profiling")]
thread_local! {
    static NESTING: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Reports on drop when the scope overran its budget.
pub struct ScopeTimer {
    name: &'static str,
    started: Instant,
    budget_ms: f64,
    #[cfg(feature = "profiling")]
    nesting: usize,
}

impl ScopeTimer {
    pub fn start(name: &'static str, budget_ms: f64) -> Self {
        #[cfg(feature = "profiling")]
        let nesting = NESTING.with(|n| n.replace(n.get() + 1));

        Self {
            name,
            started: Instant::now(),
            budget_ms,
            #[cfg(feature = "profiling")]
            nesting,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn over_budget(&self) -> bool {
        self.elapsed_ms() > self.budget_ms
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        #[cfg(feature = "profiling")]
        NESTING.with(|n| n.set(n.get().saturating_sub(1)));

        if !self.over_budget() {
            return;
        }
        let elapsed_ms = self.elapsed_ms();

        #[cfg(feature = "profiling")]
        trace!(
            "{}[PERF] {}: {:.2}ms",
            "  ".repeat(self.nesting),
            self.name,
            elapsed_ms
        );

        #[cfg(not(feature = "profiling"))]
        warn!(
            operation = self.name,
            elapsed_ms = format!("{elapsed_ms:.2}"),
            budget_ms = format!("{:.2}", self.budget_ms),
            "Over budget"
        );
    }
}

/// Run `f`, returning its result and the elapsed milliseconds.
#[inline]
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let started = Instant::now();
    let result = f();
    (result, started.elapsed().as_secs_f64() * 1000.0)
}

/// Run `f` and warn if it took longer than `budget_ms`.
#[inline]
pub fn measure_and_log<T, F: FnOnce() -> T>(name: &str, budget_ms: f64, f: F) -> T {
    let (result, elapsed_ms) = measure(f);
    if elapsed_ms > budget_ms {
        warn!(
            operation = name,
            elapsed_ms = format!("{elapsed_ms:.2}"),
            budget_ms = format!("{budget_ms:.2}"),
            "Over budget"
        );
    }
    result
}

// ============================================================================
// Flush statistics
// ============================================================================

/// Durations of the most recent scene flushes.
#[derive(Debug, Default)]
pub struct FlushStats {
    recent: VecDeque<f64>,
    over_budget: u64,
}

impl FlushStats {
    pub fn record(&mut self, elapsed_ms: f64) {
        if self.recent.len() == FLUSH_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(elapsed_ms);
        if elapsed_ms > TARGET_FRAME_MS {
            self.over_budget += 1;
        }
    }

    pub fn average_ms(&self) -> Option<f64> {
        if self.recent.is_empty() {
            return None;
        }
        Some(self.recent.iter().sum::<f64>() / self.recent.len() as f64)
    }

    pub fn max_ms(&self) -> Option<f64> {
        self.recent.iter().copied().reduce(f64::max)
    }

    /// Flushes over the frame budget since the session started.
    pub fn over_budget(&self) -> u64 {
        self.over_budget
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}
