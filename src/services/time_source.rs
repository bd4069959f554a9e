//! Time abstraction so timer-driven behavior can be tested with a synthetic clock.
//!
//! Production code uses [`RealTimeSource`]. Tests use [`TestTimeSource`] and
//! advance it explicitly, which makes debounce windows deterministic.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of the current time
pub trait TimeSource: Send + Sync + std::fmt::Debug {
    /// Current instant
    fn now(&self) -> Instant;

    /// Time elapsed since `earlier` according to this source
    fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

/// Shared handle used throughout the editor
pub type SharedTimeSource = Arc<dyn TimeSource>;

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct RealTimeSource;

impl RealTimeSource {
    pub fn shared() -> SharedTimeSource {
        Arc::new(Self)
    }
}

impl TimeSource for RealTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Synthetic clock that only moves when told to
#[derive(Debug)]
pub struct TestTimeSource {
    base: Instant,
    offset: Mutex<Duration>,
}

impl TestTimeSource {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }

    /// Total time advanced since creation
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock()
    }
}

impl Default for TestTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for TestTimeSource {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}
