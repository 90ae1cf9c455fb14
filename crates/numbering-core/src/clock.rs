use jiff::Zoned;
use std::sync::{Arc, Mutex, PoisonError};

/// Source of local wall-clock time.
///
/// Both generators derive their output from the *local* calendar: the GUID
/// timestamp field and the day-scoped sequence key. The returned [`Zoned`]
/// carries the time zone, so day boundaries are computed in that zone.
pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Zoned;
}

/// The system clock in the system's configured time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep a handle and
/// move the clock while a generator owns another handle.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<Zoned>>,
}

impl ManualClock {
    pub fn new(now: Zoned) -> Self {
        Self {
            inner: Arc::new(Mutex::new(now)),
        }
    }

    /// Moves the clock to `now`. Moving backwards is allowed.
    pub fn set(&self, now: Zoned) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Zoned {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
