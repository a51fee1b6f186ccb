//! Clock port

use chrono::{DateTime, Utc};

/// Port for getting the current time.
///
/// Recorded test outcomes are stamped with it; tests substitute a fixed clock.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
