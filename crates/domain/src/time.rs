//! Time and timestamp helpers.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

/// UTC timestamp used for `observed_at`, `recorded_at`, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return `candidate` truncated to microseconds, or one microsecond past
/// `previous` when the clock has not moved beyond it.
///
/// Stored timestamps have microsecond precision, so this keeps log rows
/// strictly ordered even when two writes land in the same tick.
#[must_use]
pub fn strictly_after(previous: Timestamp, candidate: Timestamp) -> Timestamp {
    let candidate = candidate.trunc_subsecs(6);
    let floor = previous.trunc_subsecs(6) + TimeDelta::microseconds(1);
    if candidate < floor { floor } else { candidate }
}
