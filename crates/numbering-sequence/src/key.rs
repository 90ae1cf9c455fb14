use jiff::Zoned;
use std::time::Duration;

/// Prefix of the day-scoped counter keys.
pub const DEFAULT_KEY_PREFIX: &str = "seq:";

/// Builds the counter key for the local date of `now`, e.g. `seq:20260315`.
pub fn day_key(prefix: &str, now: &Zoned) -> String {
    format!("{prefix}{}", now.strftime("%Y%m%d"))
}

/// Time left until the start of the next local day.
///
/// Computed in the time zone carried by `now`, so a day shortened or
/// lengthened by a DST transition gets the matching TTL.
pub fn ttl_until_next_midnight(now: &Zoned) -> Result<Duration, jiff::Error> {
    let midnight = now.tomorrow()?.start_of_day()?;
    let remaining = midnight.timestamp().duration_since(now.timestamp());
    Duration::try_from(remaining)
}
