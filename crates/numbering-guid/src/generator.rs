use crate::{
    error::GuidError,
    guid::{Guid, GUID_LENGTH},
};
use numbering_core::{Clock, SystemClock};
use std::sync::atomic::{AtomicU16, Ordering};
use typed_builder::TypedBuilder;

/// Server identifier used when none is configured.
pub const DEFAULT_SERVER_ID: &str = "SV01";

const SERVER_ID_WIDTH: usize = 4;
const PROCESS_ID_MODULUS: u32 = 100_000;
const COUNTER_MODULUS: u16 = 10_000;

/// Configures a GUID generator instance.
#[derive(Debug, Clone, TypedBuilder)]
pub struct GuidSettings {
    /// Raw server identifier, usually the `SERVER_ID` environment variable.
    ///
    /// Absent or blank falls back to [`DEFAULT_SERVER_ID`]. Anything else is
    /// padded with trailing spaces or truncated to exactly 4 characters.
    #[builder(default, setter(into))]
    pub server_id: Option<String>,
    /// OS process id. Only the last five decimal digits are used.
    #[builder(default = std::process::id())]
    pub process_id: u32,
}

/// Lock-free generator of 30-character GUIDs.
///
/// Two calls on the same instance never return the same GUID unless 10000
/// calls land within one millisecond. Across processes, uniqueness relies on
/// distinct process ids or server ids.
pub struct GuidGenerator<C: Clock = SystemClock> {
    server_id: String,
    process_id: String,
    counter: AtomicU16,
    clock: C,
}

impl GuidGenerator<SystemClock> {
    /// Creates a generator backed by the real system clock.
    pub fn new(settings: GuidSettings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> GuidGenerator<C> {
    pub fn with_clock(settings: GuidSettings, clock: C) -> Self {
        Self {
            server_id: normalize_server_id(settings.server_id.as_deref()),
            process_id: format!("{:05}", settings.process_id % PROCESS_ID_MODULUS),
            counter: AtomicU16::new(0),
            clock,
        }
    }

    /// The normalized 4-character server identifier.
    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    /// The 5-digit process identifier.
    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    /// Generates the next GUID.
    ///
    /// The only failure is a GUID that does not come out at exactly 30
    /// characters, e.g. a clock reporting a year past 9999. Such a value is
    /// never handed out.
    pub fn generate(&self) -> Result<Guid, GuidError> {
        let now = self.clock.now();
        let timestamp = format!("{}{:03}", now.strftime("%Y%m%d%H%M%S"), now.millisecond());
        let count = self.next_count();

        let guid = format!(
            "{timestamp}{}{}{count:04}",
            self.server_id, self.process_id
        );
        let length = guid.chars().count();
        if length != GUID_LENGTH {
            return Err(GuidError::InvalidLength {
                actual: length,
                expected: GUID_LENGTH,
                guid,
            });
        }

        Ok(Guid::new_unchecked(guid))
    }

    /// Returns the current counter and advances it, wrapping at 10000, in a
    /// single atomic step.
    fn next_count(&self) -> u16 {
        let advanced = self
            .counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                Some((count + 1) % COUNTER_MODULUS)
            });
        // the closure never declines, so both arms carry the previous value
        match advanced {
            Ok(previous) | Err(previous) => previous,
        }
    }
}

/// Pads with trailing spaces or truncates the configured server id to
/// exactly 4 characters.
fn normalize_server_id(raw: Option<&str>) -> String {
    match raw {
        Some(value) if !value.trim().is_empty() => {
            let truncated: String = value.chars().take(SERVER_ID_WIDTH).collect();
            format!("{truncated:<width$}", width = SERVER_ID_WIDTH)
        }
        _ => DEFAULT_SERVER_ID.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use jiff::tz::{self, TimeZone};
    use numbering_core::ManualClock;
    use std::collections::HashSet;
    use std::thread;

    fn fixed_clock() -> ManualClock {
        let now = date(2026, 3, 15)
            .at(9, 5, 7, 42_000_000)
            .to_zoned(TimeZone::fixed(tz::offset(9)))
            .unwrap();
        ManualClock::new(now)
    }

    fn make_generator(server_id: Option<&str>, process_id: u32) -> GuidGenerator<ManualClock> {
        let settings = GuidSettings::builder()
            .server_id(server_id.map(str::to_string))
            .process_id(process_id)
            .build();
        GuidGenerator::with_clock(settings, fixed_clock())
    }

    #[test]
    fn guid_has_fixed_layout() {
        let gen = make_generator(Some("SV07"), 1234);
        let guid = gen.generate().unwrap();

        assert_eq!(guid.as_str().len(), 30);
        assert_eq!(guid.timestamp(), "20260315090507042");
        assert_eq!(guid.server_id(), "SV07");
        assert_eq!(guid.process_id(), "01234");
        assert_eq!(guid.counter(), 0);
        assert_eq!(guid.as_str(), "20260315090507042SV07012340000");
    }

    #[test]
    fn system_clock_guid_is_30_chars() {
        let gen = GuidGenerator::new(GuidSettings::builder().build());
        for _ in 0..100 {
            let guid = gen.generate().unwrap();
            assert_eq!(guid.as_str().len(), 30);
            assert!(guid.timestamp().bytes().all(|b| b.is_ascii_digit()));
            assert!(guid.counter() < 10_000);
        }
    }

    #[test]
    fn consecutive_guids_increment_counter() {
        let gen = make_generator(None, 1);
        let first = gen.generate().unwrap();
        let second = gen.generate().unwrap();
        let third = gen.generate().unwrap();

        assert_eq!(first.counter(), 0);
        assert_eq!(second.counter(), 1);
        assert_eq!(third.counter(), 2);
        // same millisecond, still distinct
        assert_eq!(first.timestamp(), second.timestamp());
        assert_ne!(first, second);
    }

    #[test]
    fn counter_wraps_after_9999() {
        let gen = make_generator(None, 1);
        for expected in 0..10_000u16 {
            assert_eq!(gen.generate().unwrap().counter(), expected);
        }
        assert_eq!(gen.generate().unwrap().counter(), 0);
        assert_eq!(gen.generate().unwrap().counter(), 1);
    }

    #[test]
    fn concurrent_guids_are_unique() {
        const THREADS: usize = 100;
        const PER_THREAD: usize = 100;

        let gen = GuidGenerator::new(GuidSettings::builder().build());
        let guids: HashSet<Guid> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        (0..PER_THREAD)
                            .map(|_| gen.generate().unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(guids.len(), THREADS * PER_THREAD);
    }

    #[test]
    fn concurrent_counters_are_never_double_issued() {
        // frozen clock: the counter alone has to keep 10000 GUIDs apart
        let gen = make_generator(None, 1);
        let counters: HashSet<u16> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        (0..1250)
                            .map(|_| gen.generate().unwrap().counter())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(counters.len(), 10_000);
    }

    #[test]
    fn blank_server_id_uses_default() {
        assert_eq!(make_generator(None, 1).server_id(), DEFAULT_SERVER_ID);
        assert_eq!(make_generator(Some(""), 1).server_id(), DEFAULT_SERVER_ID);
        assert_eq!(make_generator(Some("   "), 1).server_id(), DEFAULT_SERVER_ID);
    }

    #[test]
    fn short_server_id_is_padded_on_the_right() {
        let gen = make_generator(Some("AB"), 1);
        assert_eq!(gen.server_id(), "AB  ");
        assert_eq!(gen.generate().unwrap().as_str().len(), 30);
    }

    #[test]
    fn long_server_id_is_truncated() {
        let gen = make_generator(Some("NODE-1234"), 1);
        assert_eq!(gen.server_id(), "NODE");
    }

    #[test]
    fn non_ascii_server_ids_stay_distinct() {
        let first = make_generator(Some("서버01"), 1);
        let second = make_generator(Some("가나01"), 1);

        assert_eq!(first.server_id(), "서버01");
        assert_eq!(second.server_id(), "가나01");
        assert_ne!(first.generate().unwrap(), second.generate().unwrap());
    }

    #[test]
    fn non_ascii_server_id_is_padded_and_truncated_by_character() {
        assert_eq!(make_generator(Some("서버"), 1).server_id(), "서버  ");
        assert_eq!(make_generator(Some("서버서버서버"), 1).server_id(), "서버서버");

        let guid = make_generator(Some("서버"), 7).generate().unwrap();
        assert_eq!(guid.as_str().chars().count(), 30);
        assert_eq!(guid.server_id(), "서버  ");
        assert_eq!(guid.process_id(), "00007");
        assert_eq!(guid.counter(), 0);
    }

    #[test]
    fn process_id_is_reduced_modulo_100000() {
        assert_eq!(make_generator(None, 123_456).process_id(), "23456");
        assert_eq!(make_generator(None, 7).process_id(), "00007");
        assert_eq!(make_generator(None, 100_000).process_id(), "00000");
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GuidGenerator>();
    }
}
