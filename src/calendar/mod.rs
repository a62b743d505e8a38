mod gate;
mod identity;
mod index;
mod list;
mod row;
mod strip;
mod widget;
pub(crate) use self::strip::WeekStrip;
pub(crate) use self::widget::Calendar;
use self::index::local_calendar_date;
use time::{error::IndeterminateOffset, Date, OffsetDateTime, UtcOffset};

/// Source of the current date, consulted once per draw
pub(crate) trait Clock {
    fn today(&self) -> Date;
}

/// Reads the system clock in the current local UTC offset.  The offset is
/// looked up again on every call so that the date follows DST changes; if
/// the lookup fails, the offset that was local at startup is used instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct LocalClock {
    fallback: UtcOffset,
}

impl LocalClock {
    pub(crate) fn new(fallback: UtcOffset) -> LocalClock {
        LocalClock { fallback }
    }

    fn now(&self, local: Result<OffsetDateTime, IndeterminateOffset>) -> OffsetDateTime {
        local.unwrap_or_else(|e| {
            tracing::trace!(error = %e, offset = %self.fallback, "using startup UTC offset");
            OffsetDateTime::now_utc().to_offset(self.fallback)
        })
    }
}

impl Clock for LocalClock {
    fn today(&self) -> Date {
        local_calendar_date(self.now(OffsetDateTime::now_local()))
    }
}

/// A clock on which it is always the same day
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FixedClock(pub(crate) Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn test_local_clock_uses_current_offset() {
        let clock = LocalClock::new(offset!(+1));
        let summer = datetime!(2025-06-30 23:30 +2);
        assert_eq!(clock.now(Ok(summer)), summer);
    }

    #[test]
    fn test_local_clock_falls_back_to_startup_offset() {
        let clock = LocalClock::new(offset!(-9));
        let now = clock.now(Err(IndeterminateOffset));
        assert_eq!(now.offset(), offset!(-9));
    }

    #[test]
    fn test_fixed_clock() {
        let today = datetime!(2025-01-22 00:00 UTC).date();
        assert_eq!(FixedClock(today).today(), today);
    }
}
