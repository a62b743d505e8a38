//! Mapping between calendar dates and the signed index of the Sunday-first
//! week containing them
use std::fmt;
use time::{macros::date, Date, OffsetDateTime, Weekday};

pub(crate) const DAYS_IN_WEEK: u8 = 7;

/// The Sunday that begins week 0
pub(crate) const EPOCH: Date = date!(1970 - 01 - 04);

const EPOCH_JULIAN_DAY: i32 = EPOCH.to_julian_day();

/// The weekday on which every week begins
pub(crate) const WEEK_START: Weekday = Weekday::Sunday;

/// Number of whole weeks between the epoch and a date, rounded towards the
/// past
const fn weeks_from_epoch(julian_day: i32) -> i32 {
    (julian_day - EPOCH_JULIAN_DAY).div_euclid(DAYS_IN_WEEK as i32)
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct WeekIndex(i32);

impl WeekIndex {
    /// The earliest week all seven of whose days are representable
    pub(crate) const MIN: WeekIndex = WeekIndex::new(
        0 - (EPOCH_JULIAN_DAY - Date::MIN.to_julian_day()).div_euclid(DAYS_IN_WEEK as i32),
    );

    /// The latest week all seven of whose days are representable
    pub(crate) const MAX: WeekIndex =
        WeekIndex::new(weeks_from_epoch(Date::MAX.to_julian_day() - (DAYS_IN_WEEK as i32 - 1)));

    pub(crate) const fn new(index: i32) -> WeekIndex {
        WeekIndex(index)
    }

    pub(crate) const fn get(self) -> i32 {
        self.0
    }

    /// Returns the index of the week containing `date`.
    ///
    /// `Date` carries no time of day or offset, so there is nothing here that
    /// can push a date across a day boundary; callers holding a date-time
    /// should go through [`local_calendar_date()`] first.
    pub(crate) const fn containing(date: Date) -> WeekIndex {
        WeekIndex::new(weeks_from_epoch(date.to_julian_day()))
    }

    /// Returns the Sunday that begins this week, or `None` if that day cannot
    /// be represented
    pub(crate) fn first_day(self) -> Option<Date> {
        let offset = self.0.checked_mul(i32::from(DAYS_IN_WEEK))?;
        Date::from_julian_day(EPOCH_JULIAN_DAY.checked_add(offset)?).ok()
    }

    pub(crate) fn is_supported(self) -> bool {
        (WeekIndex::MIN..=WeekIndex::MAX).contains(&self)
    }

    pub(crate) fn checked_add(self, weeks: i32) -> Option<WeekIndex> {
        self.0.checked_add(weeks).map(WeekIndex::new)
    }

    pub(crate) fn saturating_add(self, weeks: i32) -> WeekIndex {
        WeekIndex::new(self.0.saturating_add(weeks))
    }

    /// Number of weeks from `earlier` to `self`
    pub(crate) fn weeks_since(self, earlier: WeekIndex) -> i64 {
        i64::from(self.0) - i64::from(earlier.0)
    }
}

impl fmt::Display for WeekIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {}", self.0)
    }
}

/// Returns the first day of the week containing `date`, or `None` if that
/// Sunday precedes the earliest representable date
pub(crate) fn start_of_week(date: Date) -> Option<Date> {
    WeekIndex::containing(date).first_day()
}

pub(crate) fn is_week_start(date: Date) -> bool {
    date.weekday() == WEEK_START
}

/// Returns the calendar date that a local date-time falls on.
///
/// The date is taken from the value's own year, month, and day.  Converting
/// to UTC before dropping the time would move late-evening times west of
/// Greenwich (and early-morning times east of it) onto a neighboring day,
/// and thus possibly into a neighboring week.
pub(crate) fn local_calendar_date(moment: OffsetDateTime) -> Date {
    moment.date()
}
