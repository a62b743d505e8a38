use super::index::{WeekIndex, DAYS_IN_WEEK};
use std::cmp::Ordering;
use std::iter::successors;
use std::ops::Index;
use time::{Date, Month, Weekday, Weekday::*};

/// One value per day of a week, Sunday first
type PerDay<T> = [T; DAYS_IN_WEEK as usize];

const WEEKDAYS: PerDay<Weekday> = [
    Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday,
];

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

/// Where a day lies relative to today
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Tense {
    Past,
    Today,
    Future,
}

impl Tense {
    fn of(date: Date, today: Date) -> Tense {
        match date.cmp(&today) {
            Ordering::Less => Tense::Past,
            Ordering::Equal => Tense::Today,
            Ordering::Greater => Tense::Future,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) selected: bool,
    pub(crate) tense: Tense,
}

impl DayCell {
    fn classify(date: Date, selected: Date, today: Date) -> DayCell {
        DayCell {
            date,
            selected: date == selected,
            tense: Tense::of(date, today),
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.date.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.date.month()
    }

    pub(crate) fn day(&self) -> u8 {
        self.date.day()
    }

    pub(crate) fn is_today(&self) -> bool {
        self.tense == Tense::Today
    }

    pub(crate) fn is_past(&self) -> bool {
        self.tense == Tense::Past
    }

    pub(crate) fn is_first_of_month(&self) -> bool {
        self.day() == 1
    }

    pub(crate) fn is_last_day_of_month(&self) -> bool {
        match self.date.next_day() {
            Some(tomorrow) => self.date.month() != tomorrow.month(),
            None => true,
        }
    }

    pub(crate) fn label(&self) -> String {
        if self.is_today() {
            format!("[{:2}]", self.day())
        } else {
            format!(" {:2} ", self.day())
        }
    }
}

/// Seven consecutive days, Sunday through Saturday
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WeekRow {
    index: WeekIndex,
    cells: PerDay<DayCell>,
}

impl WeekRow {
    pub(crate) fn index(&self) -> WeekIndex {
        self.index
    }

    /// The first day of the week, which identifies the row's content
    pub(crate) fn key(&self) -> Date {
        self[Sunday].date
    }

    pub(crate) fn cells(&self) -> &PerDay<DayCell> {
        &self.cells
    }

    pub(crate) fn enumerate(&self) -> impl Iterator<Item = (Weekday, &DayCell)> + '_ {
        WEEKDAYS.into_iter().zip(self.cells())
    }

    pub(crate) fn has_month_start(&self) -> bool {
        self.cells.iter().any(DayCell::is_first_of_month)
    }
}

impl Index<Weekday> for WeekRow {
    type Output = DayCell;

    fn index(&self, wd: Weekday) -> &DayCell {
        &self.cells[usize::from(wd.index0())]
    }
}

/// Builds the row for week `index`, marking the cell for `selected` and
/// classifying every cell against the single `today` supplied by the caller.
///
/// Returns `None` if any day of the week is outside the representable range.
pub(crate) fn build_row(index: WeekIndex, selected: Date, today: Date) -> Option<WeekRow> {
    let first = index.first_day()?;
    let cells = successors(Some(first), |d| d.next_day())
        .take(usize::from(DAYS_IN_WEEK))
        .map(|date| DayCell::classify(date, selected, today))
        .collect::<Vec<_>>();
    let cells = PerDay::<DayCell>::try_from(cells).ok()?;
    Some(WeekRow { index, cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_selected_friday() {
        let index = WeekIndex::containing(date!(2019 - 06 - 14));
        let row = build_row(index, date!(2019 - 06 - 14), date!(2025 - 01 - 22)).unwrap();
        assert_eq!(row.index(), index);
        assert_eq!(row.key(), date!(2019 - 06 - 09));
        let mut iter = row.enumerate().map(|(wd, cell)| (wd, cell.date));
        assert_eq!(iter.next(), Some((Sunday, date!(2019 - 06 - 09))));
        assert_eq!(iter.next(), Some((Monday, date!(2019 - 06 - 10))));
        assert_eq!(iter.next(), Some((Tuesday, date!(2019 - 06 - 11))));
        assert_eq!(iter.next(), Some((Wednesday, date!(2019 - 06 - 12))));
        assert_eq!(iter.next(), Some((Thursday, date!(2019 - 06 - 13))));
        assert_eq!(iter.next(), Some((Friday, date!(2019 - 06 - 14))));
        assert_eq!(iter.next(), Some((Saturday, date!(2019 - 06 - 15))));
        assert_eq!(iter.next(), None);
        assert!(row[Friday].selected);
        assert_eq!(row.cells().iter().filter(|c| c.selected).count(), 1);
        assert!(!row.has_month_start());
        assert!(row.cells().iter().all(DayCell::is_past));
    }

    #[test]
    fn test_tense_is_exclusive() {
        let today = date!(2025 - 01 - 22);
        let row = build_row(WeekIndex::containing(today), today, today).unwrap();
        let tenses = row.cells().map(|cell| cell.tense);
        assert_eq!(
            tenses,
            [
                Tense::Past,
                Tense::Past,
                Tense::Past,
                Tense::Today,
                Tense::Future,
                Tense::Future,
                Tense::Future,
            ]
        );
        assert!(row[Sunday].is_past());
        assert!(row[Tuesday].is_past());
        assert!(row[Wednesday].is_today());
        assert_eq!(row[Thursday].tense, Tense::Future);
        assert_eq!(row[Saturday].tense, Tense::Future);
    }

    #[test]
    fn test_independent_dates_compare_by_value() {
        let selected = Date::from_calendar_date(2019, Month::June, 14).unwrap();
        let today = Date::from_ordinal_date(2019, 165).unwrap();
        let row = build_row(WeekIndex::new(2579), selected, today).unwrap();
        assert!(row[Friday].selected);
        assert!(row[Friday].is_today());
    }

    #[test]
    fn test_month_boundaries() {
        let row = build_row(
            WeekIndex::containing(date!(2025 - 01 - 31)),
            date!(2025 - 02 - 10),
            date!(2025 - 01 - 22),
        )
        .unwrap();
        assert!(row.has_month_start());
        assert!(row[Saturday].is_first_of_month());
        assert!(row[Friday].is_last_day_of_month());
        assert!(!row[Thursday].is_last_day_of_month());
        assert!(row.cells().iter().all(|c| !c.selected));
    }

    #[test]
    fn test_labels() {
        let today = date!(2025 - 01 - 22);
        let row = build_row(WeekIndex::containing(today), today, today).unwrap();
        assert_eq!(row[Sunday].label(), " 19 ");
        assert_eq!(row[Wednesday].label(), "[22]");
    }

    #[test]
    fn test_same_inputs_same_row() {
        let index = WeekIndex::new(-5);
        let a = build_row(index, date!(1969 - 12 - 01), date!(1970 - 01 - 01));
        let b = build_row(index, date!(1969 - 12 - 01), date!(1970 - 01 - 01));
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn test_edges_of_time() {
        let today = date!(2025 - 01 - 22);
        assert!(build_row(WeekIndex::MIN, today, today).is_some());
        assert!(build_row(WeekIndex::MAX, today, today).is_some());
        assert_eq!(build_row(WeekIndex::new(WeekIndex::MAX.get() + 1), today, today), None);
        assert_eq!(build_row(WeekIndex::new(WeekIndex::MIN.get() - 1), today, today), None);
    }
}
