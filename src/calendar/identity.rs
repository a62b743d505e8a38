use std::fmt;
use std::rc::Rc;
use time::Date;

/// A date shared between the strip and every row built from it.  Rows hold
/// clones of the same `Rc`, so a date that has not changed keeps its address.
pub(crate) type SharedDate = Rc<Date>;

/// Values that denote a point in time, compared by that point rather than by
/// how or where the value was constructed.  Date-times are reduced to their
/// local calendar date before they get here.
pub(crate) trait InstantKey {
    type Key: Copy + Eq + fmt::Debug;

    fn instant_key(&self) -> Self::Key;
}

impl InstantKey for Date {
    type Key = i32;

    fn instant_key(&self) -> i32 {
        self.to_julian_day()
    }
}

/// Hands out one shared representative for a run of instant-equal values.
///
/// Feeding in a value with the same instant as the cached one returns the
/// cached `Rc` itself; a value with a different instant replaces the cache.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DateMemo<T> {
    current: Option<Rc<T>>,
}

impl<T: InstantKey> DateMemo<T> {
    pub(crate) fn new() -> Self {
        DateMemo { current: None }
    }

    pub(crate) fn stabilize(&mut self, value: T) -> Rc<T> {
        match self.current.as_ref() {
            Some(rc) if rc.instant_key() == value.instant_key() => Rc::clone(rc),
            _ => {
                let rc = Rc::new(value);
                self.current = Some(Rc::clone(&rc));
                rc
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::index::local_calendar_date;
    use time::macros::{date, datetime, offset};

    #[test]
    fn test_equal_dates_share_representative() {
        let mut memo = DateMemo::new();
        let a = memo.stabilize(date!(2019 - 06 - 14));
        let b = memo.stabilize(Date::from_ordinal_date(2019, 165).unwrap());
        assert_eq!(*b, date!(2019 - 06 - 14));
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_changed_date_replaces_representative() {
        let mut memo = DateMemo::new();
        let a = memo.stabilize(date!(2019 - 06 - 14));
        let b = memo.stabilize(date!(2019 - 06 - 15));
        assert!(!Rc::ptr_eq(&a, &b));
        assert!(Rc::ptr_eq(&memo.stabilize(date!(2019 - 06 - 15)), &b));
        let c = memo.stabilize(date!(2019 - 06 - 14));
        assert!(!Rc::ptr_eq(&a, &c));
        assert!(Rc::ptr_eq(&c, &memo.stabilize(date!(2019 - 06 - 14))));
    }

    #[test]
    fn test_date_times_on_same_local_day_share_representative() {
        let mut memo = DateMemo::new();
        let morning = memo.stabilize(local_calendar_date(datetime!(2019-06-14 00:30 +2)));
        let evening = memo.stabilize(local_calendar_date(
            datetime!(2019-06-14 23:30).assume_offset(offset!(-7)),
        ));
        assert_eq!(*morning, date!(2019 - 06 - 14));
        assert!(Rc::ptr_eq(&morning, &evening));
        let next = memo.stabilize(local_calendar_date(datetime!(2019-06-15 00:00 UTC)));
        assert!(!Rc::ptr_eq(&morning, &next));
    }

    #[test]
    fn test_memos_are_independent() {
        let mut first = DateMemo::new();
        let mut second = DateMemo::new();
        let a = first.stabilize(date!(2019 - 06 - 14));
        let b = second.stabilize(date!(2019 - 06 - 14));
        assert_eq!(a, b);
        assert!(!Rc::ptr_eq(&a, &b));
    }
}
