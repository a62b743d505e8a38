//! Deciding whether a row's inputs changed enough to rebuild it
//!
//! A row's inputs are two flat property bags: its layout (where the list put
//! it) and its props (what it shows).  Properties holding dates compare by
//! the day they denote; everything else compares by value, except nested
//! records, which compare by identity.  Dates inside a nested record are thus
//! not looked at; only top-level dates get day-based comparison.
use super::identity::SharedDate;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub(crate) type Props = BTreeMap<&'static str, Prop>;

#[derive(Clone, Debug)]
pub(crate) enum Prop {
    Int(i64),
    Date(SharedDate),
    Record(Rc<Props>),
}

impl Prop {
    fn same_as(&self, other: &Prop) -> bool {
        match (self, other) {
            (Prop::Int(a), Prop::Int(b)) => a == b,
            (Prop::Date(a), Prop::Date(b)) => **a == **b,
            (Prop::Record(a), Prop::Record(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Int(n) => write!(f, "{n}"),
            Prop::Date(d) => write!(f, "{d}"),
            Prop::Record(r) => write!(f, "<record of {} properties>", r.len()),
        }
    }
}

/// Returns `true` if some property was added, removed, or changed between
/// `prev` and `next`
pub(crate) fn shallow_differs(prev: &Props, next: &Props) -> bool {
    if let Some(name) = prev.keys().find(|name| !next.contains_key(*name)) {
        tracing::trace!(property = name, "property missing from new inputs");
        return true;
    }
    for (name, value) in next {
        match prev.get(name) {
            Some(old) if old.same_as(value) => (),
            Some(old) => {
                tracing::trace!(property = name, was = %old, now = %value, "property changed");
                return true;
            }
            None => {
                tracing::trace!(property = name, "property added to new inputs");
                return true;
            }
        }
    }
    false
}

#[derive(Clone, Debug, Default)]
pub(crate) struct RowInputs {
    pub(crate) layout: Props,
    pub(crate) props: Props,
}

pub(crate) fn row_inputs_equal(prev: &RowInputs, next: &RowInputs) -> bool {
    !shallow_differs(&prev.layout, &next.layout) && !shallow_differs(&prev.props, &next.props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Date;

    fn inputs(index: i64, top: i64, selected: Date) -> RowInputs {
        RowInputs {
            layout: Props::from([("top", Prop::Int(top)), ("height", Prop::Int(2))]),
            props: Props::from([
                ("index", Prop::Int(index)),
                ("selected", Prop::Date(Rc::new(selected))),
            ]),
        }
    }

    #[test]
    fn test_distinct_equal_dates_are_equal() {
        let a = inputs(2579, 10, date!(2019 - 06 - 14));
        let b = inputs(2579, 10, Date::from_ordinal_date(2019, 165).unwrap());
        assert!(row_inputs_equal(&a, &b));
        assert!(row_inputs_equal(&b, &a));
    }

    #[test]
    fn test_changed_date_is_unequal() {
        let a = inputs(2579, 10, date!(2019 - 06 - 14));
        let b = inputs(2579, 10, date!(2019 - 06 - 15));
        assert!(!row_inputs_equal(&a, &b));
    }

    #[test]
    fn test_changed_layout_is_unequal() {
        let a = inputs(2579, 10, date!(2019 - 06 - 14));
        let b = inputs(2579, 12, date!(2019 - 06 - 14));
        assert!(!row_inputs_equal(&a, &b));
    }

    #[test]
    fn test_changed_index_is_unequal() {
        let a = inputs(2579, 10, date!(2019 - 06 - 14));
        let b = inputs(2580, 10, date!(2019 - 06 - 14));
        assert!(!row_inputs_equal(&a, &b));
    }

    #[test]
    fn test_added_or_removed_property_is_unequal() {
        let a = inputs(2579, 10, date!(2019 - 06 - 14));
        let mut b = a.clone();
        b.props.insert("today", Prop::Date(Rc::new(date!(2025 - 01 - 22))));
        assert!(!row_inputs_equal(&a, &b));
        assert!(!row_inputs_equal(&b, &a));
    }

    #[test]
    fn test_kind_mismatch_is_unequal() {
        let mut a = Props::new();
        a.insert("x", Prop::Int(0));
        let mut b = Props::new();
        b.insert("x", Prop::Date(Rc::new(date!(1970 - 01 - 04))));
        assert!(shallow_differs(&a, &b));
    }

    #[test]
    fn test_nested_records_compare_by_identity() {
        let nested = Props::from([("when", Prop::Date(Rc::new(date!(2019 - 06 - 14))))]);
        let shared = Rc::new(nested.clone());
        let a = Props::from([("extra", Prop::Record(Rc::clone(&shared)))]);
        let b = Props::from([("extra", Prop::Record(shared))]);
        assert!(!shallow_differs(&a, &b));
        let c = Props::from([("extra", Prop::Record(Rc::new(nested)))]);
        assert!(shallow_differs(&a, &c));
    }

    #[test]
    fn test_empty_inputs_are_equal() {
        assert!(row_inputs_equal(&RowInputs::default(), &RowInputs::default()));
    }
}
