use super::gate::{row_inputs_equal, Prop, Props, RowInputs};
use super::identity::{DateMemo, SharedDate};
use super::index::{is_week_start, start_of_week, WeekIndex, DAYS_IN_WEEK};
use super::list::{
    fixed_offset, fixed_size_options, FixedSizeList, ItemLayout, MemoRows, DEFAULT_OVERSCAN,
};
use super::row::{build_row, WeekRow};
use std::num::NonZeroU32;
use std::ops::RangeInclusive;
use std::rc::Rc;
use thiserror::Error;
use time::{Date, Duration, Weekday};

/// Number of lines taken up by each week
pub(crate) const ROW_HEIGHT: u16 = 2;

/// Number of weeks on either side of the overscanned rows that stay cached
/// after a render pass
const RETAIN_MARGIN: i32 = 64;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct StripBuilder {
    selected: Date,
    start: Option<Date>,
    day_count: Option<NonZeroU32>,
    overscan: usize,
}

impl StripBuilder {
    /// Open the strip with the week beginning on `date` at the top instead of
    /// the week containing the selected date.  `date` must be a Sunday.
    pub(crate) fn start_date(mut self, date: Date) -> Self {
        self.start = Some(date);
        self
    }

    /// Limit the strip to the weeks needed to show `days` days from the
    /// start date onwards
    pub(crate) fn day_count(mut self, days: NonZeroU32) -> Self {
        self.day_count = Some(days);
        self
    }

    pub(crate) fn overscan(mut self, rows: usize) -> Self {
        self.overscan = rows;
        self
    }

    pub(crate) fn build(self) -> Result<WeekStrip, StripError> {
        let start = match self.start {
            Some(date) => {
                if !is_week_start(date) {
                    tracing::debug!(%date, week_start = ?start_of_week(date), "rejected start date");
                    return Err(StripError::Misaligned {
                        date,
                        weekday: date.weekday(),
                    });
                }
                let index = WeekIndex::containing(date);
                if !index.is_supported() {
                    return Err(StripError::OutOfRange { date });
                }
                index
            }
            None => WeekIndex::containing(self.selected).clamp(WeekIndex::MIN, WeekIndex::MAX),
        };
        let (base, last) = match self.day_count {
            Some(days) => {
                let weeks = days.get().div_ceil(u32::from(DAYS_IN_WEEK));
                let weeks = i32::try_from(weeks).unwrap_or(i32::MAX);
                (start, start.saturating_add(weeks - 1).min(WeekIndex::MAX))
            }
            None => (WeekIndex::MIN, WeekIndex::MAX),
        };
        let item_count = usize::try_from(last.weeks_since(base) + 1).unwrap_or(0);
        let position = usize::try_from(start.weeks_since(base)).unwrap_or(0);
        let offset = fixed_offset(position, ROW_HEIGHT);
        let list = FixedSizeList::new(
            fixed_size_options(item_count, ROW_HEIGHT)
                .with_overscan(self.overscan)
                .with_initial_offset_value(offset),
        );
        let bounds = Rc::new(Props::from([
            ("first", Prop::Int(base.get().into())),
            ("last", Prop::Int(last.get().into())),
        ]));
        let mut selected_memo = DateMemo::new();
        let selected = selected_memo.stabilize(self.selected);
        tracing::info!(
            selected = %selected,
            start = %start,
            weeks = item_count,
            offset,
            "week strip created"
        );
        Ok(WeekStrip {
            base,
            bounds,
            list,
            selected,
            selected_memo,
            today_memo: DateMemo::new(),
            rows: MemoRows::new(row_inputs_equal),
        })
    }
}

/// A window onto a practically endless run of weeks.
///
/// Weeks are items of a [`FixedSizeList`] whose position 0 is `base`.
/// Only the rows intersecting the viewport (plus overscan) are built on each
/// render pass, and a row is only rebuilt when its inputs differ from those
/// it was last built from.
#[derive(Clone, Debug)]
pub(crate) struct WeekStrip {
    base: WeekIndex,
    // Shared by every row's inputs; fixed for the life of the strip
    bounds: Rc<Props>,
    list: FixedSizeList,
    selected: SharedDate,
    selected_memo: DateMemo<Date>,
    today_memo: DateMemo<Date>,
    rows: MemoRows<WeekIndex, RowInputs, Option<WeekRow>>,
}

/// A built row along with the line of the viewport on which its top edge
/// falls; this is negative for rows above the viewport.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PlacedRow {
    pub(crate) y: i64,
    pub(crate) row: WeekRow,
}

impl WeekStrip {
    pub(crate) fn builder(selected: Date) -> StripBuilder {
        StripBuilder {
            selected,
            start: None,
            day_count: None,
            overscan: DEFAULT_OVERSCAN,
        }
    }

    pub(crate) fn selected(&self) -> Date {
        *self.selected
    }

    pub(crate) fn scroll_offset(&self) -> u64 {
        self.list.scroll_offset()
    }

    /// Number of rows built since the strip was created
    pub(crate) fn recomputed(&self) -> u64 {
        self.rows.renders()
    }

    pub(crate) fn set_viewport_height(&mut self, lines: u16) {
        self.list.set_viewport_height(lines);
    }

    fn index_at(&self, position: usize) -> Option<WeekIndex> {
        self.base.checked_add(i32::try_from(position).ok()?)
    }

    fn position_of(&self, index: WeekIndex) -> Option<usize> {
        let position = usize::try_from(index.weeks_since(self.base)).ok()?;
        (position < self.list.item_count()).then_some(position)
    }

    /// The weeks intersecting the viewport, not counting overscan
    pub(crate) fn visible_weeks(&self) -> Option<RangeInclusive<WeekIndex>> {
        let range = self.list.visible_range();
        let last = range.end.checked_sub(1)?;
        if range.is_empty() {
            return None;
        }
        Some(self.index_at(range.start)?..=self.index_at(last)?)
    }

    pub(crate) fn first_visible(&self) -> Option<WeekIndex> {
        self.visible_weeks().map(|weeks| *weeks.start())
    }

    /// Builds (or fetches from cache) every row intersecting the viewport plus
    /// overscan.  `today` is read once here so that every row in the pass
    /// agrees on it.
    pub(crate) fn render_pass(&mut self, today: Date) -> Vec<PlacedRow> {
        let today = self.today_memo.stabilize(today);
        let selected = Rc::clone(&self.selected);
        let range = self.list.overscanned_range();
        let mut placed = Vec::with_capacity(range.len());
        for position in range {
            let Some(index) = self.index_at(position) else {
                continue;
            };
            let layout = self.list.item_layout(position);
            let inputs = row_inputs(index, layout, &self.bounds, &selected, &today);
            let row = self.rows.get_or_render(index, inputs, |_| {
                let row = build_row(index, *selected, *today);
                if let Some(row) = &row {
                    tracing::trace!(%index, first_day = %row.key(), "built row");
                }
                row
            });
            if let Some(row) = row {
                placed.push(PlacedRow {
                    y: self.list.viewport_y(layout),
                    row: *row,
                });
            }
        }
        if let (Some(first), Some(last)) = (placed.first(), placed.last()) {
            let keep = first.row.index().saturating_add(-RETAIN_MARGIN)
                ..=last.row.index().saturating_add(RETAIN_MARGIN);
            self.rows.retain_within(&keep);
        }
        tracing::trace!(
            rows = placed.len(),
            cached = self.rows.len(),
            recomputed = self.recomputed(),
            "render pass finished"
        );
        placed
    }

    pub(crate) fn scroll_lines(&mut self, delta: i64) -> Result<(), OutOfTimeError> {
        if self.list.scroll_by(delta) {
            tracing::debug!(
                offset = self.scroll_offset(),
                top = ?self.first_visible(),
                "scrolled"
            );
            Ok(())
        } else {
            Err(OutOfTimeError)
        }
    }

    pub(crate) fn one_week_forwards(&mut self) -> Result<(), OutOfTimeError> {
        self.scroll_lines(i64::from(ROW_HEIGHT))
    }

    pub(crate) fn one_week_backwards(&mut self) -> Result<(), OutOfTimeError> {
        self.scroll_lines(-i64::from(ROW_HEIGHT))
    }

    fn page_lines(&self) -> i64 {
        let rows = i64::try_from(self.list.items_per_page().max(1)).unwrap_or(i64::MAX);
        rows.saturating_mul(i64::from(ROW_HEIGHT))
    }

    pub(crate) fn one_page_forwards(&mut self) -> Result<(), OutOfTimeError> {
        self.scroll_lines(self.page_lines())
    }

    pub(crate) fn one_page_backwards(&mut self) -> Result<(), OutOfTimeError> {
        self.scroll_lines(-self.page_lines())
    }

    /// Scrolls so that the week containing `date` is at the top of the
    /// viewport, or as near to it as the ends of the strip allow
    pub(crate) fn scroll_to_date(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        let position = self
            .position_of(WeekIndex::containing(date))
            .ok_or(OutOfTimeError)?;
        self.list.scroll_to(self.list.offset_of(position));
        tracing::debug!(%date, offset = self.list.scroll_offset(), "scrolled to date");
        Ok(())
    }

    fn scroll_into_view(&mut self, position: usize) {
        let top = self.list.offset_of(position);
        let bottom = top.saturating_add(u64::from(ROW_HEIGHT));
        let viewport = u64::from(self.list.viewport_height());
        let offset = self.list.scroll_offset();
        if top < offset || viewport == 0 {
            self.list.scroll_to(top);
        } else if bottom > offset.saturating_add(viewport) {
            self.list.scroll_to(bottom.saturating_sub(viewport));
        }
    }

    fn set_selected(&mut self, date: Date) {
        let selected = self.selected_memo.stabilize(date);
        if !Rc::ptr_eq(&selected, &self.selected) {
            tracing::debug!(from = %self.selected, to = %selected, "selection changed");
            self.selected = selected;
        }
    }

    /// Selects `date`, scrolling as little as possible to bring it into view
    pub(crate) fn select(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        let position = self
            .position_of(WeekIndex::containing(date))
            .ok_or(OutOfTimeError)?;
        self.set_selected(date);
        self.scroll_into_view(position);
        Ok(())
    }

    pub(crate) fn move_selection(&mut self, days: i64) -> Result<(), OutOfTimeError> {
        let date = self
            .selected()
            .checked_add(Duration::days(days))
            .ok_or(OutOfTimeError)?;
        self.select(date)
    }

    /// Selects `date` and brings its week to the top of the viewport
    pub(crate) fn jump_to_date(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        self.scroll_to_date(date)?;
        self.set_selected(date);
        Ok(())
    }
}

fn row_inputs(
    index: WeekIndex,
    layout: ItemLayout,
    bounds: &Rc<Props>,
    selected: &SharedDate,
    today: &SharedDate,
) -> RowInputs {
    RowInputs {
        layout: Props::from([
            ("top", Prop::Int(i64::try_from(layout.top).unwrap_or(i64::MAX))),
            ("height", Prop::Int(layout.height.into())),
        ]),
        props: Props::from([
            ("index", Prop::Int(index.get().into())),
            ("bounds", Prop::Record(Rc::clone(bounds))),
            ("selected", Prop::Date(Rc::clone(selected))),
            ("today", Prop::Date(Rc::clone(today))),
        ]),
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum StripError {
    #[error("start date {date} is a {weekday}, but it must be the first day of a week (a Sunday)")]
    Misaligned { date: Date, weekday: Weekday },
    #[error("start date {date} is outside the supported range of weeks")]
    OutOfRange { date: Date },
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
