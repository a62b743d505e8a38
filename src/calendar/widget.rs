use super::row::{DayCell, WeekdayExt};
use super::strip::{WeekStrip, ROW_HEIGHT};
use crate::theme::{
    day::{FIRST_OF_MONTH_MODIFIER, FUTURE_STYLE, PAST_STYLE, SELECTED_MODIFIER, TODAY_STYLE},
    MONTH_STYLE, WEEKDAY_STYLE, YEAR_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use time::{
    Date,
    Month::{self, January},
    Weekday::{self, Saturday, Sunday},
};

static HEADER: &str = " Su     Mo     Tu     We     Th     Fr     Sa ";

/// Width of the calendar in columns, not counting the year and months in the
/// margins
const MAIN_WIDTH: u16 = 46;

/// Number of columns on the left side of the calendar, used as the margin in
/// which the year is written
const LEFT_MARGIN: u16 = 6;

const LONGEST_MONTH_NAME_LEN: u16 = 9; // September

/// Columns between the right edge of the calendar and the start of the month
/// name
const MONTH_GUTTER: u16 = 2;

/// Number of columns on the right side of the calendar, used as the margin in
/// which the month is written
const RIGHT_MARGIN: u16 = LONGEST_MONTH_NAME_LEN + MONTH_GUTTER;

const TOTAL_WIDTH: u16 = LEFT_MARGIN + MAIN_WIDTH + RIGHT_MARGIN;

/// Number of lines taken up by the header and its rule
const HEADER_LINES: u16 = 2;

/// When inserting a vertical bar-like character between consecutive days in
/// the same week but different months, draw it this many columns to the right
/// of the left edge of the day on the left.
const VBAR_OFFSET: u16 = 5;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

const ACS_HLINE: char = '─';
const ACS_VLINE: char = '│';
const ACS_TTEE: char = '┬';
const ACS_ULCORNER: char = '┌';
const ACS_LRCORNER: char = '┘';

/// Draws the rows of a [`WeekStrip`] below a weekday header.  `today` is
/// fixed for the whole draw.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Calendar {
    today: Date,
}

impl Calendar {
    pub(crate) fn new(today: Date) -> Calendar {
        Calendar { today }
    }
}

impl StatefulWidget for Calendar {
    type State = WeekStrip;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let left = (area.width.saturating_sub(MAIN_WIDTH) / 2).max(LEFT_MARGIN) - LEFT_MARGIN;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(left),
                Constraint::Length(TOTAL_WIDTH.min(area.width)),
                Constraint::Min(0),
            ])
            .split(area);
        let area = chunks[1];
        state.set_viewport_height(area.height.saturating_sub(HEADER_LINES));
        let rows = state.render_pass(self.today);
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_header();
        let mut labelled_top = false;
        for placed in &rows {
            let Some(y) = i32::try_from(placed.y)
                .ok()
                .and_then(|y| y.checked_add(i32::from(HEADER_LINES)))
            else {
                continue;
            };
            let week = &placed.row;
            if !labelled_top && placed.y >= 0 {
                canvas.draw_year(y, week[Sunday].year());
                canvas.draw_month(y, week[Saturday].month());
                labelled_top = true;
            }
            if week.has_month_start() {
                canvas.draw_month(y, week[Saturday].month());
                if week[Saturday].month() == January {
                    if week[Sunday].month() == January {
                        canvas.draw_year(y, week[Sunday].year());
                    } else {
                        canvas.draw_year(y + i32::from(ROW_HEIGHT), week[Saturday].year());
                    }
                }
            }
            for (wd, day) in week.enumerate() {
                canvas.draw_day(y, wd, &day.label(), day_style(day));
                if day.is_last_day_of_month() {
                    canvas.draw_month_border(y, wd);
                }
            }
        }
    }
}

fn day_style(day: &DayCell) -> Style {
    let mut style = if day.is_today() {
        TODAY_STYLE
    } else if day.is_past() {
        PAST_STYLE
    } else {
        FUTURE_STYLE
    };
    if day.is_first_of_month() {
        style = style.add_modifier(FIRST_OF_MONTH_MODIFIER);
    }
    if day.selected {
        style = style.add_modifier(SELECTED_MODIFIER);
    }
    style
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    // Rows scrolled partway under the header must not draw over it
    fn body_line(&self, y: i32) -> Option<u16> {
        u16::try_from(y)
            .ok()
            .filter(|&y| (HEADER_LINES..self.area.height).contains(&y))
    }

    fn draw_header(&mut self) {
        self.mvprint(0, LEFT_MARGIN, HEADER, Some(WEEKDAY_STYLE));
        self.hline(HEADER_LINES - 1, LEFT_MARGIN, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_year(&mut self, y: i32, year: i32) {
        if let Some(y) = self.body_line(y) {
            self.mvprint(y, 0, year.to_string(), Some(YEAR_STYLE));
        }
    }

    fn draw_month(&mut self, y: i32, month: Month) {
        if let Some(y) = self.body_line(y) {
            self.mvprint(
                y,
                LEFT_MARGIN + MAIN_WIDTH + MONTH_GUTTER,
                month.to_string(),
                Some(MONTH_STYLE),
            );
        }
    }

    fn draw_day(&mut self, y: i32, wd: Weekday, label: &str, style: Style) {
        if let Some(y) = self.body_line(y) {
            self.mvprint(y, LEFT_MARGIN + DAY_WIDTH * wd.index0(), label, Some(style));
        }
    }

    // `y` and `wd` specify the "coordinates" of the last day of the month
    // after which the border is drawn
    fn draw_month_border(&mut self, y: i32, wd: Weekday) {
        let offset = DAY_WIDTH * wd.index0();
        let bar_col = LEFT_MARGIN + offset + VBAR_OFFSET;
        if wd != Saturday {
            if let Some(line) = self.body_line(y) {
                self.mvaddch(line, bar_col, ACS_VLINE);
            }
            if y == i32::from(HEADER_LINES) {
                self.mvaddch(HEADER_LINES - 1, bar_col, ACS_TTEE);
            } else if let Some(above) = self.body_line(y - 1) {
                self.mvaddch(above, bar_col, ACS_ULCORNER);
                if let Some(length) = MAIN_WIDTH.checked_sub(offset + VBAR_OFFSET + 1) {
                    self.hline(above, bar_col + 1, ACS_HLINE, length);
                }
            }
            if let Some(below) = self.body_line(y + 1) {
                self.mvaddch(below, bar_col, ACS_LRCORNER);
            }
        }
        if let Some(below) = self.body_line(y + 1) {
            self.hline(below, LEFT_MARGIN, ACS_HLINE, offset + VBAR_OFFSET);
        }
    }

    fn mvaddch(&mut self, y: u16, x: u16, ch: char) {
        if y < self.area.height && x < self.area.width {
            if let Some(cell) = self.buf.cell_mut((x + self.area.x, y + self.area.y)) {
                cell.set_char(ch);
            }
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
