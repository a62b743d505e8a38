use crate::theme::{
    jumpto::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};
use time::{Date, Month};

const OUTER_WIDTH: u16 = 17;
const OUTER_HEIGHT: u16 = 8;

/// Digits in a YYYYMMDD date
const DIGITS: usize = 8;

/// Placeholder shown for each unfilled digit, and the separator drawn before
/// it (if any)
const TEMPLATE: [(Option<char>, &str); DIGITS] = [
    (None, "Y"),
    (None, "Y"),
    (None, "Y"),
    (None, "Y"),
    (Some('-'), "M"),
    (None, "M"),
    (Some('-'), "D"),
    (None, "D"),
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct JumpTo;

impl StatefulWidget for JumpTo {
    type State = JumpToState;

    /*
     * .................
     * .┌─ Jump To… ──┐.
     * .│             │.
     * .│ -YYYY-MM-DD │.
     * .│             │.
     * .│   [ENTER]   │.
     * .└─────────────┘.
     * .................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Jump To… ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct JumpToState {
    negative: bool,
    digits: [Option<u8>; DIGITS],
    filled: usize,
}

impl JumpToState {
    pub(crate) fn new() -> JumpToState {
        JumpToState::default()
    }

    fn ready(&self) -> bool {
        self.filled == DIGITS
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Style a span and convert it to a line rather than creating a
            // styled line directly so that only the "[ENTER]" text and not any
            // of its centering padding will be underlined:
            Line::from(Span::styled(
                "[ENTER]",
                if self.ready() {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            if self.negative { "-" } else { " " },
            BASE_STYLE,
        )];
        for ((sep, placeholder), digit) in TEMPLATE.into_iter().zip(self.digits) {
            if let Some(sep) = sep {
                spans.push(Span::styled(String::from(sep), BASE_STYLE));
            }
            spans.push(match digit {
                Some(d) => Span::styled(d.to_string(), BASE_STYLE),
                None => Span::styled(placeholder, UNFILLED_CELL_STYLE),
            });
        }
        Line::from_iter(spans)
    }

    fn number(digits: &[Option<u8>]) -> Option<u16> {
        digits
            .iter()
            .try_fold(0u16, |acc, d| Some(acc * 10 + u16::from((*d)?)))
    }

    fn to_date(self) -> Option<Date> {
        let (year, rest) = self.digits.split_at(4);
        let (month, day) = rest.split_at(2);
        let mut year = i32::from(JumpToState::number(year)?);
        if self.negative {
            year = -year;
        }
        let month = Month::try_from(u8::try_from(JumpToState::number(month)?).ok()?).ok()?;
        let day = u8::try_from(JumpToState::number(day)?).ok()?;
        Date::from_calendar_date(year, month, day).ok()
    }

    pub(crate) fn handle_input(&mut self, input: JumpToInput) -> JumpToOutput {
        match input {
            JumpToInput::Negative if self.filled == 0 => {
                self.negative = !self.negative;
                JumpToOutput::Ok
            }
            JumpToInput::Positive if self.filled == 0 => {
                self.negative = false;
                JumpToOutput::Ok
            }
            JumpToInput::Digit(d) if d < 10 && !self.ready() => {
                self.digits[self.filled] = Some(d);
                self.filled += 1;
                JumpToOutput::Ok
            }
            JumpToInput::Backspace if self.filled > 0 => {
                self.filled -= 1;
                self.digits[self.filled] = None;
                JumpToOutput::Ok
            }
            JumpToInput::Enter if self.ready() => match self.to_date() {
                Some(date) => JumpToOutput::Jump(date),
                None => JumpToOutput::Invalid,
            },
            _ => JumpToOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToInput {
    Negative,
    Positive,
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToOutput {
    Ok,
    Invalid,
    Jump(Date),
}
