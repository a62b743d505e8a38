use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static COMMANDS: &[(&str, &str)] = &[
    ("j, DOWN", "Scroll down one week"),
    ("k, UP", "Scroll up one week"),
    ("z, PAGE DOWN", "Scroll down one page"),
    ("w, PAGE UP", "Scroll up one page"),
    ("h, LEFT", "Select previous day"),
    ("l, RIGHT", "Select next day"),
    ("H / L", "Select previous/next week"),
    ("0, HOME", "Select today"),
    ("g", "Input date to jump to"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

const KEYS_WIDTH: usize = 16;

const DISMISS: &str = "Press the Any Key to dismiss.";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text() -> Text<'static> {
        let mut lines = COMMANDS
            .iter()
            .map(|(keys, what)| Line::raw(format!("{keys:KEYS_WIDTH$}{what}")))
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.push(Line::raw(DISMISS));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Help::text();
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        // Leave a column of blank space on either side of the border
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        }
        .intersection(area);
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0)
            .render(help_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::BASE_STYLE;

    #[test]
    fn test_text() {
        let text = Help::text();
        assert_eq!(text.height(), COMMANDS.len() + 2);
        assert_eq!(
            text.lines[0],
            Line::raw("j, DOWN         Scroll down one week")
        );
    }

    #[test]
    fn test_centered_box() {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        Help(BASE_STYLE).render(area, &mut buffer);
        let lines = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        let top = lines
            .iter()
            .position(|ln| ln.contains(" Commands "))
            .unwrap();
        assert!(lines[top + 1].contains("│j, DOWN         Scroll down one week"));
        assert!(lines[top + 13].contains("│Press the Any Key to dismiss."));
        assert!(lines[top + 14].contains('└'));
    }
}
