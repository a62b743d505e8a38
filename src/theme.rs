use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const YEAR_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) mod day {
    use super::*;

    pub(crate) const PAST_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const TODAY_STYLE: Style = Style::new()
        .fg(Color::LightYellow)
        .bg(Color::Black)
        .add_modifier(Modifier::BOLD);

    pub(crate) const FUTURE_STYLE: Style = BASE_STYLE;

    pub(crate) const FIRST_OF_MONTH_MODIFIER: Modifier = Modifier::UNDERLINED;

    pub(crate) const SELECTED_MODIFIER: Modifier = Modifier::REVERSED;
}

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
