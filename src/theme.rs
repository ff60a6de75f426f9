use crate::model::EventColor;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const TITLE_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

pub(crate) const FILLER_STYLE: Style = Style::new();

const MARK_STYLE: Style = Style::new()
    .add_modifier(Modifier::REVERSED)
    .add_modifier(Modifier::BOLD);

/// Style of a week claimed by an event of the given color
pub(crate) const fn mark_style(color: EventColor) -> Style {
    MARK_STYLE.fg(match color {
        EventColor::Black => Color::Black,
        EventColor::Red => Color::Red,
        EventColor::Green => Color::Green,
        EventColor::Yellow => Color::Yellow,
        EventColor::Blue => Color::Blue,
        EventColor::Magenta => Color::Magenta,
        EventColor::Cyan => Color::Cyan,
        EventColor::Gray => Color::Gray,
    })
}
