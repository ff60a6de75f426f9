use super::layout::YearRow;
use crate::theme::{mark_style, FILLER_STYLE, TITLE_STYLE};
use ratatui::prelude::*;

/// Number of columns to the left of the week cells, used as the margin in
/// which each row's number is written
const LEFT_MARGIN: u16 = 6;

/// Number of lines above the first year: a blank line, the title, and the
/// rule beneath it
const HEADER_LINES: u16 = 3;

const TITLE_LINE: u16 = 1;

const RULE_LINE: u16 = 2;

const RULE_CHAR: char = '-';

const FILLER_CHAR: char = '.';

/// The whole life calendar: a title over one line per year
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct LifeCalendar<'a> {
    title: &'a str,
    rows: &'a [YearRow],
    weeks_per_year: u16,
}

impl<'a> LifeCalendar<'a> {
    pub(crate) fn new(title: &'a str, rows: &'a [YearRow], weeks_per_year: u16) -> Self {
        LifeCalendar {
            title,
            rows,
            weeks_per_year,
        }
    }

    /// Smallest area that holds the calendar without truncation
    pub(crate) fn area(&self) -> Rect {
        let title_width = LEFT_MARGIN.saturating_add(text_width(self.title));
        let row_width = self
            .rows
            .iter()
            .map(|row| {
                text_width(&row.label())
                    .max(LEFT_MARGIN)
                    .saturating_add(self.weeks_per_year)
                    .saturating_add(text_width(&row.summary()))
            })
            .max()
            .unwrap_or(0);
        let rule_width = LEFT_MARGIN.saturating_add(self.weeks_per_year);
        let height = u16::try_from(self.rows.len())
            .unwrap_or(u16::MAX)
            .saturating_add(HEADER_LINES);
        Rect::new(0, 0, title_width.max(row_width).max(rule_width), height)
    }

    pub(crate) fn to_buffer(&self) -> Buffer {
        let mut buf = Buffer::empty(self.area());
        self.render(buf.area, &mut buf);
        buf
    }
}

impl Widget for &LifeCalendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(self.title);
        canvas.draw_rule(self.weeks_per_year);
        for (y, row) in std::iter::zip(HEADER_LINES.., self.rows) {
            canvas.draw_row(y, row);
        }
    }
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

    fn draw_title(&mut self, title: &str) {
        self.mvprint(TITLE_LINE, LEFT_MARGIN, title, TITLE_STYLE);
    }

    fn draw_rule(&mut self, length: u16) {
        self.mvprint(
            RULE_LINE,
            LEFT_MARGIN,
            String::from(RULE_CHAR).repeat(length.into()),
            Style::new(),
        );
    }

    fn draw_row(&mut self, y: u16, row: &YearRow) {
        self.mvprint(y, 0, row.label(), Style::new());
        let mut x = LEFT_MARGIN;
        for cell in &row.cells {
            match cell {
                Some(mark) => self.mvaddch(y, x, mark.glyph, mark_style(mark.color)),
                None => self.mvaddch(y, x, FILLER_CHAR, FILLER_STYLE),
            }
            x = x.saturating_add(1);
        }
        self.mvprint(y, x, row.summary(), Style::new());
    }

    fn mvaddch(&mut self, y: u16, x: u16, ch: char, style: Style) {
        if y < self.area.height && x < self.area.width {
            if let Some(cell) = self.buf.cell_mut((x + self.area.x, y + self.area.y)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            // Text running past the right edge of the area is cut off
            self.buf.set_stringn(
                x + self.area.x,
                y + self.area.y,
                s,
                usize::from(self.area.width - x),
                style,
            );
        }
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(Line::raw(s).width()).unwrap_or(u16::MAX)
}
