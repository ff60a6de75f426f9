use crossterm::{
    queue,
    style::{self as term, Attribute, Print, SetAttribute, SetForegroundColor},
};
use ratatui::{
    buffer::{Buffer, Cell},
    style::{Color, Modifier},
};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Write the contents of `buf` to `out` as lines of text, with styling
/// conveyed by ANSI escape sequences.  Trailing unstyled blanks on each line
/// are dropped.
pub(crate) fn write_buffer<W: Write>(buf: &Buffer, out: &mut W) -> io::Result<()> {
    let area = buf.area;
    for y in area.top()..area.bottom() {
        let cells = visible_cells(buf, y);
        let used = cells.iter().rposition(|c| !is_blank(c)).map_or(0, |i| i + 1);
        for run in cells[..used].chunk_by(|a, b| same_style(a, b)) {
            write_run(out, run)?;
        }
        queue!(out, Print('\n'))?;
    }
    out.flush()
}

/// The cells of row `y` that are actually drawn.  A wide symbol covers the
/// cells after it, so those are skipped.
fn visible_cells(buf: &Buffer, y: u16) -> Vec<&Cell> {
    let area = buf.area;
    let mut cells = Vec::new();
    let mut x = area.left();
    while x < area.right() {
        let Some(cell) = buf.cell((x, y)) else {
            break;
        };
        cells.push(cell);
        let width = u16::try_from(cell.symbol().width()).unwrap_or(u16::MAX);
        x = x.saturating_add(width.max(1));
    }
    cells
}

/// Write consecutive cells that share a style
fn write_run<W: Write>(out: &mut W, run: &[&Cell]) -> io::Result<()> {
    let Some(first) = run.first() else {
        return Ok(());
    };
    let styled = first.fg != Color::Reset || !first.modifier.is_empty();
    if let Some(color) = term_color(first.fg) {
        queue!(out, SetForegroundColor(color))?;
    }
    if first.modifier.contains(Modifier::REVERSED) {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    if first.modifier.contains(Modifier::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    for cell in run {
        queue!(out, Print(cell.symbol()))?;
    }
    if styled {
        queue!(out, SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

fn is_blank(cell: &Cell) -> bool {
    cell.symbol() == " " && cell.fg == Color::Reset && cell.modifier.is_empty()
}

fn same_style(a: &Cell, b: &Cell) -> bool {
    a.fg == b.fg && a.modifier == b.modifier
}

fn term_color(color: Color) -> Option<term::Color> {
    match color {
        Color::Reset => None,
        Color::Black => Some(term::Color::Black),
        Color::Red => Some(term::Color::DarkRed),
        Color::Green => Some(term::Color::DarkGreen),
        Color::Yellow => Some(term::Color::DarkYellow),
        Color::Blue => Some(term::Color::DarkBlue),
        Color::Magenta => Some(term::Color::DarkMagenta),
        Color::Cyan => Some(term::Color::DarkCyan),
        Color::Gray => Some(term::Color::Grey),
        Color::DarkGray => Some(term::Color::DarkGrey),
        Color::LightRed => Some(term::Color::Red),
        Color::LightGreen => Some(term::Color::Green),
        Color::LightYellow => Some(term::Color::Yellow),
        Color::LightBlue => Some(term::Color::Blue),
        Color::LightMagenta => Some(term::Color::Magenta),
        Color::LightCyan => Some(term::Color::Cyan),
        Color::White => Some(term::Color::White),
        Color::Rgb(r, g, b) => Some(term::Color::Rgb { r, g, b }),
        Color::Indexed(i) => Some(term::Color::AnsiValue(i)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    fn written(buf: &Buffer) -> String {
        let mut out = Vec::new();
        write_buffer(buf, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain() {
        let buf = Buffer::with_lines(["", "  1 : ....  [x]", " . "]);
        assert_eq!(written(&buf), "\n  1 : ....  [x]\n .\n");
    }

    #[test]
    fn test_attributes() {
        let mut buf = Buffer::with_lines(["Title", "..AB."]);
        buf.set_style(Rect::new(0, 0, 5, 1), Style::new().add_modifier(Modifier::BOLD));
        buf.set_style(
            Rect::new(2, 1, 2, 1),
            Style::new().add_modifier(Modifier::REVERSED | Modifier::BOLD),
        );
        assert_eq!(
            written(&buf),
            "\x1b[1mTitle\x1b[0m\n..\x1b[7m\x1b[1mAB\x1b[0m.\n"
        );
    }

    #[test]
    fn test_wide_symbols() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 12, 2));
        let bold = Style::new().add_modifier(Modifier::BOLD);
        buf.set_stringn(0, 0, "山田の人生", 12, bold);
        buf.set_stringn(0, 1, "a人b", 12, Style::new());
        assert_eq!(written(&buf), "\x1b[1m山田の人生\x1b[0m\na人b\n");
    }

    #[test]
    fn test_colors() {
        assert_eq!(term_color(Color::Reset), None);
        assert_eq!(term_color(Color::Blue), Some(term::Color::DarkBlue));
        assert_eq!(term_color(Color::Gray), Some(term::Color::Grey));
    }
}
