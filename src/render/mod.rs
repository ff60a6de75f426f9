mod ansi;
mod layout;
mod widget;
pub(crate) use self::layout::{layout, RenderConfig};
use self::widget::LifeCalendar;
use crate::grid::GridError;
use crate::model::Calendar;
use std::io::{self, Write};
use thiserror::Error;

/// Lay out the whole calendar, then write it to `out`.  Nothing is written if
/// the layout fails.
pub(crate) fn render<W: Write>(
    calendar: &Calendar,
    config: RenderConfig,
    out: &mut W,
) -> Result<(), RenderError> {
    let rows = layout(calendar, config)?;
    let view = LifeCalendar::new(&calendar.name, &rows, config.grid.weeks_per_year);
    ansi::write_buffer(&view.to_buffer(), out)?;
    Ok(())
}

#[derive(Debug, Error)]
pub(crate) enum RenderError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("failed to write calendar")]
    Write(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use crate::loader::{parse, FileFormat};

    fn render_text(json: &str, total_years: u16) -> Result<String, RenderError> {
        let calendar = parse(json, FileFormat::Json).unwrap();
        let config = RenderConfig {
            grid: GridConfig {
                total_years,
                weeks_per_year: 52,
            },
            ..RenderConfig::default()
        };
        let mut out = Vec::new();
        render(&calendar, config, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_college_first_five_years() {
        let text = render_text(
            r#"{"name": "Jo", "birthday": "1990-06-15", "events": [
                {"name": "college", "start": "2008-09-01", "end": "2012-06-01", "color": "blue"}
            ]}"#,
            5,
        )
        .unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        let dots = ".".repeat(52);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "      \x1b[1mJo\x1b[0m");
        assert_eq!(lines[2], format!("      {}", "-".repeat(52)));
        assert_eq!(
            lines[3],
            format!("  1 : {dots}  [1990-06-15, 1991-06-15] // Age 0")
        );
        assert_eq!(
            lines[7],
            format!("  5 : {dots}  [1994-06-15, 1995-06-15] // Age 4")
        );
    }

    #[test]
    fn test_marked_row() {
        let text = render_text(
            r#"{"birthday": "2000-01-01", "events": [
                {"start": "2000-01-03", "end": "2000-01-20", "color": "red"}
            ]}"#,
            1,
        )
        .unwrap();
        let row = text.lines().nth(3).unwrap();
        assert!(row.starts_with("  1 : "), "{row:?}");
        // Three weeks are claimed, drawn in the event's color, reversed and bold
        assert_eq!(row.matches("\x1b[7m\x1b[1m").count(), 1, "{row:?}");
        assert!(
            row.contains("  1 : \x1b[38;5;1m\x1b[7m\x1b[1mABC\x1b[0m"),
            "{row:?}"
        );
        assert!(
            row.ends_with(&format!("{}  [2000-01-01, 2001-01-01] // Age 0", ".".repeat(49))),
            "{row:?}"
        );
    }

    #[test]
    fn test_wide_title() {
        let text = render_text(
            r#"{"name": "山田の人生", "birthday": "2000-01-01", "events": []}"#,
            1,
        )
        .unwrap();
        let title = text.lines().nth(1).unwrap();
        assert_eq!(title, "      \x1b[1m山田の人生\x1b[0m");
    }

    #[test]
    fn test_out_of_range_writes_nothing() {
        let calendar = parse(
            r#"{"birthday": "9990-01-01", "events": []}"#,
            FileFormat::Json,
        )
        .unwrap();
        let mut out = Vec::new();
        let r = render(&calendar, RenderConfig::default(), &mut out);
        assert!(
            matches!(r, Err(RenderError::Grid(GridError::OutOfRange { .. }))),
            "{r:?}"
        );
        assert!(out.is_empty());
    }
}
