use crate::grid::{GridConfig, GridError, WeekGrid};
use crate::model::{Calendar, DateRange, DisplayOptions, EventColor};
use crate::resolve::{EventResolver, PriorityPolicy};
use tracing::debug;

static BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Character drawn in a week claimed by an event
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Glyphs {
    /// The week's position in its year, in the base-64 alphabet (`A` for the
    /// first week, `Z` for the 26th, `z` for the 52nd)
    #[default]
    WeekOfYear,
    Marker(char),
}

impl Glyphs {
    pub(crate) fn glyph(self, week: u16) -> char {
        match self {
            Glyphs::WeekOfYear => char::from(BASE64[usize::from(week) % BASE64.len()]),
            Glyphs::Marker(ch) => ch,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct RenderConfig {
    pub(crate) grid: GridConfig,
    pub(crate) policy: PriorityPolicy,
    pub(crate) glyphs: Glyphs,
}

impl RenderConfig {
    /// Apply the preferences a calendar file states for itself
    pub(crate) fn with_options(self, options: DisplayOptions) -> RenderConfig {
        RenderConfig {
            policy: options.policy,
            glyphs: options.marker.map_or(Glyphs::WeekOfYear, Glyphs::Marker),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Mark {
    pub(crate) glyph: char,
    pub(crate) color: EventColor,
}

/// One year of the calendar, ready to draw
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct YearRow {
    /// 0-based, which is also the age reached at the start of the row
    pub(crate) year: u16,
    pub(crate) span: DateRange,
    /// One entry per week; `None` for weeks no event claims
    pub(crate) cells: Vec<Option<Mark>>,
}

impl YearRow {
    pub(crate) fn label(&self) -> String {
        format!("{:3} : ", u32::from(self.year) + 1)
    }

    pub(crate) fn summary(&self) -> String {
        format!(
            "  [{}, {}] // Age {}",
            self.span.start(),
            self.span.end(),
            self.year
        )
    }
}

/// Resolve every week of `calendar` into rows of marks.
///
/// Fails before doing any work if the grid would run past the supported date
/// range.
pub(crate) fn layout(
    calendar: &Calendar,
    config: RenderConfig,
) -> Result<Vec<YearRow>, GridError> {
    let grid = WeekGrid::new(calendar.birthday, config.grid)?;
    let resolver = EventResolver::new(&calendar.events, config.policy);
    debug!(
        years = config.grid.total_years,
        weeks_per_year = config.grid.weeks_per_year,
        cells = config.grid.cell_count(),
        events = calendar.events.len(),
        policy = ?config.policy,
        "Laying out calendar"
    );
    let rows = (0..grid.config().total_years)
        .map(|year| YearRow {
            year,
            span: grid.year_span(year),
            cells: grid
                .year(year)
                .map(|cell| {
                    resolver.resolve(&cell.range).map(|event| Mark {
                        glyph: config.glyphs.glyph(cell.week),
                        color: event.color,
                    })
                })
                .collect(),
        })
        .collect::<Vec<_>>();
    debug!(
        marked = rows.iter().flat_map(|r| &r.cells).flatten().count(),
        "Resolved weeks"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Event;
    use time::macros::date;

    fn college_calendar() -> Calendar {
        Calendar {
            name: String::from("Jo"),
            birthday: date!(1990 - 06 - 15),
            events: vec![Event {
                name: Some(String::from("college")),
                range: DateRange::new(date!(2008 - 09 - 01), date!(2012 - 06 - 01)).unwrap(),
                color: EventColor::Blue,
            }],
            options: DisplayOptions::default(),
        }
    }

    fn config(total_years: u16) -> RenderConfig {
        RenderConfig {
            grid: GridConfig {
                total_years,
                weeks_per_year: 52,
            },
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(Glyphs::WeekOfYear.glyph(0), 'A');
        assert_eq!(Glyphs::WeekOfYear.glyph(25), 'Z');
        assert_eq!(Glyphs::WeekOfYear.glyph(26), 'a');
        assert_eq!(Glyphs::WeekOfYear.glyph(51), 'z');
        assert_eq!(Glyphs::WeekOfYear.glyph(63), '/');
        assert_eq!(Glyphs::WeekOfYear.glyph(64), 'A');
        assert_eq!(Glyphs::Marker('#').glyph(12), '#');
    }

    #[test]
    fn test_with_options() {
        let config = RenderConfig::default().with_options(DisplayOptions {
            policy: PriorityPolicy::LastDeclared,
            marker: Some('*'),
        });
        assert_eq!(config.grid, GridConfig::default());
        assert_eq!(config.policy, PriorityPolicy::LastDeclared);
        assert_eq!(config.glyphs, Glyphs::Marker('*'));
        let config = RenderConfig::default().with_options(DisplayOptions::default());
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_marker_glyph() {
        let mut calendar = college_calendar();
        calendar.options.marker = Some('#');
        let config = config(20).with_options(calendar.options);
        let rows = layout(&calendar, config).unwrap();
        assert!(rows[18].cells[11..]
            .iter()
            .all(|&c| c == Some(Mark { glyph: '#', color: EventColor::Blue })));
    }

    #[test]
    fn test_row_text() {
        let rows = layout(&college_calendar(), config(2)).unwrap();
        assert_eq!(rows[0].label(), "  1 : ");
        assert_eq!(
            rows[0].summary(),
            "  [1990-06-15, 1991-06-15] // Age 0"
        );
        assert_eq!(rows[1].label(), "  2 : ");
        assert_eq!(
            rows[1].summary(),
            "  [1991-06-15, 1992-06-15] // Age 1"
        );
    }

    #[test]
    fn test_college_outside_first_five_years() {
        let rows = layout(&college_calendar(), config(5)).unwrap();
        assert_eq!(rows.len(), 5);
        for row in &rows {
            assert_eq!(row.cells.len(), 52);
            assert!(row.cells.iter().all(Option::is_none), "{row:?}");
        }
    }

    #[test]
    fn test_college_weeks_marked() {
        let calendar = college_calendar();
        let college = calendar.events[0].range;
        let rows = layout(&calendar, config(25)).unwrap();
        let grid = WeekGrid::new(calendar.birthday, config(25).grid).unwrap();
        let mut marked = 0;
        for cell in grid.cells() {
            let got = rows[usize::from(cell.year)].cells[usize::from(cell.week)];
            if college.is_disjoint(&cell.range) {
                assert_eq!(got, None, "{cell:?}");
            } else {
                let glyph = Glyphs::WeekOfYear.glyph(cell.week);
                assert_eq!(
                    got,
                    Some(Mark {
                        glyph,
                        color: EventColor::Blue
                    }),
                    "{cell:?}"
                );
                marked += 1;
            }
        }
        // Rows 18 through 21, from week 11 of the first to week 50 of the last
        assert_eq!(marked, 196);
        // The first marked week is the one containing 2008-09-01
        assert_eq!(
            rows[18].cells[11],
            Some(Mark {
                glyph: 'L',
                color: EventColor::Blue
            })
        );
        assert_eq!(rows[18].cells[10], None);
    }
}
