use crate::model::DateRange;
use thiserror::Error;
use time::{Date, Duration};

/// Most weeks whose starts all fit in a 365-day year
const MAX_WEEKS_PER_YEAR: u16 = 53;

/// Dimensions of the life calendar
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GridConfig {
    pub(crate) total_years: u16,
    pub(crate) weeks_per_year: u16,
}

impl GridConfig {
    pub(crate) fn cell_count(&self) -> usize {
        usize::from(self.total_years) * usize::from(self.weeks_per_year)
    }
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            total_years: 100,
            weeks_per_year: 52,
        }
    }
}

/// One week of the grid.  `year` and `week` are 0-based.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WeekCell {
    pub(crate) year: u16,
    pub(crate) week: u16,
    pub(crate) range: DateRange,
}

/// The partition of a lifetime into rows of weeks, one row per year starting
/// on each anniversary of `birthday`.
///
/// Week `w` of year `y` runs from `birthday + y years + w weeks` to
/// `birthday + y years + (w + 1) weeks`, except that the last week of each
/// year runs up to the next anniversary so that the rows cover time without
/// gaps.  A row therefore ends on the anniversary itself: for a birthday of
/// 1990-06-15, row 0 ends on 1991-06-15 rather than on the day before, and
/// its last week is one or two days longer than the others.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WeekGrid {
    birthday: Date,
    config: GridConfig,
}

impl WeekGrid {
    pub(crate) fn new(birthday: Date, config: GridConfig) -> Result<WeekGrid, GridError> {
        if config.weeks_per_year > MAX_WEEKS_PER_YEAR {
            return Err(GridError::TooManyWeeks(config.weeks_per_year));
        }
        // Anniversaries grow monotonically, and every week starts before the
        // next anniversary, so if the final one exists, every cell boundary
        // does too.
        if add_years(birthday, config.total_years).is_none() {
            return Err(GridError::OutOfRange {
                birthday,
                total_years: config.total_years,
            });
        }
        Ok(WeekGrid { birthday, config })
    }

    pub(crate) fn config(&self) -> GridConfig {
        self.config
    }

    /// All cells of the grid, year by year.  Each call starts over from the
    /// first week.
    pub(crate) fn cells(&self) -> impl Iterator<Item = WeekCell> {
        let grid = *self;
        (0..self.config.total_years).flat_map(move |year| grid.year(year))
    }

    /// The cells of a single year row
    pub(crate) fn year(&self, year: u16) -> impl Iterator<Item = WeekCell> {
        let grid = *self;
        (0..self.config.weeks_per_year).map(move |week| grid.cell(year, week))
    }

    /// From the anniversary starting row `year` to the next one
    pub(crate) fn year_span(&self, year: u16) -> DateRange {
        let start = self.anniversary(year);
        let end = self.anniversary(year + 1);
        DateRange::new(start, end).expect("anniversaries should be increasing")
    }

    fn cell(&self, year: u16, week: u16) -> WeekCell {
        let start = self.week_start(year, week);
        let end = if week + 1 == self.config.weeks_per_year {
            self.anniversary(year + 1)
        } else {
            self.week_start(year, week + 1)
        };
        WeekCell {
            year,
            week,
            range: DateRange::new(start, end).expect("week should not end before it starts"),
        }
    }

    fn anniversary(&self, year: u16) -> Date {
        add_years(self.birthday, year).expect("grid dates were checked in WeekGrid::new()")
    }

    fn week_start(&self, year: u16, week: u16) -> Date {
        self.anniversary(year)
            .checked_add(Duration::weeks(week.into()))
            .expect("grid dates were checked in WeekGrid::new()")
    }
}

/// Shift `date` by whole years, keeping the month and day.  February 29 falls
/// back to February 28 in non-leap years.  Returns `None` past the end of the
/// supported date range.
pub(crate) fn add_years(date: Date, years: u16) -> Option<Date> {
    let year = date.year().checked_add(years.into())?;
    let (_, month, day) = date.to_calendar_date();
    (1..=day)
        .rev()
        .find_map(|d| Date::from_calendar_date(year, month, d).ok())
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum GridError {
    #[error("a {total_years}-year calendar starting on {birthday} runs past the last supported date")]
    OutOfRange { birthday: Date, total_years: u16 },
    #[error("{0} weeks do not fit in a year")]
    TooManyWeeks(u16),
}
