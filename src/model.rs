use crate::resolve::PriorityPolicy;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::Date;

/// A span of calendar dates, inclusive at both ends
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Returns `None` if `end` is before `start`
    pub(crate) fn new(start: Date, end: Date) -> Option<DateRange> {
        (start <= end).then_some(DateRange { start, end })
    }

    pub(crate) fn start(&self) -> Date {
        self.start
    }

    pub(crate) fn end(&self) -> Date {
        self.end
    }

    /// Number of days from `start` to `end`; never negative
    pub(crate) fn duration(&self) -> i64 {
        (self.end - self.start).whole_days()
    }

    /// True if `other` lies entirely within `self`
    pub(crate) fn contains(&self, other: &DateRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if the two ranges share no date
    pub(crate) fn is_disjoint(&self, other: &DateRange) -> bool {
        self.start > other.end || self.end < other.start
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum EventColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
}

impl EventColor {
    pub(crate) const ALL: [EventColor; 8] = [
        EventColor::Black,
        EventColor::Red,
        EventColor::Green,
        EventColor::Yellow,
        EventColor::Blue,
        EventColor::Magenta,
        EventColor::Cyan,
        EventColor::Gray,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            EventColor::Black => "black",
            EventColor::Red => "red",
            EventColor::Green => "green",
            EventColor::Yellow => "yellow",
            EventColor::Blue => "blue",
            EventColor::Magenta => "magenta",
            EventColor::Cyan => "cyan",
            EventColor::Gray => "gray",
        }
    }

    /// Comma-separated list of every accepted color name
    pub(crate) fn supported() -> String {
        EventColor::ALL.map(EventColor::name).join(", ")
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<EventColor, ParseColorError> {
        EventColor::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or(ParseColorError)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("unknown event color")]
pub(crate) struct ParseColorError;

/// A named, colored period of someone's life
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Event {
    pub(crate) name: Option<String>,
    pub(crate) range: DateRange,
    pub(crate) color: EventColor,
}

/// Drawing preferences stated in the calendar file
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct DisplayOptions {
    pub(crate) policy: PriorityPolicy,
    /// Fixed character for claimed weeks, in place of the week-of-year letter
    pub(crate) marker: Option<char>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Calendar {
    pub(crate) name: String,
    pub(crate) birthday: Date,
    pub(crate) events: Vec<Event>,
    pub(crate) options: DisplayOptions,
}
