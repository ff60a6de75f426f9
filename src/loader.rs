use crate::model::{Calendar, DateRange, DisplayOptions, Event, EventColor};
use crate::resolve::PriorityPolicy;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{macros::format_description, Date};
use tracing::{debug, trace};
use unicode_width::UnicodeWidthChar;

/// Key under which toml presents a native date value as a one-entry map
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Title used when the calendar file does not name itself
pub(crate) const DEFAULT_TITLE: &str = "Life Calendar";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    /// `*.toml` files are TOML; everything else is read as JSON
    pub(crate) fn for_path(path: &Path) -> FileFormat {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => FileFormat::Toml,
            _ => FileFormat::Json,
        }
    }
}

pub(crate) fn load(path: &Path) -> Result<Calendar, LoadError> {
    let format = FileFormat::for_path(path);
    debug!(path = %path.display(), ?format, "Loading calendar");
    let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse(&text, format)
}

pub(crate) fn parse(text: &str, format: FileFormat) -> Result<Calendar, LoadError> {
    let file: CalendarFile = match format {
        FileFormat::Json => serde_json::from_str(text)?,
        FileFormat::Toml => toml::from_str(text)?,
    };
    let calendar = file.validate()?;
    debug!(
        birthday = %calendar.birthday,
        events = calendar.events.len(),
        options = ?calendar.options,
        "Calendar is valid"
    );
    for event in &calendar.events {
        trace!(
            name = event.name.as_deref().unwrap_or("<unnamed>"),
            start = %event.range.start(),
            end = %event.range.end(),
            color = %event.color,
            "Loaded event"
        );
    }
    Ok(calendar)
}

#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error("failed to read {}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse calendar JSON")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse calendar TOML")]
    Toml(#[from] toml::de::Error),
    #[error("calendar failed validation")]
    Invalid(#[from] ValidationErrors),
}

/// Every problem found while validating a calendar file
#[derive(Debug)]
pub(crate) struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub(crate) fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            1 => write!(f, "1 invalid field:")?,
            n => write!(f, "{n} invalid fields:")?,
        }
        for e in &self.0 {
            write!(f, "\n  {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
#[error("{field}: {kind}")]
pub(crate) struct FieldError {
    /// Path to the offending field, e.g. `events[2].color`
    pub(crate) field: String,
    pub(crate) kind: FieldErrorKind,
}

#[derive(Debug, Error)]
pub(crate) enum FieldErrorKind {
    #[error("invalid date {value:?}, expected YYYY-MM-DD: {source}")]
    BadDate {
        value: String,
        source: time::error::Parse,
    },
    #[error("unsupported color {value:?}, expected one of: {}", EventColor::supported())]
    UnsupportedColor { value: String },
    #[error("event ends on {end}, before it starts on {start}")]
    EndBeforeStart { start: Date, end: Date },
    #[error("unknown priority {value:?}, expected \"shortest-first\" or \"last-declared\"")]
    UnknownPriority { value: String },
    #[error("marker {value:?} is not a single character one column wide")]
    BadMarker { value: String },
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct CalendarFile {
    #[serde(default, alias = "displayName")]
    name: Option<String>,
    birthday: DateText,
    events: Vec<EventEntry>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    marker: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct EventEntry {
    #[serde(default)]
    name: Option<String>,
    start: DateText,
    end: DateText,
    color: String,
}

impl CalendarFile {
    fn validate(self) -> Result<Calendar, ValidationErrors> {
        let mut v = Validator::default();
        let birthday = v.date("birthday".into(), &self.birthday);
        let options = DisplayOptions {
            policy: self
                .priority
                .as_deref()
                .and_then(|p| v.priority(p))
                .unwrap_or_default(),
            marker: self.marker.as_deref().and_then(|m| v.marker(m)),
        };
        let events = self
            .events
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| v.event(i, entry))
            .collect::<Vec<_>>();
        match (birthday, v.errors.is_empty()) {
            (Some(birthday), true) => Ok(Calendar {
                name: self.name.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
                birthday,
                events,
                options,
            }),
            _ => Err(ValidationErrors(v.errors)),
        }
    }
}

#[derive(Debug, Default)]
struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    fn date(&mut self, field: String, value: &DateText) -> Option<Date> {
        match Date::parse(&value.0, format_description!("[year]-[month]-[day]")) {
            Ok(d) => Some(d),
            Err(source) => {
                self.errors.push(FieldError {
                    field,
                    kind: FieldErrorKind::BadDate {
                        value: value.0.clone(),
                        source,
                    },
                });
                None
            }
        }
    }

    fn color(&mut self, field: String, value: &str) -> Option<EventColor> {
        match value.parse::<EventColor>() {
            Ok(c) => Some(c),
            Err(_) => {
                self.errors.push(FieldError {
                    field,
                    kind: FieldErrorKind::UnsupportedColor {
                        value: value.to_owned(),
                    },
                });
                None
            }
        }
    }

    fn priority(&mut self, value: &str) -> Option<PriorityPolicy> {
        let policy = value.parse::<PriorityPolicy>().ok();
        if policy.is_none() {
            self.errors.push(FieldError {
                field: "priority".into(),
                kind: FieldErrorKind::UnknownPriority {
                    value: value.to_owned(),
                },
            });
        }
        policy
    }

    fn marker(&mut self, value: &str) -> Option<char> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ch.width() == Some(1) => Some(ch),
            _ => {
                self.errors.push(FieldError {
                    field: "marker".into(),
                    kind: FieldErrorKind::BadMarker {
                        value: value.to_owned(),
                    },
                });
                None
            }
        }
    }

    fn event(&mut self, index: usize, entry: EventEntry) -> Option<Event> {
        // Check every field before bailing so that all problems get reported
        let start = self.date(format!("events[{index}].start"), &entry.start);
        let end = self.date(format!("events[{index}].end"), &entry.end);
        let color = self.color(format!("events[{index}].color"), &entry.color);
        let (start, end, color) = (start?, end?, color?);
        let Some(range) = DateRange::new(start, end) else {
            self.errors.push(FieldError {
                field: format!("events[{index}]"),
                kind: FieldErrorKind::EndBeforeStart { start, end },
            });
            return None;
        };
        Some(Event {
            name: entry.name,
            range,
            color,
        })
    }
}

/// A date as written in a calendar file, not yet parsed.  JSON only has
/// strings for this; TOML may also use its native date values.
#[derive(Clone, Debug, Eq, PartialEq)]
struct DateText(String);

impl<'de> Deserialize<'de> for DateText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<DateText, D::Error> {
        deserializer.deserialize_any(DateTextVisitor)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DateTextVisitor;

impl<'de> Visitor<'de> for DateTextVisitor {
    type Value = DateText;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a date in YYYY-MM-DD form")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<DateText, E> {
        Ok(DateText(v.to_owned()))
    }

    // toml hands native dates to visitors as a map with a single private key
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DateText, A::Error> {
        match map.next_key::<String>()? {
            Some(key) if key == TOML_DATETIME_KEY => Ok(DateText(map.next_value()?)),
            Some(key) => Err(de::Error::unknown_field(&key, &[])),
            None => Err(de::Error::invalid_length(0, &self)),
        }
    }
}
