use crate::model::{DateRange, Event};
use std::str::FromStr;
use thiserror::Error;

/// Which of several events intersecting the same week gets to claim it
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum PriorityPolicy {
    /// Events are scanned from longest to shortest, so a shorter event
    /// overrides a longer one.  Events of equal length are scanned in reverse
    /// declaration order, so the one declared first wins.
    #[default]
    ShortestFirst,

    /// Events are scanned in declaration order, so the one declared last wins.
    LastDeclared,
}

impl PriorityPolicy {
    pub(crate) const ALL: [PriorityPolicy; 2] =
        [PriorityPolicy::ShortestFirst, PriorityPolicy::LastDeclared];

    pub(crate) fn name(self) -> &'static str {
        match self {
            PriorityPolicy::ShortestFirst => "shortest-first",
            PriorityPolicy::LastDeclared => "last-declared",
        }
    }

    fn scan_order(self, events: &[Event]) -> Vec<&Event> {
        let mut order = events.iter().collect::<Vec<_>>();
        if self == PriorityPolicy::ShortestFirst {
            // Stable sort, then reverse: longest first, ties in reverse
            // declaration order
            order.sort_by_key(|ev| ev.range.duration());
            order.reverse();
        }
        order
    }
}

impl FromStr for PriorityPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<PriorityPolicy, ParsePolicyError> {
        PriorityPolicy::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or(ParsePolicyError)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("unknown priority policy")]
pub(crate) struct ParsePolicyError;

/// How an event's dates relate to a week
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Overlap {
    /// The event lies entirely inside the week
    Bounded,
    /// The event and the week share some but not all dates
    Partial,
    Disjoint,
}

impl Overlap {
    pub(crate) fn between(event: &DateRange, week: &DateRange) -> Overlap {
        if week.contains(event) {
            Overlap::Bounded
        } else if week.is_disjoint(event) {
            Overlap::Disjoint
        } else {
            Overlap::Partial
        }
    }
}

/// Picks the event shown for each week.
///
/// The scan order only depends on the events, so it is computed once and
/// reused for every week.  Scanning stops at the first event bounded by the
/// week; otherwise the last partially overlapping event in scan order wins.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventResolver<'a> {
    scan: Vec<&'a Event>,
}

impl<'a> EventResolver<'a> {
    pub(crate) fn new(events: &'a [Event], policy: PriorityPolicy) -> Self {
        EventResolver {
            scan: policy.scan_order(events),
        }
    }

    pub(crate) fn resolve(&self, week: &DateRange) -> Option<&'a Event> {
        let mut candidate = None;
        for &event in &self.scan {
            match Overlap::between(&event.range, week) {
                Overlap::Bounded => return Some(event),
                Overlap::Partial => candidate = Some(event),
                Overlap::Disjoint => (),
            }
        }
        candidate
    }
}
