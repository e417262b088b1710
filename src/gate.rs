use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::svc::{Clock, SystemClock};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum GateState {
    #[default]
    Closed,
    Open,
}

/// A time window, bounded by an optional start and an optional end.
///
/// Both bounds are inclusive. A gate without any bound is closed.
/// The bounds are not checked against each other: an inverted window
/// (start after end) is accepted and simply never opens.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "DateTime<Tz>: Serialize",
    deserialize = "DateTime<Tz>: Deserialize<'de>"
))]
pub struct Gate<Tz: TimeZone = Local> {
    #[serde(default)]
    start: Option<DateTime<Tz>>,
    #[serde(default)]
    end: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> Default for Gate<Tz> {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
        }
    }
}

impl<Tz: TimeZone> Gate<Tz> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both bounds at once.
    pub fn set_gate(&mut self, start: Option<DateTime<Tz>>, end: Option<DateTime<Tz>>) {
        log::debug!("Set gate: start {:?}, end {:?}", start, end);

        self.start = start;
        self.end = end;

        if self.is_inverted() {
            log::warn!(
                "Gate starts after it ends, it will never open: {:?} > {:?}",
                self.start,
                self.end
            );
        }
    }

    pub fn start(&self) -> Option<&DateTime<Tz>> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&DateTime<Tz>> {
        self.end.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_inverted(&self) -> bool {
        matches!((&self.start, &self.end), (Some(start), Some(end)) if start > end)
    }

    pub fn state_at(&self, now: &DateTime<Tz>) -> GateState {
        let open = match (&self.start, &self.end) {
            (None, None) => false,
            (Some(start), None) => start <= now,
            (None, Some(end)) => now <= end,
            (Some(start), Some(end)) => start <= now && now <= end,
        };

        log::trace!("Gate at {:?} is open: {}", now, open);

        if open {
            GateState::Open
        } else {
            GateState::Closed
        }
    }

    pub fn state_with<C: Clock<Tz>>(&self, clock: &C) -> GateState {
        self.state_at(&clock.now())
    }

    pub fn is_open_at(&self, now: &DateTime<Tz>) -> bool {
        self.state_at(now) == GateState::Open
    }

    pub fn is_open_with<C: Clock<Tz>>(&self, clock: &C) -> bool {
        self.state_with(clock) == GateState::Open
    }

    /// Check the window against the wall clock, at call time.
    pub fn is_open(&self) -> bool
    where
        SystemClock: Clock<Tz>,
    {
        self.is_open_with(&SystemClock)
    }
}

impl<Tz: TimeZone> fmt::Display for Gate<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => write!(f, "Gate start in {start} until {end}."),
            (Some(start), None) => write!(f, "Gate start in {start}."),
            (None, Some(end)) => write!(f, "Gate ending until {end}."),
            (None, None) => Ok(()),
        }
    }
}
