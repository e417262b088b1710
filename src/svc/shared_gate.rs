use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, TimeZone};

use crate::gate::Gate;
use crate::svc::{Clock, SystemClock};

/// A [`Gate`] that can be shared between threads.
///
/// Every operation takes the lock for its whole duration, so a reader never
/// sees a start from one `set_gate` and an end from another.
pub struct SharedGate<Tz: TimeZone = Local>(Arc<Mutex<Gate<Tz>>>);

impl<Tz: TimeZone> Clone for SharedGate<Tz> {
    fn clone(&self) -> Self {
        SharedGate(self.0.clone())
    }
}

impl<Tz: TimeZone> Default for SharedGate<Tz> {
    fn default() -> Self {
        SharedGate::new(Gate::default())
    }
}

impl<Tz: TimeZone> From<Gate<Tz>> for SharedGate<Tz> {
    fn from(gate: Gate<Tz>) -> Self {
        SharedGate::new(gate)
    }
}

impl<Tz: TimeZone> SharedGate<Tz> {
    pub fn new(gate: Gate<Tz>) -> Self {
        SharedGate(Arc::new(Mutex::new(gate)))
    }

    // A panic while holding the lock cannot leave the gate half updated,
    // both bounds are always replaced together.
    fn lock(&self) -> MutexGuard<'_, Gate<Tz>> {
        self.0.lock().unwrap_or_else(|e: PoisonError<_>| {
            log::warn!("Gate lock is poisoned, recovering");
            e.into_inner()
        })
    }

    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(&mut Gate<Tz>),
    {
        f(self.lock().deref_mut())
    }

    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Gate<Tz>) -> T,
    {
        f(self.lock().deref())
    }

    pub fn set_gate(&self, start: Option<DateTime<Tz>>, end: Option<DateTime<Tz>>) {
        self.modify(|x| x.set_gate(start, end))
    }

    /// A copy of the gate, as it is now.
    pub fn snapshot(&self) -> Gate<Tz> {
        self.read(|x| x.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.read(|x| x.is_empty())
    }

    pub fn is_open_at(&self, now: &DateTime<Tz>) -> bool {
        self.read(|x| x.is_open_at(now))
    }

    pub fn is_open_with<C: Clock<Tz>>(&self, clock: &C) -> bool {
        self.is_open_at(&clock.now())
    }

    pub fn is_open(&self) -> bool
    where
        SystemClock: Clock<Tz>,
    {
        self.is_open_with(&SystemClock)
    }
}

impl<Tz: TimeZone> fmt::Debug for SharedGate<Tz>
where
    Tz: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|x| f.debug_tuple("SharedGate").field(x).finish())
    }
}

impl<Tz: TimeZone> fmt::Display for SharedGate<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|x| fmt::Display::fmt(x, f))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use insta::assert_debug_snapshot;

    use super::*;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test_log::test]
    fn test_clones_see_the_same_gate() {
        let gate = SharedGate::<Utc>::default();
        let other = gate.clone();

        assert!(other.is_empty());
        gate.set_gate(Some(noon() - Duration::days(1)), None);

        assert!(!other.is_empty());
        assert!(other.is_open_at(&noon()));
        assert_eq!(other.to_string(), "Gate start in 2026-10-17 12:00:00 UTC.");
    }

    #[test_log::test]
    fn test_gate_updated_from_another_thread() {
        let gate = SharedGate::<Utc>::default();
        let writer = gate.clone();

        std::thread::spawn(move || {
            writer.set_gate(Some(noon()), Some(noon() + Duration::days(1)));
        })
        .join()
        .unwrap();

        let snapshot = gate.snapshot();
        assert_eq!(snapshot.start(), Some(&noon()));
        assert!(gate.is_open_at(&(noon() + Duration::hours(1))));
        assert!(!gate.is_open_at(&(noon() - Duration::hours(1))));
    }

    #[test_log::test]
    fn test_gate_survives_panic_while_locked() {
        let gate = SharedGate::<Utc>::default();
        gate.set_gate(Some(noon() - Duration::days(1)), None);

        let writer = gate.clone();
        let result = std::thread::spawn(move || {
            writer.modify(|_| panic!("panic while holding the gate"));
        })
        .join();
        assert!(result.is_err());

        assert!(!gate.is_empty());
        assert!(gate.is_open_at(&noon()));
        assert_eq!(gate.to_string(), "Gate start in 2026-10-17 12:00:00 UTC.");
        assert_eq!(gate.snapshot().start(), Some(&(noon() - Duration::days(1))));

        gate.set_gate(None, Some(noon() - Duration::days(1)));
        assert!(!gate.is_empty());
        assert!(!gate.is_open_at(&noon()));

        gate.set_gate(None, None);
        assert!(gate.is_empty());
    }

    #[test_log::test]
    fn test_modify_keeps_bounds_consistent() {
        let gate = SharedGate::from(Gate::new());
        gate.set_gate(Some(noon()), None);

        gate.modify(|x| {
            let start = x.start().cloned();
            x.set_gate(None, start);
        });

        let snapshot = gate.snapshot();
        assert_eq!(snapshot.start(), None);
        assert_eq!(snapshot.end(), Some(&noon()));
    }

    #[test_log::test]
    fn test_debug() {
        let gate = SharedGate::<Utc>::default();
        gate.set_gate(None, Some(noon()));
        assert_debug_snapshot!(gate, @r###"
        SharedGate(
            Gate {
                start: None,
                end: Some(
                    2026-10-18T12:00:00Z,
                ),
            },
        )
        "###);
    }

    #[test_log::test]
    fn test_is_open_with_system_clock() {
        let gate = SharedGate::<Local>::default();
        assert!(!gate.is_open());

        gate.set_gate(Some(Local::now() - Duration::days(1)), None);
        assert!(gate.is_open());
    }
}
