use chrono::{DateTime, Duration, FixedOffset, Local, TimeZone, Utc};

pub trait Clock<Tz: TimeZone> {
    fn now(&self) -> DateTime<Tz>;
}

/// Wall clock of the host.
#[derive(Default, Debug, Copy, Clone)]
pub struct SystemClock;

impl Clock<Local> for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

impl Clock<Utc> for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl Clock<FixedOffset> for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().into()
    }
}

/// A clock stuck at a given instant, until it is explicitly advanced.
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone> {
    now: DateTime<Tz>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, duration: Duration) {
        self.now = self.now.clone() + duration;
    }
}

impl<Tz: TimeZone> Clock<Tz> for FixedClock<Tz> {
    fn now(&self) -> DateTime<Tz> {
        self.now.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_does_not_move_until_advanced() {
        let t = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let mut clock = FixedClock::new(t);

        assert_eq!(clock.now(), t);
        assert_eq!(clock.now(), t);

        clock.advance(Duration::days(1));
        assert_eq!(clock.now(), t + Duration::days(1));
    }

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let before = Utc::now();
        let now: DateTime<Utc> = SystemClock.now();
        let after = Utc::now();

        assert!(before <= now && now <= after);
    }
}
