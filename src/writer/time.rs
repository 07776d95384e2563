use crate::error::{Result, WriterError};
use crate::writer::{split_tail, ActiveState, RollInterval, RollPolicy, RollingKind};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::fmt;

/// Source of the writer's notion of "now", in local wall-clock time.
///
/// The default [`SystemClock`] reads the system time; tests can substitute
/// a manual clock to drive rollover across day boundaries.
pub trait Clock {
    fn now_local(&self) -> NaiveDateTime;
}

/// [`Clock`] backed by the system time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Rolls the log when a time interval passes.
///
/// The live filename embeds a timestamp formatted with a `strftime` pattern
/// (`a.log.02Aug26`), so rotation opens a new file under a new name instead
/// of renaming the old one.
#[derive(Debug, Clone)]
pub struct TimeRolling<C = SystemClock> {
    pattern: String,
    interval: RollInterval,
    clock: C,
}

impl TimeRolling {
    pub fn new(pattern: impl Into<String>, interval: RollInterval) -> Self {
        Self::with_clock(pattern, interval, SystemClock)
    }
}

impl<C: Clock> TimeRolling<C> {
    /// Time policy reading "now" from a caller-supplied clock.
    pub fn with_clock(pattern: impl Into<String>, interval: RollInterval, clock: C) -> Self {
        Self {
            pattern: pattern.into(),
            interval,
            clock,
        }
    }

    fn format_tail(&self, t: NaiveDateTime) -> String {
        t.format(&self.pattern).to_string()
    }
}

/// Parses `tail` under a `strftime` pattern in local time.
///
/// chrono splits datetime, date-only, and time-only patterns across three
/// parsers, so each is tried in turn; missing components default to
/// midnight on the epoch date.
fn parse_tail(tail: &str, pattern: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(tail, pattern) {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(tail, pattern) {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(t) = NaiveTime::parse_from_str(tail, pattern) {
        return Some(NaiveDate::default().and_time(t));
    }
    None
}

impl<C: Clock> RollPolicy for TimeRolling<C> {
    fn kind(&self) -> RollingKind {
        RollingKind::Time
    }

    fn needs_roll(&self, active: &ActiveState<'_>) -> Result<bool> {
        let now = self.clock.now_local();
        let live_name = format!("{}.{}", active.original_name, self.format_tail(now));
        if live_name == active.current_name {
            return Ok(false);
        }

        match self.interval {
            RollInterval::Any => Ok(true),
            RollInterval::Daily => {
                let tail =
                    split_tail(active.current_name, active.original_name).unwrap_or_default();
                let previous = parse_tail(tail, &self.pattern).ok_or_else(|| {
                    WriterError::UnparsableTail {
                        tail: tail.to_string(),
                        pattern: self.pattern.clone(),
                    }
                })?;
                Ok(now - previous >= TimeDelta::hours(24))
            }
        }
    }

    fn is_valid_tail(&self, tail: &str) -> bool {
        !tail.is_empty() && parse_tail(tail, &self.pattern).is_some()
    }

    fn sort_tails(&self, tails: &mut [String]) {
        // Invalid tails were filtered out before sorting; a failed parse
        // still orders first instead of panicking.
        tails.sort_by_key(|tail| parse_tail(tail, &self.pattern));
    }

    fn next_tail(&self, _last_tail: &str) -> Option<String> {
        // The timestamp already lives in the filename; rotation never renames.
        None
    }

    fn active_name(&self, original_name: &str) -> String {
        format!(
            "{}.{}",
            original_name,
            self.format_tail(self.clock.now_local())
        )
    }
}

impl<C> fmt::Display for TimeRolling<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pattern: {}, interval: {}", self.pattern, self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Clock pinned to a settable instant.
    struct FixedClock(Cell<NaiveDateTime>);

    impl FixedClock {
        fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Self {
            let t = NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, s)
                .unwrap();
            Self(Cell::new(t))
        }

        fn advance(&self, delta: TimeDelta) {
            self.0.set(self.0.get() + delta);
        }
    }

    impl Clock for &FixedClock {
        fn now_local(&self) -> NaiveDateTime {
            self.0.get()
        }
    }

    fn active<'a>(original: &'a str, current: &'a str) -> ActiveState<'a> {
        ActiveState {
            original_name: original,
            current_name: current,
            current_size: 0,
        }
    }

    #[test]
    fn test_parse_tail_shapes() {
        // date-only
        let d = parse_tail("02Aug26", "%d%b%y").unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2026, 8, 2).unwrap());
        assert_eq!(d.time(), NaiveTime::MIN);

        // time-only
        let t = parse_tail("150405", "%H%M%S").unwrap();
        assert_eq!(t.time(), NaiveTime::from_hms_opt(15, 4, 5).unwrap());

        // full datetime
        let dt = parse_tail("2026-08-02 15:04:05", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(
            dt,
            NaiveDate::from_ymd_opt(2026, 8, 2)
                .unwrap()
                .and_hms_opt(15, 4, 5)
                .unwrap()
        );

        assert_eq!(parse_tail("garbage", "%d%b%y"), None);
    }

    #[test]
    fn test_tail_round_trip() {
        let clock = FixedClock::at(2026, 8, 2, 0, 0, 0);
        let policy = TimeRolling::with_clock("%d%b%y", RollInterval::Daily, &clock);
        for tail in ["02Aug26", "15Aug13", "01Jan70"] {
            assert!(policy.is_valid_tail(tail));
            let parsed = parse_tail(tail, "%d%b%y").unwrap();
            assert_eq!(parsed.format("%d%b%y").to_string(), tail);
        }
        assert!(!policy.is_valid_tail(""));
        assert!(!policy.is_valid_tail("1"));
    }

    #[test]
    fn test_live_name_embeds_timestamp() {
        let clock = FixedClock::at(2026, 8, 2, 0, 0, 0);
        let policy = TimeRolling::with_clock("%d%b%y", RollInterval::Daily, &clock);
        assert_eq!(policy.active_name("a.log"), "a.log.02Aug26");
        assert_eq!(policy.next_tail(""), None);
    }

    #[test]
    fn test_no_roll_while_tail_matches() {
        let clock = FixedClock::at(2026, 8, 2, 9, 0, 0);
        let policy = TimeRolling::with_clock("%d%b%y", RollInterval::Daily, &clock);
        let state = active("a.log", "a.log.02Aug26");

        assert!(!policy.needs_roll(&state).unwrap());

        // Same day, later hour: tail unchanged, still no roll.
        clock.advance(TimeDelta::hours(5));
        assert!(!policy.needs_roll(&state).unwrap());
    }

    #[test]
    fn test_daily_rolls_after_a_day() {
        let clock = FixedClock::at(2026, 8, 2, 9, 0, 0);
        let policy = TimeRolling::with_clock("%d%b%y", RollInterval::Daily, &clock);
        let state = active("a.log", "a.log.02Aug26");

        // The tail anchors at midnight of its day; 25h past 09:00 is well
        // over a day later, so the roll fires.
        clock.advance(TimeDelta::hours(25));
        assert!(policy.needs_roll(&state).unwrap());
    }

    #[test]
    fn test_any_interval_rolls_on_tail_change() {
        let clock = FixedClock::at(2026, 8, 2, 15, 4, 5);
        let policy = TimeRolling::with_clock("%H%M%S", RollInterval::Any, &clock);
        let state = active("a.log", "a.log.150405");

        assert!(!policy.needs_roll(&state).unwrap());
        clock.advance(TimeDelta::seconds(1));
        assert!(policy.needs_roll(&state).unwrap());
    }

    #[test]
    fn test_daily_unparsable_tail_is_an_error() {
        let clock = FixedClock::at(2026, 8, 3, 9, 0, 0);
        let policy = TimeRolling::with_clock("%d%b%y", RollInterval::Daily, &clock);
        let state = active("a.log", "a.log.not-a-date");

        let err = policy.needs_roll(&state).unwrap_err();
        assert!(matches!(err, WriterError::UnparsableTail { .. }));
    }

    #[test]
    fn test_sort_by_parsed_instant() {
        let clock = FixedClock::at(2026, 8, 2, 0, 0, 0);
        let policy = TimeRolling::with_clock("%d%b%y", RollInterval::Daily, &clock);
        let mut tails = vec![
            "16Aug13".to_string(),
            "11Aug13".to_string(),
            "15Aug13".to_string(),
        ];
        policy.sort_tails(&mut tails);
        assert_eq!(tails, ["11Aug13", "15Aug13", "16Aug13"]);
    }
}
