use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How durations advance across the calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarMode {
    #[default]
    CalendarDay,
    /// Saturdays and Sundays are skipped when advancing a date.
    BusinessDay,
}

impl CalendarMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarMode::CalendarDay => "calendar-day",
            CalendarMode::BusinessDay => "business-day",
        }
    }
}

impl fmt::Display for CalendarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "calendar-day" | "calendar" => Ok(CalendarMode::CalendarDay),
            "business-day" | "business" => Ok(CalendarMode::BusinessDay),
            other => Err(format!(
                "unknown calendar mode '{other}' (expected calendar-day or business-day)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCalendar {
    mode: CalendarMode,
    non_working_days: HashSet<Weekday>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::new(CalendarMode::CalendarDay)
    }
}

impl WorkCalendar {
    pub fn new(mode: CalendarMode) -> Self {
        let non_working_days = match mode {
            CalendarMode::CalendarDay => HashSet::new(),
            CalendarMode::BusinessDay => HashSet::from([Weekday::Sat, Weekday::Sun]),
        };
        Self {
            mode,
            non_working_days,
        }
    }

    pub fn mode(&self) -> CalendarMode {
        self.mode
    }

    /// Check if a date is available for scheduling
    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.non_working_days.contains(&date.weekday())
    }

    /// Find the next available date after a given date.
    ///
    /// `None` once the walk runs past the last representable date.
    pub fn next_available(&self, from: NaiveDate) -> Option<NaiveDate> {
        let mut current = from.succ_opt()?;
        while !self.is_available(current) {
            current = current.succ_opt()?;
        }
        Some(current)
    }

    /// The given date if available, otherwise the next available one
    pub fn first_available_on_or_after(&self, from: NaiveDate) -> Option<NaiveDate> {
        if self.is_available(from) {
            Some(from)
        } else {
            self.next_available(from)
        }
    }

    fn available_per_week(&self) -> i64 {
        7 - self.non_working_days.len() as i64
    }

    /// Find a date N available days ahead
    pub fn find_next_available(&self, from: NaiveDate, days_ahead: i64) -> Option<NaiveDate> {
        let per_week = self.available_per_week();
        if per_week <= 0 {
            return None;
        }

        // any seven consecutive days hold `per_week` available ones
        let mut current = from;
        let mut remaining = days_ahead;
        if remaining > per_week {
            let weeks = (remaining - 1) / per_week;
            let span = u64::try_from(weeks.checked_mul(7)?).ok()?;
            current = current.checked_add_days(Days::new(span))?;
            remaining -= weeks * per_week;
        }

        while remaining > 0 {
            current = current.succ_opt()?;
            if self.is_available(current) {
                remaining -= 1;
            }
        }
        Some(current)
    }

    /// Last day occupied by a task of `duration_days` that starts on `start`.
    ///
    /// The start day itself counts as the first day of work, so a one-day task
    /// ends on the day it starts. Zero-length tasks also end on their start.
    pub fn finish_date(&self, start: NaiveDate, duration_days: u32) -> Option<NaiveDate> {
        if duration_days <= 1 {
            return Some(start);
        }
        self.find_next_available(start, i64::from(duration_days) - 1)
    }

    /// Count available days in a date range (inclusive)
    pub fn count_available_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let mut count = 0;
        let mut current = start;

        while current <= end {
            if self.is_available(current) {
                count += 1;
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn calendar_mode_parses_both_spellings() {
        assert_eq!("business".parse::<CalendarMode>(), Ok(CalendarMode::BusinessDay));
        assert_eq!(
            "calendar-day".parse::<CalendarMode>(),
            Ok(CalendarMode::CalendarDay)
        );
        assert!("lunar".parse::<CalendarMode>().is_err());
    }

    #[test]
    fn one_day_task_ends_on_its_start() {
        let cal = WorkCalendar::new(CalendarMode::BusinessDay);
        assert_eq!(cal.finish_date(d(2024, 3, 4), 1), Some(d(2024, 3, 4)));
        assert_eq!(cal.finish_date(d(2024, 3, 4), 0), Some(d(2024, 3, 4)));
    }

    #[test]
    fn business_days_in_a_week() {
        let cal = WorkCalendar::new(CalendarMode::BusinessDay);
        // Monday 2024-03-04 .. Sunday 2024-03-10
        assert_eq!(cal.count_available_days(d(2024, 3, 4), d(2024, 3, 10)), 5);
        let all = WorkCalendar::default();
        assert_eq!(all.count_available_days(d(2024, 3, 4), d(2024, 3, 10)), 7);
    }

    #[test]
    fn week_skipping_matches_a_day_by_day_walk() {
        let cal = WorkCalendar::new(CalendarMode::BusinessDay);
        for offset in 0..7 {
            let from = d(2024, 3, 4) + chrono::Duration::days(offset);
            let mut walked = from;
            for days_ahead in 1..=23 {
                walked = cal.next_available(walked).unwrap();
                assert_eq!(cal.find_next_available(from, days_ahead), Some(walked));
            }
        }
    }

    #[test]
    fn walking_past_the_last_date_is_none() {
        let cal = WorkCalendar::default();
        assert_eq!(cal.next_available(NaiveDate::MAX), None);
        assert_eq!(cal.finish_date(d(2024, 1, 1), u32::MAX), None);
        assert_eq!(
            WorkCalendar::new(CalendarMode::BusinessDay).finish_date(d(2024, 1, 1), 100_000_000),
            None
        );
        assert_eq!(cal.count_available_days(NaiveDate::MAX, NaiveDate::MAX), 1);
    }
}
