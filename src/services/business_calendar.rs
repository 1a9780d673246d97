use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{OpeningWindow, WeeklySchedule};

pub const SAME_DAY_CUTOFF: (u32, u32) = (17, 30);

#[derive(Debug, Clone)]
pub struct BusinessCalendar {
    schedule: WeeklySchedule,
    cutoff: NaiveTime,
}

impl BusinessCalendar {
    pub fn new(schedule: WeeklySchedule) -> Self {
        let (h, m) = SAME_DAY_CUTOFF;
        Self {
            schedule,
            cutoff: NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default(),
        }
    }

    pub fn is_open_day(&self, date: &NaiveDate) -> bool {
        !self.schedule.for_date(date).is_closed
    }

    pub fn hours_for(&self, date: &NaiveDate) -> Option<OpeningWindow> {
        let hours = self.schedule.for_date(date);
        if hours.is_closed {
            return None;
        }
        Some(OpeningWindow {
            open: hours.open_time,
            close: hours.close_time,
        })
    }

    // None for closed weekdays, past dates, and today once the cutoff has passed.
    pub fn bookable_window(&self, date: &NaiveDate, now: &NaiveDateTime) -> Option<OpeningWindow> {
        let today = now.date();
        if *date < today {
            return None;
        }
        if *date == today && now.time() >= self.cutoff {
            return None;
        }
        self.hours_for(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn calendar() -> BusinessCalendar {
        BusinessCalendar::new(WeeklySchedule::canonical())
    }

    #[test]
    fn test_sunday_and_monday_closed() {
        let cal = calendar();
        // 2025-06-15 is a Sunday, 2025-06-16 a Monday
        assert!(!cal.is_open_day(&d("2025-06-15")));
        assert!(!cal.is_open_day(&d("2025-06-16")));
        assert!(cal.hours_for(&d("2025-06-16")).is_none());
        for day in ["2025-06-17", "2025-06-18", "2025-06-19", "2025-06-20", "2025-06-21"] {
            assert!(cal.is_open_day(&d(day)), "{day} should be open");
        }
    }

    #[test]
    fn test_hours_for_open_day() {
        let window = calendar().hours_for(&d("2025-06-18")).unwrap();
        assert_eq!(window.open, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(window.close, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
    }

    #[test]
    fn test_same_day_cutoff() {
        let cal = calendar();
        let today = d("2025-06-17");
        assert!(cal.bookable_window(&today, &dt("2025-06-17 09:00")).is_some());
        assert!(cal.bookable_window(&today, &dt("2025-06-17 17:29")).is_some());
        assert!(cal.bookable_window(&today, &dt("2025-06-17 17:30")).is_none());
        assert!(cal.bookable_window(&today, &dt("2025-06-17 17:45")).is_none());
    }

    #[test]
    fn test_cutoff_never_blocks_future_days() {
        let cal = calendar();
        let now = dt("2025-06-17 23:00");
        assert!(cal.bookable_window(&d("2025-06-18"), &now).is_some());
    }

    #[test]
    fn test_past_dates_not_bookable() {
        let cal = calendar();
        let now = dt("2025-06-18 09:00");
        assert!(cal.bookable_window(&d("2025-06-17"), &now).is_none());
    }
}
