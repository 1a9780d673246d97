use chrono::{NaiveTime, Timelike};

use crate::models::OpeningWindow;

pub const SLOT_STEP_MINUTES: u32 = 30;

// Longer services get the grid a 180-minute service would.
pub const DURATION_CAP_MINUTES: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGenerator {
    open: u32,
    close: u32,
    fit_minutes: u32,
    step: u32,
}

impl SlotGenerator {
    pub fn new(window: OpeningWindow, service_duration: u32) -> Self {
        Self::with_step(window, service_duration, SLOT_STEP_MINUTES)
    }

    pub fn with_step(window: OpeningWindow, service_duration: u32, step: u32) -> Self {
        Self {
            open: minute_of_day(&window.open),
            close: minute_of_day(&window.close),
            fit_minutes: service_duration.min(DURATION_CAP_MINUTES),
            step: step.max(1),
        }
    }

    pub fn iter(&self) -> SlotIter {
        SlotIter {
            next: self.open,
            grid: *self,
        }
    }
}

impl IntoIterator for SlotGenerator {
    type Item = NaiveTime;
    type IntoIter = SlotIter;

    fn into_iter(self) -> SlotIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SlotIter {
    next: u32,
    grid: SlotGenerator,
}

impl Iterator for SlotIter {
    type Item = NaiveTime;

    fn next(&mut self) -> Option<NaiveTime> {
        let start = self.next;
        if start + self.grid.fit_minutes > self.grid.close {
            return None;
        }
        self.next = start + self.grid.step;
        NaiveTime::from_hms_opt(start / 60, start % 60, 0)
    }
}

fn minute_of_day(t: &NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_slot::format_hhmm;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn window(open: &str, close: &str) -> OpeningWindow {
        OpeningWindow {
            open: t(open),
            close: t(close),
        }
    }

    fn grid(duration: u32) -> Vec<String> {
        SlotGenerator::new(window("10:00", "18:30"), duration)
            .iter()
            .map(|s| format_hhmm(&s))
            .collect()
    }

    #[test]
    fn test_thirty_minute_service_fills_day() {
        let slots = grid(30);
        assert_eq!(slots.len(), 17);
        assert_eq!(slots.first().unwrap(), "10:00");
        assert_eq!(slots.last().unwrap(), "18:00");
    }

    #[test]
    fn test_longer_service_stops_earlier() {
        let slots = grid(90);
        assert_eq!(slots.last().unwrap(), "17:00");
        for s in SlotGenerator::new(window("10:00", "18:30"), 90) {
            assert!(minute_of_day(&s) + 90 <= minute_of_day(&t("18:30")));
        }
    }

    #[test]
    fn test_duration_is_capped() {
        assert_eq!(grid(240), grid(180));
        assert_eq!(grid(240).last().unwrap(), "15:30");
        assert_eq!(grid(600).len(), 12);
    }

    #[test]
    fn test_ascending_without_duplicates() {
        let slots: Vec<_> = SlotGenerator::new(window("10:00", "18:30"), 45).iter().collect();
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_restartable() {
        let grid = SlotGenerator::new(window("10:00", "18:30"), 60);
        let first: Vec<_> = grid.iter().collect();
        let second: Vec<_> = grid.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_window_shorter_than_service() {
        assert_eq!(SlotGenerator::new(window("10:00", "10:30"), 60).iter().count(), 0);
        assert_eq!(SlotGenerator::new(window("10:00", "10:30"), 30).iter().count(), 1);
    }

    #[test]
    fn test_zero_step_does_not_loop_forever() {
        let grid = SlotGenerator::with_step(window("10:00", "10:05"), 1, 0);
        assert_eq!(grid.iter().count(), 5);
    }
}
