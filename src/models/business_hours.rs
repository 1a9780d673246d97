use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::time_slot::hhmm;

// day_of_week counts from Sunday = 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHours {
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    pub open_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub close_time: NaiveTime,
    pub is_closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [BusinessHours; 7],
}

impl WeeklySchedule {
    pub fn from_records(records: Vec<BusinessHours>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            records.len() == 7,
            "expected 7 business hours records, found {}",
            records.len()
        );

        let mut slots: [Option<BusinessHours>; 7] = Default::default();
        for record in records {
            let idx = usize::from(record.day_of_week);
            anyhow::ensure!(idx < 7, "invalid day of week: {}", record.day_of_week);
            anyhow::ensure!(
                record.is_closed || record.open_time < record.close_time,
                "day {} opens at {} but closes at {}",
                record.day_of_week,
                record.open_time.format("%H:%M"),
                record.close_time.format("%H:%M")
            );
            anyhow::ensure!(
                slots[idx].is_none(),
                "duplicate business hours for day {}",
                record.day_of_week
            );
            slots[idx] = Some(record);
        }

        let mut days = Vec::with_capacity(7);
        for (idx, slot) in slots.into_iter().enumerate() {
            days.push(slot.ok_or_else(|| anyhow::anyhow!("missing business hours for day {idx}"))?);
        }
        let days: [BusinessHours; 7] = days
            .try_into()
            .map_err(|_| anyhow::anyhow!("business hours must cover all seven days"))?;
        Ok(Self { days })
    }

    pub fn for_date(&self, date: &NaiveDate) -> &BusinessHours {
        &self.days[date.weekday().num_days_from_sunday() as usize]
    }
}

// Seeded hours: Sunday and Monday closed, Tuesday through Saturday 10:00-18:30.
#[cfg(test)]
impl WeeklySchedule {
    pub fn canonical() -> Self {
        let open = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let close = NaiveTime::from_hms_opt(18, 30, 0).unwrap();
        let days = std::array::from_fn(|i| BusinessHours {
            day_of_week: i as u8,
            open_time: open,
            close_time: close,
            is_closed: i <= 1,
        });
        Self { days }
    }

    pub fn days(&self) -> &[BusinessHours] {
        &self.days
    }
}
