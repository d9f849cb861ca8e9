use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use crate::models::{CalendarDay, Countdown, SlotTime};

/// The bookable grid runs 08:00 up to, but not including, 20:00.
const GRID_START_MINUTES: u16 = 8 * 60;
const GRID_END_MINUTES: u16 = 20 * 60;
const SLOT_STEP_MINUTES: u16 = 30;

pub fn full_day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn short_day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    let weekday = match name.trim().to_ascii_lowercase().as_str() {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Schedule-editor day numbering: Monday = 1 .. Sunday = 7.
pub fn weekday_from_id(id: u8) -> Option<Weekday> {
    let weekday = match id {
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        7 => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// The rolling 7-day booking window: today first, ascending calendar days.
pub fn rolling_week(today: NaiveDate) -> Vec<CalendarDay> {
    (0..7)
        .map(|offset| {
            let date = today + Duration::days(offset);
            CalendarDay {
                day: short_day_name(date.weekday()).to_string(),
                date: date.day(),
                full_name: full_day_name(date.weekday()).to_string(),
                full_date: date,
            }
        })
        .collect()
}

/// The fixed half-hour slot grid, "08:00" through "19:30".
pub fn time_slots() -> Vec<SlotTime> {
    (GRID_START_MINUTES..GRID_END_MINUTES)
        .step_by(usize::from(SLOT_STEP_MINUTES))
        .map(|minutes| SlotTime::from_hm(minutes / 60, minutes % 60))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

/// Date-time of the next occurrence of `day_of_week` at `time`, counting
/// from `now`'s calendar day. A matching weekday whose time already passed
/// today still resolves to today; `time_remaining` reports it as passed.
pub fn next_occurrence(now: NaiveDateTime, day_of_week: &str, time: SlotTime) -> Option<NaiveDateTime> {
    let target = weekday_from_name(day_of_week)?;
    let today = now.date().weekday();

    let diff = i64::from(target.num_days_from_sunday()) - i64::from(today.num_days_from_sunday());
    let offset = if diff >= 0 { diff } else { diff + 7 };

    Some((now.date() + Duration::days(offset)).and_time(time.to_naive_time()))
}

/// Countdown shown next to the patient's upcoming appointment.
pub fn time_remaining(now: NaiveDateTime, day_of_week: &str, time: SlotTime) -> Option<Countdown> {
    let occurrence = next_occurrence(now, day_of_week, time)?;
    let remaining = occurrence - now;

    if remaining <= Duration::zero() {
        return Some(Countdown::Passed);
    }

    Some(Countdown::Upcoming {
        days: remaining.num_days(),
        hours: remaining.num_hours() % 24,
        minutes: remaining.num_minutes() % 60,
    })
}
