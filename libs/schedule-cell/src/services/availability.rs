use tracing::warn;

use crate::models::{BookedSlot, CalendarDay, SlotStatus, SlotTime, WorkTimeWindow};
use crate::services::calendar;

/// Whether any of the doctor's declared windows for `day_name` contains
/// `time`. Both window bounds are inclusive. Windows with unparseable times
/// are skipped rather than failing the whole grid.
pub fn in_working_hours(work_times: &[WorkTimeWindow], day_name: &str, time: SlotTime) -> bool {
    work_times
        .iter()
        .filter(|wt| wt.day == day_name)
        .any(|wt| {
            match (SlotTime::parse(&wt.start_time), SlotTime::parse(&wt.end_time)) {
                (Some(start), Some(end)) => start <= time && time <= end,
                _ => {
                    warn!(
                        "skipping work-time window {} with malformed bounds {}..{}",
                        wt.id, wt.start_time, wt.end_time
                    );
                    false
                }
            }
        })
}

/// Whether a confirmed appointment already occupies (`day_name`, `time`).
/// Times are compared after normalization, so "9:00" and "09:00" collide.
pub fn is_booked(booked: &[BookedSlot], day_name: &str, time: SlotTime) -> bool {
    booked
        .iter()
        .any(|slot| slot.day_of_week == day_name && SlotTime::parse(&slot.time) == Some(time))
}

/// The reconciler: derives one slot's status from the two stores.
/// Pure — identical inputs always classify identically.
pub fn classify_slot(
    day: &CalendarDay,
    time: SlotTime,
    work_times: &[WorkTimeWindow],
    booked: &[BookedSlot],
) -> SlotStatus {
    if is_booked(booked, &day.full_name, time) {
        return SlotStatus::Booked;
    }

    if in_working_hours(work_times, &day.full_name, time) {
        SlotStatus::Available
    } else {
        SlotStatus::Unavailable
    }
}

/// Binary contract used by the submitter's pre-checks: bookable iff inside
/// some work window and not already taken.
pub fn is_slot_available(
    day: &CalendarDay,
    time: SlotTime,
    work_times: &[WorkTimeWindow],
    booked: &[BookedSlot],
) -> bool {
    classify_slot(day, time, work_times, booked) == SlotStatus::Available
}

/// Whether the doctor declared any window at all for this weekday; drives
/// which day buttons are selectable.
pub fn day_has_work_time(work_times: &[WorkTimeWindow], day_name: &str) -> bool {
    work_times.iter().any(|wt| wt.day == day_name)
}

/// Classify the whole grid for one day.
pub fn day_grid(
    day: &CalendarDay,
    work_times: &[WorkTimeWindow],
    booked: &[BookedSlot],
) -> Vec<(SlotTime, SlotStatus)> {
    calendar::time_slots()
        .into_iter()
        .map(|slot| (slot, classify_slot(day, slot, work_times, booked)))
        .collect()
}
