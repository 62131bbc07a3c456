use tracing::{debug, warn};

use crate::models::{DayOfWeek, Meridiem, Time, TimeWindow, WeeklyAvailability};

const MINUTES_PER_HOUR: u32 = 60;
const HALF_DAY_MINUTES: u32 = 12 * MINUTES_PER_HOUR;

/// Minutes since midnight for a 12-hour time. PM adds half a day.
///
/// Hour 12 counts as 0 before the PM offset, so 12:00 AM is midnight (0) and
/// 12:00 PM is noon (720). Without the fold a 9 AM - 12 PM window would end at
/// 1440 and swallow every afternoon window.
pub fn time_to_minutes(time: &Time) -> u32 {
    let hour = u32::from(time.hour) % 12;
    let minutes = hour * MINUTES_PER_HOUR + u32::from(time.minute);
    match time.meridiem {
        Meridiem::Am => minutes,
        Meridiem::Pm => minutes + HALF_DAY_MINUTES,
    }
}

/// Windows overlap unless one starts strictly after the other ends, so
/// touching edges count as overlap.
pub fn windows_overlap(a: &TimeWindow, b: &TimeWindow) -> bool {
    let (a_start, a_end) = (time_to_minutes(&a.start), time_to_minutes(&a.end));
    let (b_start, b_end) = (time_to_minutes(&b.start), time_to_minutes(&b.end));

    !(a_start > b_end || a_end < b_start)
}

pub fn any_windows_overlap(windows: &[TimeWindow]) -> bool {
    windows.iter().enumerate().any(|(i, a)| {
        windows[i + 1..].iter().any(|b| windows_overlap(a, b))
    })
}

/// Days whose windows overlap each other, in calendar order.
pub fn find_days_with_overlap(availability: &WeeklyAvailability) -> Vec<DayOfWeek> {
    debug!(
        "Checking {} windows across {} days for overlap",
        availability.window_count(),
        availability.iter().count()
    );

    let days: Vec<DayOfWeek> = availability
        .iter()
        .filter(|(_, windows)| any_windows_overlap(windows))
        .map(|(day, _)| day)
        .collect();

    if !days.is_empty() {
        warn!("Overlapping availability windows on {:?}", days);
    }

    days
}
