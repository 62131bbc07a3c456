use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meridiem {
    #[serde(rename = "AM", alias = "am")]
    Am,
    #[serde(rename = "PM", alias = "pm")]
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => write!(f, "AM"),
            Meridiem::Pm => write!(f, "PM"),
        }
    }
}

impl FromStr for Meridiem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Meridiem::Am),
            "PM" => Ok(Meridiem::Pm),
            _ => Err(s.to_string()),
        }
    }
}

/// Wall-clock time on a 12-hour clock. `hour` is 1-12, `minute` 0-59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub meridiem: Meridiem,
}

impl Time {
    pub const fn new(hour: u8, minute: u8, meridiem: Meridiem) -> Self {
        Self { hour, minute, meridiem }
    }

    pub const fn am(hour: u8, minute: u8) -> Self {
        Self::new(hour, minute, Meridiem::Am)
    }

    pub const fn pm(hour: u8, minute: u8) -> Self {
        Self::new(hour, minute, Meridiem::Pm)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02} {}", self.hour, self.minute, self.meridiem)
    }
}

/// One contiguous stretch of availability within a day. `start` is not
/// required to precede `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Time,
    pub end: Time,
}

impl TimeWindow {
    pub const fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    pub fn is_reversed(&self) -> bool {
        crate::services::overlap::time_to_minutes(&self.start)
            > crate::services::overlap::time_to_minutes(&self.end)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }

    /// The recurring key that applies to a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| s.to_string())
    }
}

/// Recurring weekly schedule keyed by day. Days may be absent; windows keep
/// the order the user entered them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyAvailability {
    days: BTreeMap<DayOfWeek, Vec<TimeWindow>>,
}

impl WeeklyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, day: DayOfWeek, windows: Vec<TimeWindow>) -> Self {
        self.days.insert(day, windows);
        self
    }

    pub fn set_day(&mut self, day: DayOfWeek, windows: Vec<TimeWindow>) {
        self.days.insert(day, windows);
    }

    pub fn push_window(&mut self, day: DayOfWeek, window: TimeWindow) {
        self.days.entry(day).or_default().push(window);
    }

    /// Windows for `day`; empty when the day is absent.
    pub fn windows(&self, day: DayOfWeek) -> &[TimeWindow] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Present days in calendar order, Sunday first.
    pub fn iter(&self) -> impl Iterator<Item = (DayOfWeek, &[TimeWindow])> {
        self.days.iter().map(|(day, windows)| (*day, windows.as_slice()))
    }

    pub fn window_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.window_count() == 0
    }
}

impl FromIterator<(DayOfWeek, Vec<TimeWindow>)> for WeeklyAvailability {
    fn from_iter<I: IntoIterator<Item = (DayOfWeek, Vec<TimeWindow>)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapReport {
    pub valid: bool,
    pub days_with_overlap: Vec<DayOfWeek>,
}

impl OverlapReport {
    pub fn from_availability(availability: &WeeklyAvailability) -> Self {
        let days_with_overlap = crate::services::overlap::find_days_with_overlap(availability);
        Self {
            valid: days_with_overlap.is_empty(),
            days_with_overlap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_names_parse_case_insensitively() {
        assert_eq!("monday".parse::<DayOfWeek>(), Ok(DayOfWeek::Monday));
        assert_eq!(" SATURDAY ".parse::<DayOfWeek>(), Ok(DayOfWeek::Saturday));
        assert!("Mon".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn day_of_date() {
        // 2024-07-04 was a Thursday.
        let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        assert_eq!(DayOfWeek::of(date), DayOfWeek::Thursday);
    }

    #[test]
    fn meridiem_parse_and_display() {
        assert_eq!("pm".parse::<Meridiem>(), Ok(Meridiem::Pm));
        assert!("noon".parse::<Meridiem>().is_err());
        assert_eq!(Time::pm(5, 5).to_string(), "5:05 PM");
    }

    #[test]
    fn absent_and_empty_days_have_no_windows() {
        let availability = WeeklyAvailability::new().with_day(DayOfWeek::Monday, vec![]);
        assert!(availability.windows(DayOfWeek::Monday).is_empty());
        assert!(availability.windows(DayOfWeek::Friday).is_empty());
        assert!(availability.is_empty());
    }

    #[test]
    fn serializes_as_day_keyed_object() {
        let availability = WeeklyAvailability::new().with_day(
            DayOfWeek::Tuesday,
            vec![TimeWindow::new(Time::am(9, 0), Time::pm(5, 0))],
        );

        let json = serde_json::to_value(&availability).unwrap();
        assert_eq!(json["Tuesday"][0]["start"]["meridiem"], "AM");
        assert_eq!(json["Tuesday"][0]["end"]["hour"], 5);

        let back: WeeklyAvailability = serde_json::from_value(json).unwrap();
        assert_eq!(back, availability);
    }

    #[test]
    fn reversed_window_detection() {
        assert!(TimeWindow::new(Time::pm(5, 0), Time::am(9, 0)).is_reversed());
        assert!(!TimeWindow::new(Time::am(9, 0), Time::am(9, 0)).is_reversed());
    }
}
