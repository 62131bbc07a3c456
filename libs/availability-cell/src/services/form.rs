use std::collections::BTreeMap;

use tracing::debug;

use shared_config::{AppConfig, DEFAULT_MAX_WINDOWS_PER_DAY};
use shared_utils::form::{join_path, FormError, FormErrorReason, FormTree};

use crate::error::AvailabilityError;
use crate::models::{DayOfWeek, Meridiem, Time, TimeWindow, WeeklyAvailability};

const HOUR_RANGE: (i64, i64) = (1, 12);
const MINUTE_RANGE: (i64, i64) = (0, 59);

/// Schema for the availability settings form.
///
/// Expected fields are `<Day>.<index>.<start|end>.<hour|minute|meridiem>`.
/// A day submitted as an empty value (`Sunday=`) has no windows.
#[derive(Debug, Clone)]
pub struct AvailabilityDecoder {
    max_windows_per_day: usize,
}

impl Default for AvailabilityDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WINDOWS_PER_DAY)
    }
}

impl AvailabilityDecoder {
    pub fn new(max_windows_per_day: usize) -> Self {
        Self { max_windows_per_day }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.max_windows_per_day)
    }

    pub fn decode_pairs<I, K, V>(&self, pairs: I) -> Result<WeeklyAvailability, AvailabilityError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let tree = FormTree::from_pairs(pairs)?;
        self.decode(&tree)
    }

    pub fn decode(&self, tree: &FormTree) -> Result<WeeklyAvailability, AvailabilityError> {
        let days = tree.expect_map("")?;
        let mut availability = WeeklyAvailability::new();
        // Day names parse case-insensitively, so `Monday` and `monday` are
        // distinct form keys naming the same day.
        let mut seen: BTreeMap<DayOfWeek, &str> = BTreeMap::new();

        for (key, node) in days {
            let day: DayOfWeek = key
                .parse()
                .map_err(|raw| FormError::new(key.as_str(), FormErrorReason::UnknownVariant(raw)))?;
            if let Some(first) = seen.insert(day, key.as_str()) {
                return Err(FormError::new(key.as_str(), FormErrorReason::Duplicate(first.to_string())).into());
            }
            let windows = self.decode_day(node, key)?;
            availability.set_day(day, windows);
        }

        debug!(
            "Decoded availability form: {} days, {} windows",
            availability.iter().count(),
            availability.window_count()
        );
        Ok(availability)
    }

    /// Range and size checks for availability that arrived already typed
    /// (e.g. as JSON) rather than through [`AvailabilityDecoder::decode`].
    pub fn check(&self, availability: &WeeklyAvailability) -> Result<(), AvailabilityError> {
        for (day, windows) in availability.iter() {
            let day_path = day.as_str();
            self.check_window_count(windows.len(), day_path)?;

            for (index, window) in windows.iter().enumerate() {
                let window_path = join_path(day_path, index);
                check_time(&window.start, &join_path(&window_path, "start"))?;
                check_time(&window.end, &join_path(&window_path, "end"))?;
            }
        }
        Ok(())
    }

    fn decode_day(&self, node: &FormTree, path: &str) -> Result<Vec<TimeWindow>, FormError> {
        match node {
            FormTree::Value(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            FormTree::List(items) => {
                self.check_window_count(items.len(), path)?;
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| decode_window(item, &join_path(path, index)))
                    .collect()
            }
            other => Err(FormError::new(
                path,
                FormErrorReason::UnexpectedShape {
                    expected: "a list",
                    found: other.kind(),
                },
            )),
        }
    }

    fn check_window_count(&self, count: usize, path: &str) -> Result<(), FormError> {
        if count > self.max_windows_per_day {
            return Err(FormError::new(
                path,
                FormErrorReason::TooMany {
                    max: self.max_windows_per_day,
                },
            ));
        }
        Ok(())
    }
}

/// Decodes with the default per-day window limit.
pub fn decode_weekly_availability(tree: &FormTree) -> Result<WeeklyAvailability, AvailabilityError> {
    AvailabilityDecoder::default().decode(tree)
}

pub fn decode_weekly_availability_pairs<I, K, V>(pairs: I) -> Result<WeeklyAvailability, AvailabilityError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    AvailabilityDecoder::default().decode_pairs(pairs)
}

fn decode_window(node: &FormTree, path: &str) -> Result<TimeWindow, FormError> {
    node.expect_map(path)?;
    let start = decode_time(node.require("start", path)?, &join_path(path, "start"))?;
    let end = decode_time(node.require("end", path)?, &join_path(path, "end"))?;
    Ok(TimeWindow::new(start, end))
}

fn decode_time(node: &FormTree, path: &str) -> Result<Time, FormError> {
    node.expect_map(path)?;

    let hour = node.int_field("hour", path, HOUR_RANGE.0, HOUR_RANGE.1)?;
    let minute = node.int_field("minute", path, MINUTE_RANGE.0, MINUTE_RANGE.1)?;

    let meridiem_path = join_path(path, "meridiem");
    let raw = node.require("meridiem", path)?.expect_value(&meridiem_path)?;
    let meridiem: Meridiem = raw
        .parse()
        .map_err(|raw| FormError::new(meridiem_path.as_str(), FormErrorReason::UnknownVariant(raw)))?;

    // Ranges were checked above, so both fit in a u8.
    Ok(Time::new(hour as u8, minute as u8, meridiem))
}

fn check_time(time: &Time, path: &str) -> Result<(), FormError> {
    check_range(i64::from(time.hour), &join_path(path, "hour"), HOUR_RANGE)?;
    check_range(i64::from(time.minute), &join_path(path, "minute"), MINUTE_RANGE)
}

fn check_range(value: i64, path: &str, (min, max): (i64, i64)) -> Result<(), FormError> {
    if value < min || value > max {
        return Err(FormError::new(path, FormErrorReason::OutOfRange { min, max }));
    }
    Ok(())
}
