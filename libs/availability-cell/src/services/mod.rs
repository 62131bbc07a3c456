pub mod availability;
pub mod form;
pub mod overlap;

pub use availability::AvailabilityService;
pub use form::{decode_weekly_availability, decode_weekly_availability_pairs, AvailabilityDecoder};
pub use overlap::{any_windows_overlap, find_days_with_overlap, time_to_minutes, windows_overlap};
