use tracing::{debug, instrument};

use shared_config::AppConfig;

use crate::error::AvailabilityError;
use crate::models::{OverlapReport, WeeklyAvailability};
use crate::services::form::AvailabilityDecoder;

/// Entry point for the availability settings form handler.
pub struct AvailabilityService {
    decoder: AvailabilityDecoder,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            decoder: AvailabilityDecoder::from_config(config),
        }
    }

    /// Decode raw form fields and report days with overlapping windows.
    #[instrument(skip(self, pairs), fields(field_count = pairs.len()))]
    pub fn validate_form(&self, pairs: Vec<(String, String)>) -> Result<OverlapReport, AvailabilityError> {
        let availability = self.decoder.decode_pairs(pairs).map_err(|e| {
            debug!("Rejected availability form at {}: {}", e.field(), e);
            e
        })?;

        Ok(OverlapReport::from_availability(&availability))
    }

    /// Same check for a schedule that arrived already typed.
    pub fn validate(&self, availability: &WeeklyAvailability) -> Result<OverlapReport, AvailabilityError> {
        self.decoder.check(availability)?;
        Ok(OverlapReport::from_availability(availability))
    }
}
