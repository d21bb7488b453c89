use std::sync::Arc;
use seatwise_core::{BookingSubmission, SeatAvailabilityProvider};
use seatwise_store::app_config::SeatingRules;
use crate::sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub availability: Arc<dyn SeatAvailabilityProvider>,
    pub submission: Arc<dyn BookingSubmission>,
    pub sessions: Arc<SessionStore>,
    pub seating: SeatingRules,
}

/// Longest idle time a selection may be configured to survive
const MAX_SELECTION_TTL_SECONDS: i64 = 24 * 60 * 60;

impl AppState {
    pub fn selection_ttl(&self) -> chrono::Duration {
        ttl_from_seconds(self.seating.selection_ttl_seconds)
    }
}

fn ttl_from_seconds(seconds: u64) -> chrono::Duration {
    let seconds = i64::try_from(seconds)
        .unwrap_or(i64::MAX)
        .min(MAX_SELECTION_TTL_SECONDS);
    chrono::Duration::seconds(seconds)
}
