use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use seatwise_shared::Leg;
use tracing::{info, warn};
use uuid::Uuid;
use crate::allocator::SeatAllocator;
use crate::layout::SeatLayout;
use crate::seat::{Seat, SeatStatus};
use crate::CoreResult;

// ============================================================================
// Provider wire shape
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeatAvailability {
    pub total_seats: u32,
    #[serde(default)]
    pub seats: Vec<RawSeat>,
    #[serde(default)]
    pub bus_seat_layout: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeat {
    #[serde(default)]
    pub seat_number: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Largest seat map accepted from a provider. Anything bigger is treated as a
/// malformed response rather than allocated.
pub const MAX_SEATS: u32 = 1_000;

/// Seat map for one departure, normalized at the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAvailability {
    pub total_seats: u32,
    pub seats: Vec<Seat>,
    /// `None` when the provider sent no layout or a malformed one
    pub layout: Option<SeatLayout>,
}

impl RawSeatAvailability {
    /// One seat per number `1..=total_seats`. Entries without a number take
    /// their position; entries outside the range are dropped. Seats the
    /// provider did not mention are available.
    pub fn normalize(&self) -> Result<SeatAvailability, AvailabilityError> {
        if self.total_seats > MAX_SEATS {
            return Err(AvailabilityError::Malformed(format!(
                "totalSeats {} exceeds {}",
                self.total_seats, MAX_SEATS
            )));
        }

        let mut statuses = vec![SeatStatus::Available; self.total_seats as usize];

        for (position, raw) in self.seats.iter().enumerate() {
            let number = raw.seat_number.unwrap_or(position as u32 + 1);
            if number == 0 || number > self.total_seats {
                warn!("Ignoring seat {} outside 1..={}", number, self.total_seats);
                continue;
            }
            statuses[(number - 1) as usize] = SeatStatus::normalize(raw.status.as_deref());
        }

        let layout = self.bus_seat_layout.as_ref().and_then(|value| {
            SeatLayout::from_json(value)
                .map_err(|e| warn!("Ignoring seat layout {}: {}", value, e))
                .ok()
        });

        Ok(SeatAvailability {
            total_seats: self.total_seats,
            seats: statuses.into_iter()
                .enumerate()
                .map(|(i, status)| Seat::new(i as u32 + 1, status))
                .collect(),
            layout,
        })
    }
}

// ============================================================================
// Collaborator trait
// ============================================================================

/// Upstream source of seat statuses for a departure (one leg of a trip)
#[async_trait]
pub trait SeatAvailabilityProvider: Send + Sync {
    async fn fetch_seat_availability(
        &self,
        departure_id: Uuid,
    ) -> Result<SeatAvailability, AvailabilityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Departure not found: {0}")]
    NotFound(Uuid),

    #[error("Seat availability provider unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed seat availability response: {0}")]
    Malformed(String),
}

/// Fetch the seat map for a departure and run the initial auto-assignment.
/// The allocator only exists once the fetch has resolved. `default_layout`
/// applies when the provider has no layout for the vehicle.
pub async fn load_allocator(
    provider: &dyn SeatAvailabilityProvider,
    departure_id: Uuid,
    leg: Leg,
    total_passengers: usize,
    carried: &[Option<u32>],
    default_layout: SeatLayout,
) -> CoreResult<(SeatAllocator, SeatLayout)> {
    let availability = provider.fetch_seat_availability(departure_id).await?;
    let allocator = SeatAllocator::new(leg, availability.seats, total_passengers, carried)?;

    info!(
        "Loaded {} seats for departure {} ({} leg), {}/{} passengers auto-seated",
        availability.total_seats,
        departure_id,
        leg,
        allocator.assigned_count(),
        total_passengers
    );

    Ok((allocator, availability.layout.unwrap_or(default_layout)))
}
