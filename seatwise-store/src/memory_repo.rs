use async_trait::async_trait;
use seatwise_core::{AvailabilityError, RawSeatAvailability, SeatAvailability, SeatAvailabilityProvider};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// In-memory seat maps, for local development and tests
pub struct InMemorySeatAvailability {
    seat_maps: RwLock<HashMap<Uuid, RawSeatAvailability>>,
}

impl InMemorySeatAvailability {
    pub fn new() -> Self {
        Self {
            seat_maps: RwLock::new(HashMap::new()),
        }
    }

    /// Load seat maps from a JSON object keyed by departure id
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AvailabilityError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await
            .map_err(|e| AvailabilityError::Unreachable(format!("{}: {}", path.display(), e)))?;
        let seat_maps: HashMap<Uuid, RawSeatAvailability> = serde_json::from_str(&contents)
            .map_err(|e| AvailabilityError::Malformed(e.to_string()))?;

        info!("Loaded {} seat maps from {}", seat_maps.len(), path.display());
        Ok(Self {
            seat_maps: RwLock::new(seat_maps),
        })
    }

    pub async fn insert(&self, departure_id: Uuid, seat_map: RawSeatAvailability) {
        self.seat_maps.write().await.insert(departure_id, seat_map);
    }

    pub async fn remove(&self, departure_id: &Uuid) -> Option<RawSeatAvailability> {
        self.seat_maps.write().await.remove(departure_id)
    }
}

impl Default for InMemorySeatAvailability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeatAvailabilityProvider for InMemorySeatAvailability {
    async fn fetch_seat_availability(&self, departure_id: Uuid) -> Result<SeatAvailability, AvailabilityError> {
        self.seat_maps.read().await
            .get(&departure_id)
            .ok_or(AvailabilityError::NotFound(departure_id))?
            .normalize()
    }
}
