use uuid::Uuid;
use crate::models::assignment::{Leg, SeatAssignment};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct SeatSelectionCompletedEvent {
    pub selection_id: Uuid,
    pub departure_id: Uuid,
    pub leg: Leg,
    pub assignments: Vec<SeatAssignment>,
    pub timestamp: i64,
}

