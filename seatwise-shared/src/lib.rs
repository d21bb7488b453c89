pub mod models;

pub use models::assignment::{Leg, SeatAssignment};
pub use models::events::SeatSelectionCompletedEvent;
