use serde::{Deserialize, Serialize};
use std::fmt;

/// One directional half of a trip. Seats are chosen independently per leg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Leg {
    Outbound,
    Return,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Outbound => write!(f, "OUTBOUND"),
            Leg::Return => write!(f, "RETURN"),
        }
    }
}

/// Final seat for one passenger slot, as handed to booking submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatAssignment {
    pub passenger_index: usize,
    pub seat_number: u32,
    pub leg: Leg,
}
