use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-reported availability of a seat. Read-only from the client side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    #[default]
    Available,
    Booked,
    /// Temporarily held, e.g. mid-checkout by another user
    Locked,
    /// Not sellable, e.g. reserved for crew
    Blocked,
}

impl SeatStatus {
    /// Normalize a status string coming off the wire.
    /// Case-insensitive; anything unrecognized or missing is `Available`.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("BOOKED") => SeatStatus::Booked,
            Some("LOCKED") => SeatStatus::Locked,
            Some("BLOCKED") => SeatStatus::Blocked,
            _ => SeatStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SeatStatus::Available)
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeatStatus::Available => "AVAILABLE",
            SeatStatus::Booked => "BOOKED",
            SeatStatus::Locked => "LOCKED",
            SeatStatus::Blocked => "BLOCKED",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub number: u32,
    pub status: SeatStatus,
}

impl Seat {
    pub fn new(number: u32, status: SeatStatus) -> Self {
        Self { number, status }
    }
}

/// A seat together with the passenger the allocator put on it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatView {
    pub number: u32,
    pub status: SeatStatus,
    pub assigned_passenger: Option<usize>,
}

/// A passenger slot and the seat found for it by reverse lookup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassengerSlot {
    pub index: usize,
    pub seat_number: Option<u32>,
}
