use std::collections::BTreeMap;
use seatwise_shared::{Leg, SeatAssignment};
use tracing::debug;
use crate::seat::{PassengerSlot, Seat, SeatView};

/// Result of a successful seat toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Assigned { passenger_index: usize },
    Released { passenger_index: usize },
}

/// Seat <-> passenger assignment for one leg of a trip.
///
/// The mapping is kept in both directions: `by_seat` (seat -> passenger) and
/// `by_passenger` (passenger -> seat). They are only ever written together,
/// so the mapping stays injective and never references a seat that is not
/// available.
#[derive(Debug, Clone)]
pub struct SeatAllocator {
    leg: Leg,
    seats: Vec<Seat>,
    by_seat: BTreeMap<u32, usize>,
    by_passenger: Vec<Option<u32>>,
    // Seat released by the previous toggle, so an immediate re-tap undoes it
    last_released: Option<(u32, usize)>,
}

impl SeatAllocator {
    /// Build the allocator and run the initial auto-assignment.
    ///
    /// `carried` holds seats a passenger already picked on a previous pass,
    /// indexed by passenger slot. Missing entries mean "no carried seat".
    pub fn new(
        leg: Leg,
        seats: Vec<Seat>,
        total_passengers: usize,
        carried: &[Option<u32>],
    ) -> Result<Self, AllocationError> {
        if total_passengers == 0 {
            return Err(AllocationError::NoPassengers);
        }

        let mut seats = seats;
        seats.sort_by_key(|s| s.number);
        seats.dedup_by_key(|s| s.number);

        let mut allocator = Self {
            leg,
            seats,
            by_seat: BTreeMap::new(),
            by_passenger: vec![None; total_passengers],
            last_released: None,
        };
        allocator.auto_fill(carried);

        debug!(
            "Seat allocator ready for {} leg: {}/{} passengers seated",
            leg,
            allocator.assigned_count(),
            total_passengers
        );

        Ok(allocator)
    }

    /// Fill passengers in order, starting just after the last booked seat.
    fn auto_fill(&mut self, carried: &[Option<u32>]) {
        let last_booked = self.seats.iter()
            .filter(|s| s.status == crate::SeatStatus::Booked)
            .map(|s| s.number)
            .max()
            .unwrap_or(0);

        let mut next = last_booked + 1;
        let total_seats = self.total_seats();

        for passenger in 0..self.by_passenger.len() {
            // A carried seat stands if nobody earlier claimed it and it is still sellable
            if let Some(seat_number) = carried.get(passenger).copied().flatten() {
                if !self.by_seat.contains_key(&seat_number) && self.is_available(seat_number) {
                    self.assign(seat_number, passenger);
                    continue;
                }
            }

            while next <= total_seats {
                let candidate = next;
                next += 1;

                if self.is_available(candidate) && !self.by_seat.contains_key(&candidate) {
                    self.assign(candidate, passenger);
                    break;
                }
            }
        }
    }

    /// Select or deselect a seat.
    ///
    /// A seat already holding a passenger is released. A free seat goes to the
    /// lowest-indexed passenger without a seat, except that re-tapping the seat
    /// released by the previous toggle hands it back to the same passenger.
    pub fn toggle_seat(&mut self, seat_number: u32) -> Result<ToggleOutcome, AllocationError> {
        let seat = self.seat(seat_number)
            .ok_or(AllocationError::UnknownSeat(seat_number))?;

        if !seat.status.is_available() {
            return Err(AllocationError::SeatUnavailable(seat_number));
        }

        let last_released = self.last_released.take();

        if let Some(passenger_index) = self.by_seat.remove(&seat_number) {
            self.by_passenger[passenger_index] = None;
            self.last_released = Some((seat_number, passenger_index));
            debug!("Seat {} released from passenger {}", seat_number, passenger_index);
            return Ok(ToggleOutcome::Released { passenger_index });
        }

        let passenger_index = match last_released {
            Some((seat, passenger)) if seat == seat_number => passenger,
            _ => self.by_passenger.iter()
                .position(Option::is_none)
                .ok_or(AllocationError::AllPassengersAssigned)?,
        };

        self.assign(seat_number, passenger_index);
        debug!("Seat {} assigned to passenger {}", seat_number, passenger_index);

        Ok(ToggleOutcome::Assigned { passenger_index })
    }

    pub fn is_complete(&self) -> bool {
        self.by_seat.len() == self.by_passenger.len()
    }

    /// Final mapping ordered by passenger index. Only valid once every passenger has a seat.
    pub fn export_assignment(&self) -> Result<Vec<SeatAssignment>, AllocationError> {
        if !self.is_complete() {
            return Err(AllocationError::IncompleteAssignment {
                assigned: self.assigned_count(),
                total: self.total_passengers(),
            });
        }

        Ok(self.by_passenger.iter()
            .enumerate()
            .filter_map(|(passenger_index, seat)| {
                seat.map(|seat_number| SeatAssignment {
                    passenger_index,
                    seat_number,
                    leg: self.leg,
                })
            })
            .collect())
    }

    pub fn leg(&self) -> Leg {
        self.leg
    }

    pub fn total_passengers(&self) -> usize {
        self.by_passenger.len()
    }

    pub fn total_seats(&self) -> u32 {
        self.seats.last().map(|s| s.number).unwrap_or(0)
    }

    pub fn assigned_count(&self) -> usize {
        self.by_seat.len()
    }

    pub fn seat_of(&self, passenger_index: usize) -> Option<u32> {
        self.by_passenger.get(passenger_index).copied().flatten()
    }

    pub fn passenger_at(&self, seat_number: u32) -> Option<usize> {
        self.by_seat.get(&seat_number).copied()
    }

    /// Passengers still waiting for a seat
    pub fn pending_passengers(&self) -> Vec<usize> {
        self.by_passenger.iter()
            .enumerate()
            .filter(|(_, seat)| seat.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn passenger_slots(&self) -> Vec<PassengerSlot> {
        self.by_passenger.iter()
            .enumerate()
            .map(|(index, seat_number)| PassengerSlot { index, seat_number: *seat_number })
            .collect()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat_views(&self) -> Vec<SeatView> {
        self.seats.iter()
            .map(|s| SeatView {
                number: s.number,
                status: s.status,
                assigned_passenger: self.passenger_at(s.number),
            })
            .collect()
    }

    fn seat(&self, seat_number: u32) -> Option<&Seat> {
        self.seats.binary_search_by_key(&seat_number, |s| s.number)
            .ok()
            .map(|i| &self.seats[i])
    }

    fn is_available(&self, seat_number: u32) -> bool {
        self.seat(seat_number).map(|s| s.status.is_available()).unwrap_or(false)
    }

    fn assign(&mut self, seat_number: u32, passenger_index: usize) {
        self.by_seat.insert(seat_number, passenger_index);
        self.by_passenger[passenger_index] = Some(seat_number);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("Seat {0} does not exist")]
    UnknownSeat(u32),

    #[error("Seat {0} is not available")]
    SeatUnavailable(u32),

    #[error("All passengers already have seats; deselect one first")]
    AllPassengersAssigned,

    #[error("Please select seats for all passengers ({assigned}/{total})")]
    IncompleteAssignment {
        assigned: usize,
        total: usize,
    },

    #[error("A seat selection needs at least one passenger")]
    NoPassengers,
}
