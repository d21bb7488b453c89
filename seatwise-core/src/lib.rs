pub mod seat;
pub mod layout;
pub mod allocator;
pub mod availability;
pub mod submission;

pub use seat::{Seat, SeatStatus, SeatView, PassengerSlot};
pub use layout::{organize_into_rows, SeatLayout, SeatRow, LayoutError};
pub use allocator::{SeatAllocator, ToggleOutcome, AllocationError};
pub use availability::{load_allocator, MAX_SEATS, RawSeat, RawSeatAvailability, SeatAvailability, SeatAvailabilityProvider, AvailabilityError};
pub use submission::{BookingSubmission, SubmissionError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Availability(#[from] AvailabilityError),
}

pub type CoreResult<T> = Result<T, CoreError>;
