use async_trait::async_trait;
use seatwise_shared::SeatSelectionCompletedEvent;

/// Downstream hand-off of a finished seat selection to the booking step
#[async_trait]
pub trait BookingSubmission: Send + Sync {
    async fn submit(&self, selection: &SeatSelectionCompletedEvent) -> Result<(), SubmissionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Failed to encode seat selection: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Booking submission rejected: {0}")]
    Rejected(String),
}
