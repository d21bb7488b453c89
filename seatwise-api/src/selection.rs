use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use seatwise_core::{
    load_allocator, organize_into_rows, AllocationError, PassengerSlot, SeatLayout, SeatRow, SeatView,
    ToggleOutcome,
};
use seatwise_shared::{Leg, SeatAssignment, SeatSelectionCompletedEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use crate::error::AppError;
use crate::sessions::SelectionSession;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSelectionRequest {
    pub departure_id: Uuid,
    pub leg: Leg,
    pub passenger_count: usize,
    /// Seats chosen on a previous pass, by passenger slot
    #[serde(default)]
    pub carried_seats: Vec<Option<u32>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionView {
    pub id: Uuid,
    pub departure_id: Uuid,
    pub leg: Leg,
    pub layout: SeatLayout,
    pub rows: Vec<SeatRow<SeatView>>,
    pub passengers: Vec<PassengerSlot>,
    pub assigned: usize,
    pub total: usize,
    pub complete: bool,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToggleResult {
    Assigned,
    Released,
    Ignored,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub outcome: ToggleResult,
    pub passenger_index: Option<usize>,
    pub selection: SelectionView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteSelectionResponse {
    pub selection_id: Uuid,
    pub departure_id: Uuid,
    pub leg: Leg,
    pub assignments: Vec<SeatAssignment>,
}

fn render(session: &SelectionSession, ttl: chrono::Duration) -> SelectionView {
    let allocator = &session.allocator;

    SelectionView {
        id: session.id,
        departure_id: session.departure_id,
        leg: allocator.leg(),
        layout: session.layout,
        rows: organize_into_rows(&allocator.seat_views(), session.layout),
        passengers: allocator.passenger_slots(),
        assigned: allocator.assigned_count(),
        total: allocator.total_passengers(),
        complete: allocator.is_complete(),
        expires_at: session.expires_at(ttl),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/selections", post(create_selection))
        .route("/v1/selections/{id}", get(get_selection).delete(abandon_selection))
        .route("/v1/selections/{id}/seats/{seat_number}/toggle", post(toggle_seat))
        .route("/v1/selections/{id}/complete", post(complete_selection))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/selections
/// Fetch seat availability for the departure and auto-assign seats
async fn create_selection(
    State(state): State<AppState>,
    Json(req): Json<CreateSelectionRequest>,
) -> Result<(StatusCode, Json<SelectionView>), AppError> {
    if req.passenger_count == 0 || req.passenger_count > state.seating.max_passengers {
        return Err(AppError::ValidationError(format!(
            "passenger_count must be between 1 and {}",
            state.seating.max_passengers
        )));
    }

    let (allocator, layout) = load_allocator(
        state.availability.as_ref(),
        req.departure_id,
        req.leg,
        req.passenger_count,
        &req.carried_seats,
        state.seating.default_layout,
    ).await?;

    let session = SelectionSession::new(req.departure_id, allocator, layout);
    let view = render(&session, state.selection_ttl());
    info!(
        "Seat selection {} opened for departure {} ({} leg)",
        session.id, req.departure_id, req.leg
    );
    state.sessions.insert(session).await;

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /v1/selections/{id}
async fn get_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SelectionView>, AppError> {
    let ttl = state.selection_ttl();
    let view = state.sessions.with_session(&id, |session| render(session, ttl)).await?;
    Ok(Json(view))
}

/// POST /v1/selections/{id}/seats/{seat_number}/toggle
/// Seats that cannot be selected are ignored; the grid already renders them disabled.
async fn toggle_seat(
    State(state): State<AppState>,
    Path((id, seat_number)): Path<(Uuid, u32)>,
) -> Result<Json<ToggleResponse>, AppError> {
    let ttl = state.selection_ttl();

    let (result, selection) = state.sessions.with_session(&id, |session| {
        let result = session.allocator.toggle_seat(seat_number);
        (result, render(session, ttl))
    }).await?;

    let (outcome, passenger_index) = match result {
        Ok(ToggleOutcome::Assigned { passenger_index }) => (ToggleResult::Assigned, Some(passenger_index)),
        Ok(ToggleOutcome::Released { passenger_index }) => (ToggleResult::Released, Some(passenger_index)),
        Err(AllocationError::SeatUnavailable(_)) | Err(AllocationError::UnknownSeat(_)) => {
            debug!("Ignoring toggle of seat {} in selection {}", seat_number, id);
            (ToggleResult::Ignored, None)
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ToggleResponse { outcome, passenger_index, selection }))
}

/// POST /v1/selections/{id}/complete
/// Export the final mapping and hand it to booking submission.
/// The session stays frozen while the hand-off is in flight; it is consumed
/// on success and unfrozen for a retry otherwise.
async fn complete_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompleteSelectionResponse>, AppError> {
    let event = state.sessions.begin_submission(&id, |session| {
        let assignments = session.allocator.export_assignment()?;
        Ok::<_, AppError>(SeatSelectionCompletedEvent {
            selection_id: session.id,
            departure_id: session.departure_id,
            leg: session.allocator.leg(),
            assignments,
            timestamp: Utc::now().timestamp(),
        })
    }).await?;

    let submitted = state.submission.submit(&event).await;
    state.sessions.finish_submission(&id, submitted.is_ok()).await;
    submitted?;

    info!(
        "Seat selection {} completed: {} passengers seated on departure {}",
        id, event.assignments.len(), event.departure_id
    );

    Ok(Json(CompleteSelectionResponse {
        selection_id: event.selection_id,
        departure_id: event.departure_id,
        leg: event.leg,
        assignments: event.assignments,
    }))
}

/// DELETE /v1/selections/{id}
/// The user navigated away; nothing was committed so the session is just dropped.
async fn abandon_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(&id).await?;
    info!("Seat selection {} abandoned", id);
    Ok(StatusCode::NO_CONTENT)
}
