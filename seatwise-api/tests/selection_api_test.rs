use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use seatwise_api::{app, sessions::SessionStore, AppState};
use seatwise_core::{BookingSubmission, RawSeatAvailability, SubmissionError};
use seatwise_shared::{Leg, SeatSelectionCompletedEvent};
use seatwise_store::app_config::SeatingRules;
use seatwise_store::InMemorySeatAvailability;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct RecordingSubmission {
    submitted: Mutex<Vec<SeatSelectionCompletedEvent>>,
    fail: AtomicBool,
}

#[async_trait]
impl BookingSubmission for RecordingSubmission {
    async fn submit(&self, selection: &SeatSelectionCompletedEvent) -> Result<(), SubmissionError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SubmissionError::Rejected("broker unavailable".to_string()));
        }
        self.submitted.lock().unwrap().push(selection.clone());
        Ok(())
    }
}

/// Holds every hand-off until released, then rejects it
#[derive(Default)]
struct GatedSubmission {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl BookingSubmission for GatedSubmission {
    async fn submit(&self, _selection: &SeatSelectionCompletedEvent) -> Result<(), SubmissionError> {
        self.entered.notify_one();
        self.release.notified().await;
        Err(SubmissionError::Rejected("broker timed out".to_string()))
    }
}

struct TestApp {
    router: Router,
    submission: Arc<RecordingSubmission>,
    departure_id: Uuid,
}

async fn test_app() -> TestApp {
    let departure_id = Uuid::new_v4();
    let submission = Arc::new(RecordingSubmission::default());
    let router = test_router(departure_id, submission.clone()).await;
    TestApp { router, submission, departure_id }
}

/// Seats 1..=10, 1-3 booked, 7 locked, 2+3 layout
async fn test_router(departure_id: Uuid, submission: Arc<dyn BookingSubmission>) -> Router {
    let availability = InMemorySeatAvailability::new();
    let seat_map: RawSeatAvailability = serde_json::from_value(json!({
        "totalSeats": 10,
        "seats": [
            { "seatNumber": 1, "status": "booked" },
            { "seatNumber": 2, "status": "BOOKED" },
            { "seatNumber": 3, "status": "Booked" },
            { "seatNumber": 7, "status": "LOCKED" }
        ],
        "busSeatLayout": [2, 3]
    })).unwrap();
    availability.insert(departure_id, seat_map).await;

    let state = AppState {
        availability: Arc::new(availability),
        submission,
        sessions: Arc::new(SessionStore::new()),
        seating: SeatingRules::default(),
    };

    app(state)
}

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };

    (status, value)
}

async fn open_selection(app: &TestApp, passengers: usize) -> Value {
    let (status, body) = call(&app.router, "POST", "/v1/selections", Some(json!({
        "departure_id": app.departure_id,
        "leg": "OUTBOUND",
        "passenger_count": passengers
    }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

fn seat_of(selection: &Value, passenger: usize) -> Option<u64> {
    selection["passengers"][passenger]["seat_number"].as_u64()
}

#[tokio::test]
async fn test_open_selection_auto_assigns_after_booked_block() {
    let app = test_app().await;
    let selection = open_selection(&app, 2).await;

    assert_eq!(seat_of(&selection, 0), Some(4));
    assert_eq!(seat_of(&selection, 1), Some(5));
    assert_eq!(selection["assigned"], 2);
    assert_eq!(selection["total"], 2);
    assert_eq!(selection["complete"], true);
    assert_eq!(selection["leg"], "OUTBOUND");

    // 2+3 layout over 10 seats
    let rows = selection["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["left"].as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["right"].as_array().unwrap().len(), 3);
    assert_eq!(rows[0]["right"][1]["number"], 4);
    assert_eq!(rows[0]["right"][1]["assigned_passenger"], 0);
    assert_eq!(rows[1]["left"][1]["status"], "LOCKED");
}

#[tokio::test]
async fn test_toggle_flow() {
    let app = test_app().await;
    let selection = open_selection(&app, 2).await;
    let id = selection["id"].as_str().unwrap();
    let toggle = |seat: u32| format!("/v1/selections/{}/seats/{}/toggle", id, seat);

    // Booked, locked and unknown seats are ignored
    for seat in [2, 7, 42] {
        let (status, body) = call(&app.router, "POST", &toggle(seat), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "IGNORED");
        assert_eq!(seat_of(&body["selection"], 0), Some(4));
    }

    // Everyone seated: a free seat is rejected
    let (status, body) = call(&app.router, "POST", &toggle(9), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "All passengers already have seats; deselect one first");

    let (status, body) = call(&app.router, "POST", &toggle(4), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "RELEASED");
    assert_eq!(body["passenger_index"], 0);
    assert_eq!(body["selection"]["complete"], false);

    let (_, body) = call(&app.router, "POST", &toggle(9), None).await;
    assert_eq!(body["outcome"], "ASSIGNED");
    assert_eq!(body["passenger_index"], 0);

    let (status, selection) = call(&app.router, "GET", &format!("/v1/selections/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seat_of(&selection, 0), Some(9));
    assert_eq!(seat_of(&selection, 1), Some(5));
}

#[tokio::test]
async fn test_complete_requires_every_passenger_seated() {
    let app = test_app().await;
    let selection = open_selection(&app, 2).await;
    let id = selection["id"].as_str().unwrap();

    call(&app.router, "POST", &format!("/v1/selections/{}/seats/5/toggle", id), None).await;

    let (status, body) = call(&app.router, "POST", &format!("/v1/selections/{}/complete", id), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Please select seats for all passengers (1/2)");
    assert!(app.submission.submitted.lock().unwrap().is_empty());

    // Still on the screen
    call(&app.router, "POST", &format!("/v1/selections/{}/seats/10/toggle", id), None).await;

    let (status, body) = call(&app.router, "POST", &format!("/v1/selections/{}/complete", id), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["assignments"], json!([
        { "passenger_index": 0, "seat_number": 4, "leg": "OUTBOUND" },
        { "passenger_index": 1, "seat_number": 10, "leg": "OUTBOUND" }
    ]));

    let submitted = app.submission.submitted.lock().unwrap().clone();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].departure_id, app.departure_id);
    assert_eq!(submitted[0].leg, Leg::Outbound);

    // Consumed by the booking step
    let (status, _) = call(&app.router, "GET", &format!("/v1/selections/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_submission_keeps_selection() {
    let app = test_app().await;
    let selection = open_selection(&app, 1).await;
    let id = selection["id"].as_str().unwrap();

    app.submission.fail.store(true, Ordering::SeqCst);
    let (status, _) = call(&app.router, "POST", &format!("/v1/selections/{}/complete", id), None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    app.submission.fail.store(false, Ordering::SeqCst);
    let (status, body) = call(&app.router, "POST", &format!("/v1/selections/{}/complete", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assignments"][0]["seat_number"], 4);
}

#[tokio::test]
async fn test_selection_is_frozen_while_submitting() {
    let departure_id = Uuid::new_v4();
    let submission = Arc::new(GatedSubmission::default());
    let router = test_router(departure_id, submission.clone()).await;

    let (_, selection) = call(&router, "POST", "/v1/selections", Some(json!({
        "departure_id": departure_id,
        "leg": "OUTBOUND",
        "passenger_count": 1
    }))).await;
    let uri = format!("/v1/selections/{}", selection["id"].as_str().unwrap());

    let completing = {
        let router = router.clone();
        let uri = format!("{}/complete", uri);
        tokio::spawn(async move { call(&router, "POST", &uri, None).await })
    };
    submission.entered.notified().await;

    let (status, _) = call(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = call(&router, "POST", &format!("{}/seats/4/toggle", uri), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = call(&router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = call(&router, "POST", &format!("{}/complete", uri), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    submission.release.notify_one();
    let (status, _) = completing.await.unwrap();
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    // Editable again after the failed hand-off, and abandoning it sticks
    let (status, selection) = call(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seat_of(&selection, 0), Some(4));

    let (status, _) = call(&router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_seat_map_is_bad_gateway() {
    let departure_id = Uuid::new_v4();
    let availability = InMemorySeatAvailability::new();
    let seat_map: RawSeatAvailability = serde_json::from_value(json!({
        "totalSeats": 4_000_000_000u32,
        "busSeatLayout": [18446744073709551615u64, 1]
    })).unwrap();
    availability.insert(departure_id, seat_map).await;

    let state = AppState {
        availability: Arc::new(availability),
        submission: Arc::new(RecordingSubmission::default()),
        sessions: Arc::new(SessionStore::new()),
        seating: SeatingRules::default(),
    };
    let router = app(state);

    let (status, body) = call(&router, "POST", "/v1/selections", Some(json!({
        "departure_id": departure_id,
        "leg": "OUTBOUND",
        "passenger_count": 1
    }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY, "{}", body);
}

#[tokio::test]
async fn test_carried_seats_and_pending_passengers() {
    let app = test_app().await;

    let (status, selection) = call(&app.router, "POST", "/v1/selections", Some(json!({
        "departure_id": app.departure_id,
        "leg": "RETURN",
        "passenger_count": 6,
        "carried_seats": [null, 10]
    }))).await;
    assert_eq!(status, StatusCode::CREATED);

    // Seats after the booked block: 4, 5, 6, 8, 9 (7 locked); 10 carried by passenger 1
    assert_eq!(seat_of(&selection, 0), Some(4));
    assert_eq!(seat_of(&selection, 1), Some(10));
    assert_eq!(seat_of(&selection, 2), Some(5));
    assert_eq!(seat_of(&selection, 5), Some(9));
    assert_eq!(selection["complete"], true);

    let (_, selection) = call(&app.router, "POST", "/v1/selections", Some(json!({
        "departure_id": app.departure_id,
        "leg": "RETURN",
        "passenger_count": 7
    }))).await;
    assert_eq!(selection["assigned"], 6);
    assert_eq!(seat_of(&selection, 6), None);
    assert_eq!(selection["complete"], false);
}

#[tokio::test]
async fn test_open_selection_rejections() {
    let app = test_app().await;

    let (status, _) = call(&app.router, "POST", "/v1/selections", Some(json!({
        "departure_id": Uuid::new_v4(),
        "leg": "OUTBOUND",
        "passenger_count": 1
    }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for passengers in [0, 10] {
        let (status, _) = call(&app.router, "POST", "/v1/selections", Some(json!({
            "departure_id": app.departure_id,
            "leg": "OUTBOUND",
            "passenger_count": passengers
        }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_abandon_selection() {
    let app = test_app().await;
    let selection = open_selection(&app, 1).await;
    let uri = format!("/v1/selections/{}", selection["id"].as_str().unwrap());

    let (status, _) = call(&app.router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app.router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let response = app.router.clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
