use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult};
use seatwise_core::{AvailabilityError, RawSeat, RawSeatAvailability, SeatAvailability, SeatAvailabilityProvider};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Seat maps published by the booking backend, one set of keys per departure:
///
/// - `departure:{id}:total_seats` integer
/// - `departure:{id}:seats` hash of seat number -> status
/// - `departure:{id}:layout` `"left,right"`, optional
#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Raw value; the caller decides whether it is a valid seat count
    pub async fn get_total_seats(&self, departure_id: &str) -> RedisResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("departure:{}:total_seats", departure_id);
        conn.get(key).await
    }

    pub async fn get_seat_statuses(&self, departure_id: &str) -> RedisResult<HashMap<String, String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("departure:{}:seats", departure_id);
        conn.hgetall(key).await
    }

    pub async fn get_seat_layout(&self, departure_id: &str) -> RedisResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("departure:{}:layout", departure_id);
        conn.get(key).await
    }
}

fn parse_total_seats(value: &str) -> Result<u32, AvailabilityError> {
    value.trim().parse::<u32>()
        .map_err(|_| AvailabilityError::Malformed(format!("total_seats {:?}", value)))
}

/// Rebuild the provider payload from the Redis representation.
fn seat_map_from_redis(
    total_seats: u32,
    statuses: HashMap<String, String>,
    layout: Option<String>,
) -> Result<RawSeatAvailability, AvailabilityError> {
    let mut seats = Vec::with_capacity(statuses.len());
    for (number, status) in statuses {
        let seat_number = number.trim().parse::<u32>()
            .map_err(|_| AvailabilityError::Malformed(format!("seat number {:?}", number)))?;
        seats.push(RawSeat { seat_number: Some(seat_number), status: Some(status) });
    }
    seats.sort_by_key(|s| s.seat_number);

    // Unparseable parts become JSON strings, which the boundary treats as a malformed layout
    let bus_seat_layout = layout.map(|l| {
        serde_json::Value::Array(l.split(',')
            .map(|part| part.trim().parse::<u64>()
                .map(serde_json::Value::from)
                .unwrap_or_else(|_| serde_json::Value::from(part.trim())))
            .collect())
    });

    Ok(RawSeatAvailability { total_seats, seats, bus_seat_layout })
}

#[async_trait]
impl SeatAvailabilityProvider for RedisClient {
    async fn fetch_seat_availability(&self, departure_id: Uuid) -> Result<SeatAvailability, AvailabilityError> {
        let id = departure_id.to_string();
        let unreachable = |e: redis::RedisError| AvailabilityError::Unreachable(e.to_string());

        let total_seats = self.get_total_seats(&id).await
            .map_err(unreachable)?
            .ok_or(AvailabilityError::NotFound(departure_id))?;
        let total_seats = parse_total_seats(&total_seats)?;
        let statuses = self.get_seat_statuses(&id).await.map_err(unreachable)?;
        let layout = self.get_seat_layout(&id).await.map_err(unreachable)?;
        info!("Seat map loaded from Redis for departure {}: {} seats", id, total_seats);

        seat_map_from_redis(total_seats, statuses, layout)?.normalize()
    }
}
