use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use seatwise_core::{BookingSubmission, SubmissionError};
use seatwise_shared::SeatSelectionCompletedEvent;
use std::time::Duration;
use tracing::{info, error};

#[derive(Clone)]
pub struct EventProducer {
    producer: FutureProducer,
}

impl EventProducer {
    pub fn new(brokers: &str) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer })
    }

    pub async fn publish(&self, topic: &str, key: &str, payload: &str) -> Result<(), rdkafka::error::KafkaError> {
        let record = FutureRecord::to(topic)
            .key(key)
            .payload(payload);

        match self.producer.send(record, Timeout::After(Duration::from_secs(0))).await {
            Ok(delivery) => {
                info!("Sent message to {}/{}: partition {} offset {}", topic, key, delivery.partition, delivery.offset);
                Ok(())
            }
            Err((e, _msg)) => {
                error!("Failed to send message to {}: {}", topic, e);
                Err(e)
            }
        }
    }
}

/// Hands finished selections to the booking step over Kafka, keyed by departure
pub struct KafkaBookingSubmission {
    producer: EventProducer,
    topic: String,
}

impl KafkaBookingSubmission {
    pub fn new(producer: EventProducer, topic: impl Into<String>) -> Self {
        Self { producer, topic: topic.into() }
    }
}

#[async_trait]
impl BookingSubmission for KafkaBookingSubmission {
    async fn submit(&self, selection: &SeatSelectionCompletedEvent) -> Result<(), SubmissionError> {
        let payload = serde_json::to_string(selection)?;

        self.producer
            .publish(&self.topic, &selection.departure_id.to_string(), &payload)
            .await
            .map_err(|e| SubmissionError::Rejected(e.to_string()))
    }
}
