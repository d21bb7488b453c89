pub mod app_config;
pub mod redis_repo;
pub mod memory_repo;
pub mod events;

pub use redis_repo::RedisClient;
pub use memory_repo::InMemorySeatAvailability;
pub use events::{EventProducer, KafkaBookingSubmission};
