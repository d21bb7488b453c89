use std::sync::Arc;
use std::net::SocketAddr;
use anyhow::Context;
use seatwise_api::{app, sessions::SessionStore, sweeper::start_selection_sweeper, AppState};
use seatwise_core::SeatAvailabilityProvider;
use seatwise_store::app_config::{AvailabilitySource, Config};
use seatwise_store::{EventProducer, InMemorySeatAvailability, KafkaBookingSubmission, RedisClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatwise_api=debug,seatwise_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Seatwise API on port {}", config.server.port);

    let availability: Arc<dyn SeatAvailabilityProvider> = match config.availability.source {
        AvailabilitySource::Redis => {
            let redis = RedisClient::new(&config.redis.url)
                .await
                .context("Failed to connect to Redis")?;
            Arc::new(redis)
        }
        AvailabilitySource::Memory => match &config.availability.seat_map_file {
            Some(path) => Arc::new(InMemorySeatAvailability::from_file(path).await?),
            None => {
                tracing::warn!("In-memory availability without a seat map file; every departure will be not found");
                Arc::new(InMemorySeatAvailability::new())
            }
        },
    };

    let producer = EventProducer::new(&config.kafka.brokers)
        .context("Failed to create Kafka producer")?;
    let submission = Arc::new(KafkaBookingSubmission::new(producer, config.kafka.topic.clone()));

    let sessions = Arc::new(SessionStore::new());

    let app_state = AppState {
        availability,
        submission,
        sessions: sessions.clone(),
        seating: config.seating.clone(),
    };

    start_selection_sweeper(
        sessions,
        app_state.selection_ttl(),
        tokio::time::Duration::from_secs(config.seating.sweep_interval_seconds.max(1)),
    );

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
