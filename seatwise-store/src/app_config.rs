use serde::Deserialize;
use seatwise_core::SeatLayout;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub availability: AvailabilityConfig,
    pub redis: RedisConfig,
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub seating: SeatingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeatingRules {
    /// Used when the provider sends no layout for the vehicle
    #[serde(default)]
    pub default_layout: SeatLayout,
    #[serde(default = "default_selection_ttl")]
    pub selection_ttl_seconds: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    #[serde(default = "default_max_passengers")]
    pub max_passengers: usize,
}

fn default_selection_ttl() -> u64 { 900 }
fn default_sweep_interval() -> u64 { 60 }
fn default_max_passengers() -> usize { 9 }

impl Default for SeatingRules {
    fn default() -> Self {
        Self {
            default_layout: SeatLayout::default(),
            selection_ttl_seconds: default_selection_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
            max_passengers: default_max_passengers(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilitySource {
    #[default]
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AvailabilityConfig {
    #[serde(default)]
    pub source: AvailabilitySource,
    /// JSON seat maps keyed by departure id, read when `source = "memory"`
    pub seat_map_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    #[serde(default = "default_selection_topic")]
    pub topic: String,
}

fn default_selection_topic() -> String { "seats.selected".to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local, uncommitted overrides
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SEATWISE_SERVER__PORT=8081`
            .add_source(config::Environment::with_prefix("SEATWISE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
