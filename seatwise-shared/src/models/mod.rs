pub mod assignment;
pub mod events;
