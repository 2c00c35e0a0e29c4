//! PetCare HTTP client implementation.

mod config;
mod gateway;
pub mod headers;
pub mod native_network;

pub use config::ClientConfig;
pub use gateway::PetGateway;
