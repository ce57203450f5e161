// tswlink-api: Async Rust client for the Crestron TSW panel /Device API

pub mod client;
pub mod error;
pub mod models;
pub mod relaxed;
pub mod transport;

pub use client::{DeviceClient, Endpoint};
pub use error::Error;
pub use models::{Action, ActionResult, UpdateResponse};
pub use transport::TransportConfig;
