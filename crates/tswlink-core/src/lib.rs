//! State synchronisation and control for Crestron TSW touch panels.
//!
//! The panel exposes its whole configuration as one JSON document at
//! `/Device` and accepts partial documents back. This crate keeps a cached,
//! filtered copy of that document and turns single-property changes into
//! verified writes:
//!
//! - **[`Panel`]**: Lifecycle handle. [`connect()`](Panel::connect) performs
//!   the initial fetch and spawns the periodic refresh;
//!   [`probe()`](Panel::probe) is a one-shot connectivity check.
//!
//! - **[`PollingCoordinator`]**: Fetches, filters, and atomically publishes
//!   [`StateSnapshot`]s. Overlapping refreshes are dropped and a failed poll
//!   keeps the previous tree, flagged as stale.
//!
//! - **[`WriteGateway`]**: Builds the minimal partial document for a
//!   [`ValuePath`], posts it, and picks the panel's result for that property
//!   out of the batched reply.
//!
//! - **[`entity`]**: Switch, number, sensor, and text adapters bound to the
//!   fixed [`ENTITIES`](entity::ENTITIES) table.

pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod panel;
pub mod path;
pub mod snapshot;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, PanelConfig};
pub use coordinator::{CoordinatorState, PollingCoordinator, Refresh};
pub use entity::{
    Entity, EntityDescription, EntityKind, NumberEntity, SensorEntity, SnapshotReader,
    SwitchEntity, TextEntity,
};
pub use error::CoreError;
pub use gateway::{WriteGateway, WriteOutcome, WriteResult, WriteTarget};
pub use panel::Panel;
pub use path::ValuePath;
pub use snapshot::{DeviceIdentity, DeviceInfo, StateSnapshot};
pub use stream::SnapshotStream;

pub use tswlink_api::TransportConfig;
