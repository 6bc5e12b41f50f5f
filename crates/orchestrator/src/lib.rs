//! The sync orchestrator: coordinates "update the ledger, then propagate to
//! the channels" so local state is durable before any outward push, and
//! keeps per-channel connection metadata for observability.

pub mod connection;
pub mod error;
pub mod orchestrator;

pub use connection::{ChannelConnection, ConnectionRegistry, SyncOutcome};
pub use error::SyncError;
pub use orchestrator::{InventoryPush, OrderRefresh, SyncOrchestrator};
