//! The inventory ledger: per-SKU available/reserved counters plus an
//! append-only change log.
//!
//! All counter mutations go through [`InventoryLedger`], which serializes
//! operations per SKU and commits the counter update and its audit entry as
//! one unit of work. Two store back ends are provided: in-memory for tests
//! and development, PostgreSQL for durable deployments.

pub mod error;
pub mod ledger;
pub mod memory;
pub mod postgres;
pub mod product;
pub mod store;

pub use error::{LedgerError, Result};
pub use ledger::InventoryLedger;
pub use memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
pub use product::{ChangeContext, ChangeLogEntry, ChangeType, Product};
pub use store::{InventoryStore, ProductFilter};
