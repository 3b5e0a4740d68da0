//! `menuboard` - Menu browsing, ordering and order history for a snack counter
//!
//! The catalog lives in memory for one session. Placed orders form an
//! append-only ledger that is persisted as a whole under a single key of a
//! key-value store and reloaded on the next start.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod history;
pub mod input;
pub mod ledger;
pub mod logging;
pub mod session;
pub mod shell;
pub mod storage;

pub use catalog::{Catalog, MenuEntry, Price};
pub use config::Config;
pub use dashboard::{Dashboard, Notice};
pub use error::{Error, Result};
pub use history::HistoryTable;
pub use ledger::{Ledger, Order, Quantity};
pub use logging::init_logging;
pub use session::Session;
pub use shell::{Shell, Tab};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
