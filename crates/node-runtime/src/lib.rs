//! # Multi-Chain Node Runtime
//!
//! Wires the core crates into a runnable process.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment (`config`)
//! 2. Initialize tracing with the configured filter
//! 3. Open the storage backend (`storage`)
//! 4. Build the active application behind the dispatch façade
//! 5. Drive it from stdin until EOF (`console`)
//! 6. Flush and close the store

pub mod config;
pub mod console;
pub mod storage;

pub use config::{ConfigError, RuntimeConfig, StorageBackend, DEFAULT_CHAIN_ID};
pub use console::{execute, parse_line, run, Action, Command, ParseError};
pub use storage::open_store;
