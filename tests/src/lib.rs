//! # Multi-Chain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── multi_chain.rs   # isolation of chains sharing one store
//!     ├── determinism.rs   # replayed histories give identical app hashes
//!     └── persistence.rs   # state survives reopening the store
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mc-tests
//! cargo test -p mc-tests integration::determinism
//! ```

pub mod integration;
