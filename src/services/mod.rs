//! Services - engine logic and state management
//!
//! This module contains the core engine services:
//! - `order` - Insertion-stable gate ordering with manual reorder
//! - `merger` - Snapshot merging and ordered view derivation
//! - `selection` - User gate selection (ordered, duplicate-free)
//! - `analyzer` - Sequence delta and aggregate statistics computation
//! - `engine` - Owned engine instance composing the above
//! - `poller` - Periodic snapshot acquisition driver

pub mod analyzer;
pub mod engine;
pub mod merger;
pub mod order;
pub mod poller;
pub mod selection;

// Re-export commonly used types
pub use engine::GateEngine;
pub use poller::PollDriver;
