// SPDX-License-Identifier: MIT

//! Fact storage for decision table evaluation
//!
//! This module provides:
//! - `FactStore` - the read/write interface a table evaluates against
//! - `Facts` - the default in-memory store with JSON conversion

mod store;

pub use store::{FactStore, Facts};
