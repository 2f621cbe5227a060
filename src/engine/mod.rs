// SPDX-License-Identifier: MIT

pub mod condition;
pub mod facts;
pub mod loader;
pub mod table;
pub mod value;

pub use facts::{FactStore, Facts};
pub use loader::TableLoader;
pub use table::{Decision, DecisionTable, OutputMode, Row};
pub use value::{coerce, Value};
