// SPDX-License-Identifier: MIT

pub mod config;
pub mod engine;
pub mod error;
pub mod server;
