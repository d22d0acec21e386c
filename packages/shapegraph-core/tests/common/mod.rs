//! Common test utilities for shapegraph-core
//!
//! Shared fixtures and assertions for integration tests.

#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
