//! Integration tests for typed arrays.
//!
//! These tests exercise resolution, validation, and ingestion through the
//! public facade, with fixtures shared from `tests/common`.

#[path = "../common/mod.rs"]
mod common;

mod config_loading;
mod mutation_invariants;
mod property_tests;
mod scenarios;
