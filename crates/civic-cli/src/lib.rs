//! # Civic CLI Library
//!
//! Wiring and command dispatch for the `civic` binary, kept in a library so
//! integration tests can drive the same code paths.

pub mod app;
pub mod cli;
pub mod di;
pub mod startup;
