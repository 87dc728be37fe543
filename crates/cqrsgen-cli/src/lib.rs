//! cqrsgen CLI library.
//!
//! This crate provides the core functionality for the `cqrsgen` binary:
//! loading declaration snapshots and settings, and the command implementations.

pub mod commands;
pub mod input;
pub mod logging;
