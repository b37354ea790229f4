//! # ox-core
//!
//! Shared types and utilities for the order exposure tracker.
//!
//! This crate provides the building blocks used by the other crates in the
//! workspace: order identifiers and sides, the fixed-point [`types::Price`]
//! used for both prices and aggregate order values, layered configuration,
//! and tracing initialization.

pub mod config;
pub mod logging;
pub mod types;
