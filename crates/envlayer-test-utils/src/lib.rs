//! Shared test utilities for the envlayer workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each rebuild the same stores. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: property builders and a prod/dev sample store
//! - [`logging`]: tracing output routed through the test harness

pub mod fixtures;
pub mod logging;
