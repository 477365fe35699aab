//! services/api/src/lib.rs
//!
//! The GenUI web service: configuration, adapters for the core ports, and the
//! HTTP delivery layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
