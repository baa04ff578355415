//! Sungrove Core - Shared types library.
//!
//! This crate provides common types used across all Sungrove components:
//! - `client` - Session & commerce-state core consumed by the UI layer
//! - `cli` - Command-line tool for driving the client against a backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, prices, tokens,
//!   and session credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
