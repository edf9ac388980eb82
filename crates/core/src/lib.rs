//! Clientele Core - Shared types library.
//!
//! This crate provides the validated domain types used across the Clientele
//! components:
//!
//! - `api` - The customer-registry REST service
//! - `integration-tests` - End-to-end tests against the API router
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Values of these types are valid by construction: `Email::parse` and
//! `Mobile::parse` are the single places where format rules are enforced.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and mobile numbers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
