//! Request payload validation.
//!
//! Validators are functions of explicit inputs: the raw payload, the existing
//! record for updates (or none), and a read-only store handle for advisory
//! uniqueness checks. They never mutate the store - the authoritative
//! uniqueness check happens at insert/update time inside the store itself.

pub mod customer;
pub mod registration;

pub use customer::{CustomerPayload, validate_create, validate_update};
pub use registration::{RegisterPayload, ValidRegistration, validate_registration};
