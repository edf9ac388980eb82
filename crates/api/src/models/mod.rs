//! Domain types for the API.
//!
//! These types represent validated domain objects separate from database row
//! types. A [`Customer`] or [`UserAccount`] in hand is always well-formed;
//! raw client input lives in the payload types under [`crate::validation`].

pub mod customer;
pub mod user;

pub use customer::{Customer, CustomerUpdate, NewCustomer};
pub use user::{NewUser, UserAccount};
