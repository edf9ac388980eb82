//! Application services.
//!
//! Thin orchestration between validators and stores; route handlers stay
//! free of persistence detail.

pub mod accounts;
pub mod customers;

pub use accounts::AccountService;
pub use customers::CustomerService;
