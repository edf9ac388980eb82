//! Clientele API library.
//!
//! This crate provides the customer-registry service as a library, allowing
//! the router to be built over any [`db::CustomerStore`] / [`db::UserStore`]
//! implementation (Postgres in production, in-memory fakes in tests).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
