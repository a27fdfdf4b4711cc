//! ordergate — a small order-processing backend.
//!
//! One binary, one subcommand per service: an API gateway that routes by
//! path prefix, an auth service owning credentials and bearer tokens, and
//! four CRUD resource services (customer, product, sales, invoice) over
//! disjoint in-memory datasets.

pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod proxy;
pub mod services;
pub mod store;
