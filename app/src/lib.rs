// storefront/src/lib.rs

//! Cart-to-order core of an online store: cart mutations guarded by live
//! inventory, atomic order placement with snapshot items, owner-scoped order
//! queries and payment-intent creation, served over actix-web.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

pub use errors::{AppError, Result};
pub use state::AppState;
