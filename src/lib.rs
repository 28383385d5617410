//! Faculty performance analytics: synthetic record generation, filtering,
//! aggregation and the per-view structures a dashboard renders.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod generator;
pub mod logging;
pub mod models;
pub mod report;
pub mod session;
pub mod store;
pub mod style;

pub use error::{DashboardError, Result};
