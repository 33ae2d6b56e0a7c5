//! Outbound adapters (driven side).

pub mod reddit;
