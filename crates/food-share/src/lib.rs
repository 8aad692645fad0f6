//! Food donation coordination: organization matching, food quality assessment,
//! and the donation lifecycle shared by donors and receiving organizations.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
