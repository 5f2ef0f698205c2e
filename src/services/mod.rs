//! Business logic services.

pub mod client;
pub mod dashboard;
pub mod geography;
pub mod management;
pub mod seed;
