//! promhello server library entry.
//!
//! Wires config, shared state, and the two routers (application and
//! metrics) into a bootable server. Consumed by the binary (`main.rs`) and
//! by integration tests.

pub mod app;
pub mod app_state;
pub mod config;
pub mod ops;
pub mod router;
pub mod server;
