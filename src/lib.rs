//! Book registry: an in-memory store that simulates a REST backend with
//! artificial latency, and the console front-end driving it.

pub mod application;
pub mod domain;
pub mod infra;
pub mod interface;
