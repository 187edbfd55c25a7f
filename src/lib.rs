//! passmint: a client/server random password generator
//!
//! A server generates passwords on request over a fixed-size binary TCP
//! protocol; an interactive client submits requests and prints the results.
//!
//! Features:
//! - Four generation policies: numeric, alphabetic, mixed, secure
//! - Fixed 38-byte request/response frame, identical in both directions
//! - Strictly sequential server: one client served to completion at a time
//! - Configuration via CLI arguments or TOML file

pub mod client;
pub mod config;
pub mod generator;
pub mod protocol;
pub mod server;
