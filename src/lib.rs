// Library target for the integration tests under tests/. The binary entry
// point is main.rs, which declares the same module tree; parts of it are only
// reached through the binary, so dead_code is allowed here.
#![allow(dead_code)]

pub mod ai;
pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod games;
pub mod session;
pub mod store;
pub mod ui;
