// Library target for benchmarks and integration tests.
// The binary entry point is main.rs; this file re-declares the non-UI part
// of the module tree so that harnesses can import `verbdrill::engine::*`,
// `verbdrill::session::*` and friends.
#![allow(dead_code)]

pub mod catalog;
pub mod engine;
pub mod session;
pub mod store;
