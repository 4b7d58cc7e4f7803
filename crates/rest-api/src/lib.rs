//! `rest-api` — application skeleton library.
//!
//! The interesting part of this crate is [`server::middleware`]: every inbound
//! request gets a [`logger::Logger`] attached to its extensions, the request
//! and response are snapshotted, handler panics are recovered at the request
//! boundary, and one consolidated structured log record is emitted per
//! request. Everything else (config, routes, dummy service, dummy storage) is
//! scaffolding meant to be replaced by a real application.

pub mod config;
pub mod logger;
pub mod server;
pub mod service;
pub mod storage;
pub mod telemetry;
