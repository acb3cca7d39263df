//! Nyooom - A tiny single-user URL shortener
//!
//! Short links live in a Redis/Valkey-compatible key-value store. Every
//! visit bumps a click counter, and each link also has a QR code.
//!
//! # Architecture
//! - `storage`: Key-value backends (Redis, in-memory) and the typed store layer
//! - `services`: Link creation, lookup and click counting
//! - `api`: HTTP handlers, session tokens and middleware
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
