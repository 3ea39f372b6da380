//! ragchat - a terminal chat client for a retrieval-augmented answer service
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod sse;
pub mod state;
pub mod stream;
pub mod terminal;
pub mod traits;
pub mod ui;
