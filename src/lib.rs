//! flifocus library - FLI USB focuser control.
//!
//! This library exposes the core functionality of the `flifocus` CLI for use
//! in tests and potentially other applications.
//!
//! # Modules
//!
//! - `focuser`: Focuser abstraction, vendor backend and simulated backend
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
//! - `config`: Configuration file handling
//! - `logging`: Tracing subscriber setup
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod focuser;
pub mod logging;
pub mod output;
pub mod theme;
