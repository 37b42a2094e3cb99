//! `oceandash` - Oceanographic research dashboard backend
//!
//! This library provides create/list access to vessels, missions, crew logs
//! and telemetry readings held in a document store, a deterministic sea-state
//! lookup, and the HTTP API that serves them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod server;
pub mod storage;
pub mod weather;

pub use config::Config;
pub use error::{Error, Result, ValidationError};
pub use gateway::{Diagnostics, PersistenceGateway};
pub use logging::init_logging;
pub use model::{Collection, CrewLog, Document, Mission, Stored, Telemetry, Vessel};
pub use storage::DocumentStore;
