//! `regdesk` - Registration desk data layer
//!
//! This library provides the record schema, validation rules, persistence,
//! and dashboard aggregations behind a small registration and reporting tool.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod record;
pub mod reference;
pub mod session;
pub mod stats;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Registration, RegistrationForm};
pub use reference::ReferenceData;
pub use session::{Authenticator, Session, StaticAuthenticator};
pub use store::{KeyValueStore, MemoryStore, RecordStore, SqliteStore};
pub use validation::{FormValidator, ValidationReport};
