//! # Kioku Common Library
//!
//! Shared code for the Kioku study-log engine including:
//! - Database models, schema and initialization
//! - Domain enums (record types, sort fields, date filter policies)
//!   with their command alias tables
//! - Configuration loading
//! - Timestamp utilities

pub mod config;
pub mod db;
pub mod error;
pub mod time;
pub mod types;

pub use error::{Error, Result};
pub use types::{DateFilterType, ImportFormat, RecordSortField, RecordType};
