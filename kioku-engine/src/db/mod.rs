//! Database services for records, users and tags

pub mod records;
pub mod tags;
pub mod users;
