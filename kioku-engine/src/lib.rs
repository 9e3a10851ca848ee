//! # Kioku Engine
//!
//! Record ingestion, deduplication and temporal query engine:
//! - `extract`: classify free-form text into content/type pairs
//! - `import`: chat-history and delimited-file parsers
//! - `merge`: create-or-update with monotonic score/timestamp semantics
//! - `pipeline`: all-or-nothing batch ingestion over one transaction
//! - `window`: date-filter specification to concrete UTC windows
//! - `query`: filtered/sorted/paged record queries
//!
//! Transport (bot commands, HTTP) and identity live outside this crate;
//! everything here is keyed by an opaque user id.

pub mod db;
pub mod extract;
pub mod import;
pub mod merge;
pub mod pipeline;
pub mod query;
pub mod window;

pub use merge::MergeOutcome;
pub use pipeline::{IngestItem, IngestReport, IngestionPipeline};
pub use query::{QueryPage, RecordFilter, RecordQuery};
pub use window::DateFilter;
