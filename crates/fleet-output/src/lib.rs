//! `fleet-output` — persistent backends for the traffic event log.
//!
//! Backends are selected with Cargo features:
//!
//! | Feature   | Backend | Files created        |
//! |-----------|---------|----------------------|
//! | *(none)*  | CSV     | `traffic_events.csv` |
//! | `sqlite`  | SQLite  | `events.db`          |
//!
//! All backends implement [`EventWriter`] and are driven by [`WriterSink`],
//! which implements `fleet_core::EventSink` and so plugs straight into a
//! `Fleet`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fleet_output::{CsvEventWriter, WriterSink};
//!
//! let writer = CsvEventWriter::new(Path::new("./output"))?;
//! let mut fleet = Fleet::new(graph, config, WriterSink::new(writer));
//! // … run the simulation …
//! let mut sink = fleet.into_sink();
//! sink.finish();
//! if let Some(e) = sink.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod sink;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvEventWriter;
pub use error::{OutputError, OutputResult};
pub use sink::WriterSink;
pub use writer::EventWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteEventWriter;
