//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `http`: reqwest client for the prediction service
//! - `sqlite`: SQLite key-value storage
//! - `memory`: in-memory key-value storage
//! - `pdf`: printpdf report writer
//! - `document`: simulated document analysis
//! - `sanitize`: health data filtering for logs

pub mod document;
pub mod http;
pub mod memory;
pub mod pdf;
pub mod sanitize;
pub mod sqlite;

pub use document::SimulatedDocumentAnalyzer;
pub use http::HttpPredictor;
pub use memory::MemoryKeyValueStore;
pub use pdf::PdfReportWriter;
pub use sqlite::SqliteKeyValueStore;
