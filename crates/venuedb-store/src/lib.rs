//! Persistence targets for extracted venues.
//!
//! Two outputs share one venue map: an Elasticsearch index fed through the
//! idempotent [`ingest`] gate, and a flat CSV export for downstream analysis.

pub mod elastic;
pub mod export;
pub mod ingest;
pub mod schema;

mod error;

pub use elastic::{DocumentSink, ElasticClient};
pub use error::StoreError;
pub use export::{export_to_path, write_csv, ExportReport, ExportRow};
pub use ingest::{ingest, IngestReport};
pub use schema::index_mappings;
