// Pipeline ingestion: transient archive handling for bulk downloads

pub mod transient;

pub use transient::{TransientArchive, TransientWriter};
