pub mod http_client;
pub mod local_source;

pub use http_client::ReqwestBulkSource;
pub use local_source::LocalArchiveSource;
