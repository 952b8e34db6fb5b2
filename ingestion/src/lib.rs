pub mod loader;
pub mod record;

pub use loader::{GraphLoader, IngestionError, LoadStats, LoadedGraph};
pub use record::ReviewRecord;
