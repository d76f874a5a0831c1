pub mod logging;
pub mod sources;
pub mod task;

pub use logging::{init_logging, Logger};
pub use sources::{create_source, FileSource, MemorySource, NewsDataSource};
pub use task::{fetch_once, FetchOutcome, FetchTask};

pub mod prelude {
    pub use super::sources::create_source;
    pub use super::task::{FetchOutcome, FetchTask};
    pub use gn_core::{Article, Error, FetchError, NewsSource, Result};
}
