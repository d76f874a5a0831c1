use std::path::Path;
use std::sync::Arc;

use gn_core::config::ApiConfig;
use gn_core::{NewsSource, Result};

pub mod file;
pub mod memory;
pub mod newsdata;

pub use file::FileSource;
pub use memory::MemorySource;
pub use newsdata::{parse_response, NewsDataSource};

/// The HTTP source, unless a saved listing file is given.
pub fn create_source(config: &ApiConfig, file: Option<&Path>) -> Result<Arc<dyn NewsSource>> {
    match file {
        Some(path) => {
            tracing::info!("📂 Reading articles from {}", path.display());
            Ok(Arc::new(FileSource::new(path)))
        }
        None => Ok(Arc::new(NewsDataSource::new(config.clone())?)),
    }
}
