pub mod clock;
pub mod comments;
pub mod config;
pub mod error;
pub mod narration;
pub mod pipeline;
pub mod routes;
pub mod session;
pub mod share;
pub mod source;
pub mod types;

pub use config::Config;
pub use error::{Error, FetchError, NarrationError, Result};
pub use narration::{NarrationController, NarrationService, UtteranceId};
pub use pipeline::{Projection, Query, SortKey, ViewState};
pub use routes::Route;
pub use session::{FetchTicket, Session, Theme};
pub use share::{ShareLink, SharePlatform};
pub use source::NewsSource;
pub use types::{Article, NewsResponse, PublishedAt, RawArticle};
