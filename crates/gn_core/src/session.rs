use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::comments::{Comment, CommentLog};
use crate::config::Config;
use crate::error::{FetchError, NarrationError};
use crate::narration::{NarrationController, ToggleOutcome, UtteranceId};
use crate::pipeline::{Projection, SortKey, ViewState};
use crate::share::{share_links, ShareLink};
use crate::types::Article;
use crate::{Error, Result};

/// Generation number of a fetch. Only the latest one is applied.
pub type FetchTicket = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label of the button that switches away from this theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Switch to Dark Mode",
            Theme::Dark => "Switch to Light Mode",
        }
    }
}

/// Everything one reader sees and does, held in memory only.
///
/// Each method is one event; callers run them one at a time.
#[derive(Debug)]
pub struct Session {
    articles: Vec<Article>,
    view: ViewState,
    sections: Vec<String>,
    error: Option<FetchError>,
    loading: bool,
    fetch_ticket: FetchTicket,
    narration: std::result::Result<NarrationController, NarrationError>,
    comments: CommentLog,
    theme: Theme,
    clock: Clock,
    focus: Option<usize>,
}

impl Session {
    pub fn new(
        config: &Config,
        narration: std::result::Result<NarrationController, NarrationError>,
    ) -> Self {
        Self {
            articles: Vec::new(),
            view: ViewState::new(config.page_size),
            sections: config.sections.clone(),
            error: None,
            loading: false,
            fetch_ticket: 0,
            narration,
            comments: CommentLog::new(),
            theme: Theme::default(),
            clock: Clock::new(&Local::now()),
            focus: None,
        }
    }

    // --- fetching ---

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_ticket += 1;
        self.loading = true;
        debug!("Fetch {} started", self.fetch_ticket);
        self.fetch_ticket
    }

    /// Apply a fetch result. Returns false if a newer fetch superseded it.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<Vec<Article>, FetchError>,
    ) -> bool {
        if ticket != self.fetch_ticket {
            warn!(
                "Discarding response of fetch {} (current is {})",
                ticket, self.fetch_ticket
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(articles) => {
                info!("📰 Loaded {} articles", articles.len());
                self.articles = articles;
                self.error = None;
                self.view.reset_page();
                self.focus = None;
            }
            Err(e) => {
                warn!("Fetch failed: {}", e);
                self.error = Some(e);
            }
        }
        true
    }

    /// The retry action: drop all volatile state and start over.
    pub fn reload(&mut self) -> FetchTicket {
        if let Err(e) = self.stop_narration() {
            warn!("Failed to stop narration on reload: {}", e);
        }
        self.articles.clear();
        self.view = ViewState::new(self.view.page_size());
        self.error = None;
        self.comments = CommentLog::new();
        self.theme = Theme::default();
        self.focus = None;
        self.begin_fetch()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(FetchError::user_message)
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    // --- view ---

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn page(&self) -> Projection<'_> {
        self.view.project(&self.articles)
    }

    pub fn set_search(&mut self, term: &str) {
        self.view.set_search(term);
        self.focus = None;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.view.set_sort(sort);
        self.focus = None;
    }

    pub fn set_section(&mut self, section: Option<&str>) {
        self.view.set_section(section);
        self.focus = None;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.view.go_to_page(page);
        self.focus = None;
    }

    /// Article at a 0-based position on the current page.
    pub fn article_at(&self, index: usize) -> Result<&Article> {
        let page = self.view.project(&self.articles);
        page.items
            .get(index)
            .copied()
            .ok_or(Error::NoSuchArticle(index))
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn focus_next(&mut self) -> Option<usize> {
        let len = self.page().items.len();
        if len == 0 {
            return None;
        }
        let next = match self.focus {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.focus = Some(next);
        self.focus
    }

    pub fn focus_prev(&mut self) -> Option<usize> {
        let len = self.page().items.len();
        if len == 0 {
            return None;
        }
        let prev = match self.focus {
            Some(i) => i.saturating_sub(1).min(len - 1),
            None => 0,
        };
        self.focus = Some(prev);
        self.focus
    }

    // --- narration ---

    fn narration_mut(&mut self) -> std::result::Result<&mut NarrationController, NarrationError> {
        self.narration.as_mut().map_err(|e| e.clone())
    }

    /// Name of the speech backend, `None` when there is no speech output.
    pub fn narration_service(&self) -> Option<&str> {
        self.narration
            .as_ref()
            .ok()
            .map(NarrationController::service_name)
    }

    pub fn is_speaking(&self) -> bool {
        self.narration
            .as_ref()
            .map(NarrationController::is_speaking)
            .unwrap_or(false)
    }

    /// Read the article at `index` on the current page.
    pub fn play(&mut self, index: usize) -> Result<UtteranceId> {
        let (title, description) = {
            let article = self.article_at(index)?;
            (article.title.clone(), article.description.clone())
        };
        let id = self.narration_mut()?.play(&title, &description)?;
        Ok(id)
    }

    pub fn toggle_narration(&mut self) -> Result<ToggleOutcome> {
        Ok(self.narration_mut()?.toggle()?)
    }

    pub fn stop_narration(&mut self) -> Result<()> {
        if let Ok(narration) = self.narration.as_mut() {
            narration.stop()?;
        }
        Ok(())
    }

    pub fn narration_completed(&mut self, id: UtteranceId) -> bool {
        match self.narration.as_mut() {
            Ok(narration) => narration.on_completed(id),
            Err(_) => false,
        }
    }

    // --- everything else ---

    pub fn submit_comment(&mut self, text: &str) -> bool {
        self.comments.submit(text).is_some()
    }

    pub fn comments(&self) -> &[Comment] {
        self.comments.entries()
    }

    pub fn share_links(&self, index: usize) -> Result<Vec<ShareLink>> {
        share_links(&self.article_at(index)?.url)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn date_line(&self) -> &str {
        self.clock.display()
    }

    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool
    where
        Tz::Offset: std::fmt::Display,
    {
        self.clock.tick(now)
    }
}
