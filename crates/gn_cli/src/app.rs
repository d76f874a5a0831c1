use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use gn_core::narration::{CompletionReceiver, ToggleOutcome};
use gn_core::{NewsSource, Result, Session};
use gn_fetch::{FetchOutcome, FetchTask};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::commands::{Input, HELP};
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The interactive browser: one session driven by typed commands,
/// fetch results, narration completions and the clock.
pub struct App {
    session: Session,
    source: Arc<dyn NewsSource>,
    fetch: Option<FetchTask>,
    outcomes_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    completions: CompletionReceiver,
    clock_interval: Duration,
}

impl App {
    pub fn new(
        session: Session,
        source: Arc<dyn NewsSource>,
        completions: CompletionReceiver,
        clock_interval: Duration,
    ) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            session,
            source,
            fetch: None,
            outcomes_tx,
            outcomes_rx,
            completions,
            clock_interval,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Start a fetch. Replacing the running task aborts it.
    fn start_fetch(&mut self, reload: bool) {
        let ticket = if reload {
            self.session.reload()
        } else {
            self.session.begin_fetch()
        };
        self.fetch = Some(FetchTask::spawn(
            self.source.clone(),
            ticket,
            self.outcomes_tx.clone(),
        ));
    }

    pub fn apply_outcome<W: Write>(&mut self, outcome: FetchOutcome, out: &mut W) -> Result<()> {
        if self.session.apply_fetch(outcome.ticket, outcome.result) {
            self.fetch = None;
            render::page(&self.session, out)?;
        }
        Ok(())
    }

    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let input = match line.parse::<Input>() {
            Ok(input) => input,
            Err(message) => {
                writeln!(out, "{}", message)?;
                return Ok(Flow::Continue);
            }
        };
        debug!("Input: {:?}", input);

        match input {
            Input::Search(term) => {
                self.session.set_search(&term);
                render::page(&self.session, out)?;
            }
            Input::Sort(sort) => {
                self.session.set_sort(sort);
                render::page(&self.session, out)?;
            }
            Input::Filter(section) => {
                self.session.set_section(section.as_deref());
                render::page(&self.session, out)?;
            }
            Input::Sections => render::sections(&self.session, out)?,
            Input::Go(route) => {
                self.session.set_section(route.section());
                writeln!(out, "== {} ==", route.label())?;
                render::page(&self.session, out)?;
            }
            Input::Page(page) => {
                self.session.go_to_page(page);
                render::page(&self.session, out)?;
            }
            Input::NextPage => {
                let page = self.session.page().page + 1;
                self.session.go_to_page(page);
                render::page(&self.session, out)?;
            }
            Input::PrevPage => {
                let page = self.session.page().page.saturating_sub(1);
                self.session.go_to_page(page);
                render::page(&self.session, out)?;
            }
            Input::FocusDown => {
                let focus = self.session.focus_next();
                self.show_selection(focus, out)?;
            }
            Input::FocusUp => {
                let focus = self.session.focus_prev();
                self.show_selection(focus, out)?;
            }
            Input::Play(number) => {
                let index = match number.map(|n| n - 1).or(self.session.focus()) {
                    Some(index) => index,
                    None => {
                        writeln!(out, "Select an article first, or use `play <n>`.")?;
                        return Ok(Flow::Continue);
                    }
                };
                match self.session.play(index) {
                    Ok(_) => {
                        let title = self.session.article_at(index)?.title.clone();
                        writeln!(out, "🔊 Reading: {}", title)?;
                    }
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            Input::Toggle => match self.session.toggle_narration() {
                Ok(ToggleOutcome::Paused) => writeln!(out, "⏸ Paused")?,
                Ok(ToggleOutcome::Resumed(_)) => writeln!(out, "🔊 Resumed from the start")?,
                Ok(ToggleOutcome::Nothing) => writeln!(out, "Nothing to read.")?,
                Err(e) => writeln!(out, "{}", e)?,
            },
            Input::Share(number, platform) => match self.session.share_links(number - 1) {
                Ok(links) => {
                    let links: Vec<_> = links
                        .into_iter()
                        .filter(|link| platform.map_or(true, |p| p == link.platform))
                        .collect();
                    render::share_links(&links, out)?;
                }
                Err(e) => writeln!(out, "{}", e)?,
            },
            Input::Comment(text) => {
                if self.session.submit_comment(&text) {
                    render::comments(&self.session, out)?;
                } else {
                    writeln!(out, "Comment is empty.")?;
                }
            }
            Input::Comments => render::comments(&self.session, out)?,
            Input::Theme => {
                let theme = self.session.toggle_theme();
                writeln!(out, "Theme: {:?} ({})", theme, theme.toggle_label())?;
            }
            Input::Retry => {
                self.start_fetch(true);
                writeln!(out, "Reloading...")?;
            }
            Input::Show => {
                render::header(&self.session, out)?;
                render::page(&self.session, out)?;
            }
            Input::Help => writeln!(out, "{}", HELP)?,
            Input::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn show_selection<W: Write>(&self, focus: Option<usize>, out: &mut W) -> Result<()> {
        match focus.and_then(|i| self.session.article_at(i).ok()) {
            Some(article) => writeln!(out, "> {}", article.title)?,
            None => writeln!(out, "Nothing to select.")?,
        }
        Ok(())
    }

    /// Run until `quit` or end of input.
    pub async fn run<R, W>(mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.start_fetch(false);
        render::header(&self.session, out)?;
        writeln!(out, "Loading articles... (type `help` for commands)")?;
        out.flush()?;

        let mut input = input;
        // Kept across iterations: a read cancelled by another branch resumes here.
        let mut line = Vec::new();
        let mut ticker = tokio::time::interval(self.clock_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                read = input.read_until(b'\n', &mut line) => {
                    if read? == 0 && line.is_empty() {
                        break;
                    }
                    let typed = decode_line(&line);
                    line.clear();
                    if self.handle_line(&typed, out)? == Flow::Quit {
                        break;
                    }
                }
                Some(outcome) = self.outcomes_rx.recv() => {
                    self.apply_outcome(outcome, out)?;
                }
                Some(id) = self.completions.recv() => {
                    if self.session.narration_completed(id) {
                        writeln!(out, "⏹ Finished reading")?;
                    }
                }
                _ = ticker.tick() => {
                    if self.session.tick(&Local::now()) {
                        writeln!(out, "{}", self.session.date_line())?;
                    }
                }
            }
            out.flush()?;
        }

        if let Some(fetch) = self.fetch.take() {
            if !fetch.is_finished() {
                debug!("Abandoning fetch {}", fetch.ticket());
                fetch.abort();
            }
        }
        if let Err(e) = self.session.stop_narration() {
            warn!("Failed to stop narration: {}", e);
        }
        render::footer(out)?;
        Ok(())
    }
}

/// Typed input is not trusted to be UTF-8; bad bytes become U+FFFD.
fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}
