use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::NarrationError;
use crate::types::narration_text;

/// Identifies one `speak` request. Ids only ever grow.
pub type UtteranceId = u64;

/// Where a service reports that an utterance finished playing on its own.
pub type CompletionSender = mpsc::UnboundedSender<UtteranceId>;
pub type CompletionReceiver = mpsc::UnboundedReceiver<UtteranceId>;

pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
    mpsc::unbounded_channel()
}

/// A text-to-speech capability.
///
/// `speak` starts playback and returns immediately. When playback ends
/// naturally the service sends the utterance id on its completion channel.
/// A cancelled utterance does not have to report anything.
pub trait NarrationService: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn speak(&self, id: UtteranceId, text: &str) -> Result<(), NarrationError>;

    fn cancel(&self) -> Result<(), NarrationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationState {
    Idle,
    Speaking { id: UtteranceId, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Paused,
    Resumed(UtteranceId),
    /// Nothing has been played yet.
    Nothing,
}

/// Idle/speaking state machine on top of a [`NarrationService`].
#[derive(Debug)]
pub struct NarrationController {
    service: Arc<dyn NarrationService>,
    state: NarrationState,
    current_text: Option<String>,
    last_id: UtteranceId,
}

impl NarrationController {
    pub fn new(service: Arc<dyn NarrationService>) -> Self {
        Self {
            service,
            state: NarrationState::Idle,
            current_text: None,
            last_id: 0,
        }
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    pub fn state(&self) -> &NarrationState {
        &self.state
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self.state, NarrationState::Speaking { .. })
    }

    /// Text of the last article played, kept across pause.
    pub fn current_text(&self) -> Option<&str> {
        self.current_text.as_deref()
    }

    /// Read `title. description`, replacing whatever is playing.
    pub fn play(&mut self, title: &str, description: &str) -> Result<UtteranceId, NarrationError> {
        self.start(narration_text(title, description))
    }

    pub fn toggle(&mut self) -> Result<ToggleOutcome, NarrationError> {
        if self.is_speaking() {
            self.service.cancel()?;
            self.state = NarrationState::Idle;
            debug!("🔇 Narration paused");
            return Ok(ToggleOutcome::Paused);
        }
        match self.current_text.clone() {
            // Replays the stored text as-is instead of prefixing another ". ".
            Some(text) => self.start(text).map(ToggleOutcome::Resumed),
            None => Ok(ToggleOutcome::Nothing),
        }
    }

    /// Handle a completion event. Returns false when the event belongs to an
    /// utterance that has already been replaced or cancelled.
    pub fn on_completed(&mut self, id: UtteranceId) -> bool {
        match &self.state {
            NarrationState::Speaking { id: active, .. } if *active == id => {
                self.state = NarrationState::Idle;
                debug!("✅ Utterance {} finished", id);
                true
            }
            _ => {
                debug!("Ignoring stale completion for utterance {}", id);
                false
            }
        }
    }

    /// Stop playback and forget the stored text.
    pub fn stop(&mut self) -> Result<(), NarrationError> {
        if self.is_speaking() {
            self.service.cancel()?;
        }
        self.state = NarrationState::Idle;
        self.current_text = None;
        Ok(())
    }

    fn start(&mut self, text: String) -> Result<UtteranceId, NarrationError> {
        if self.is_speaking() {
            self.service.cancel()?;
            self.state = NarrationState::Idle;
        }
        self.last_id += 1;
        let id = self.last_id;
        self.service.speak(id, &text)?;
        debug!("🔊 Utterance {} started ({} chars)", id, text.len());
        self.current_text = Some(text.clone());
        self.state = NarrationState::Speaking { id, text };
        Ok(id)
    }
}
