use std::sync::Arc;

use gn_core::config::NarrationConfig;
use gn_core::narration::CompletionSender;
use gn_core::{NarrationError, NarrationService};

pub mod backends;

pub use backends::command::{CommandNarrator, KNOWN_SYNTHESIZERS};
pub use backends::memory::MemoryNarrator;

/// Find a speech synthesizer for `config`.
///
/// Fails with `CapabilityUnavailable` when nothing usable is installed.
pub fn create_narrator(
    config: &NarrationConfig,
    completions: CompletionSender,
) -> Result<Arc<dyn NarrationService>, NarrationError> {
    let narrator = CommandNarrator::detect(config, completions)?;
    tracing::info!("🔊 Narration via {}", narrator.name());
    Ok(Arc::new(narrator))
}

pub mod prelude {
    pub use super::create_narrator;
    pub use gn_core::narration::{completion_channel, NarrationController};
    pub use gn_core::{NarrationError, NarrationService, UtteranceId};
}
