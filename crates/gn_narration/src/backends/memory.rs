use std::sync::Mutex;

use gn_core::narration::CompletionSender;
use gn_core::{NarrationError, NarrationService, UtteranceId};

/// Records what it was asked to say instead of producing sound.
/// Completion is reported only when [`MemoryNarrator::finish`] is called.
#[derive(Debug)]
pub struct MemoryNarrator {
    completions: CompletionSender,
    spoken: Mutex<Vec<(UtteranceId, String)>>,
    cancels: Mutex<usize>,
}

impl MemoryNarrator {
    pub fn new(completions: CompletionSender) -> Self {
        Self {
            completions,
            spoken: Mutex::new(Vec::new()),
            cancels: Mutex::new(0),
        }
    }

    pub fn spoken(&self) -> Vec<(UtteranceId, String)> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.lock().map(|c| *c).unwrap_or_default()
    }

    /// Pretend utterance `id` played to the end.
    pub fn finish(&self, id: UtteranceId) -> bool {
        self.completions.send(id).is_ok()
    }
}

impl NarrationService for MemoryNarrator {
    fn name(&self) -> &str {
        "memory"
    }

    fn speak(&self, id: UtteranceId, text: &str) -> Result<(), NarrationError> {
        self.spoken
            .lock()
            .map_err(|_| NarrationError::Playback("recorder poisoned".to_string()))?
            .push((id, text.to_string()));
        Ok(())
    }

    fn cancel(&self) -> Result<(), NarrationError> {
        *self
            .cancels
            .lock()
            .map_err(|_| NarrationError::Playback("recorder poisoned".to_string()))? += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gn_core::narration::{completion_channel, NarrationController};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_controller_round_trip_through_channel() {
        let (tx, mut rx) = completion_channel();
        let narrator = Arc::new(MemoryNarrator::new(tx));
        let mut controller = NarrationController::new(narrator.clone());

        let id = controller.play("A", "B").unwrap();
        assert!(narrator.finish(id));
        let finished = rx.recv().await.unwrap();
        assert!(controller.on_completed(finished));
        assert!(!controller.is_speaking());

        controller.toggle().unwrap();
        assert!(controller.is_speaking());
        let spoken = narrator.spoken();
        assert_eq!(spoken.len(), 2);
        assert_eq!(spoken[1].1, "A. B");
    }

    #[tokio::test]
    async fn test_late_completion_after_replay_is_ignored() {
        let (tx, mut rx) = completion_channel();
        let narrator = Arc::new(MemoryNarrator::new(tx));
        let mut controller = NarrationController::new(narrator.clone());

        let first = controller.play("One", "1").unwrap();
        controller.play("Two", "2").unwrap();
        narrator.finish(first);

        let stale = rx.recv().await.unwrap();
        assert!(!controller.on_completed(stale));
        assert!(controller.is_speaking());
        assert_eq!(narrator.cancel_count(), 1);
    }
}
