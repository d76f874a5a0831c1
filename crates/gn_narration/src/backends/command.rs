use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;

use gn_core::config::NarrationConfig;
use gn_core::narration::CompletionSender;
use gn_core::{NarrationError, NarrationService, UtteranceId};
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Synthesizers tried in order when no command is configured.
pub const KNOWN_SYNTHESIZERS: [&str; 4] = ["espeak-ng", "espeak", "say", "spd-say"];

struct ActiveUtterance {
    id: UtteranceId,
    // Dropping or firing this kills the child.
    stop: oneshot::Sender<()>,
}

/// Speaks by running `program [args...] -- <text>`, one child per utterance.
/// The known synthesizers all stop option parsing at `--`, so a headline
/// starting with `-` is read out rather than taken as a flag.
///
/// The child exiting on its own counts as completion. Cancelling kills it
/// and reports nothing.
pub struct CommandNarrator {
    program: PathBuf,
    args: Vec<String>,
    completions: CompletionSender,
    active: Mutex<Option<ActiveUtterance>>,
}

impl CommandNarrator {
    pub fn new(program: PathBuf, args: Vec<String>, completions: CompletionSender) -> Self {
        Self {
            program,
            args,
            completions,
            active: Mutex::new(None),
        }
    }

    fn argv<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> {
        self.args
            .iter()
            .map(String::as_str)
            .chain(["--", text])
    }

    /// Use the configured command, or the first known synthesizer on `PATH`.
    pub fn detect(
        config: &NarrationConfig,
        completions: CompletionSender,
    ) -> Result<Self, NarrationError> {
        let path = std::env::var_os("PATH").unwrap_or_default();
        let program = match &config.command {
            Some(command) => find_program(command, &path).ok_or_else(|| {
                NarrationError::CapabilityUnavailable(format!("{} not found", command))
            })?,
            None => KNOWN_SYNTHESIZERS
                .iter()
                .find_map(|name| find_program(name, &path))
                .ok_or_else(|| {
                    NarrationError::CapabilityUnavailable(format!(
                        "none of {} found on PATH",
                        KNOWN_SYNTHESIZERS.join(", ")
                    ))
                })?,
        };
        debug!("Using speech program {}", program.display());
        Ok(Self::new(program, config.args.clone(), completions))
    }

    fn take_active(&self) -> Result<Option<ActiveUtterance>, NarrationError> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| NarrationError::Playback("narrator state poisoned".to_string()))?;
        Ok(active.take())
    }
}

/// Resolve `name` against `path` (a `PATH`-style list). Names containing a
/// separator are taken as paths.
pub fn find_program(name: &str, path: &OsStr) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    std::env::split_paths(path)
        .map(|dir| dir.join(name))
        .find(|full| full.is_file())
}

impl fmt::Debug for CommandNarrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNarrator")
            .field("program", &self.program)
            .field("args", &self.args)
            .finish()
    }
}

impl NarrationService for CommandNarrator {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or("speech command")
    }

    fn speak(&self, id: UtteranceId, text: &str) -> Result<(), NarrationError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| NarrationError::Playback(format!("no async runtime: {}", e)))?;
        self.cancel()?;

        let mut child = Command::new(&self.program)
            .args(self.argv(text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| NarrationError::Playback(format!("{}: {}", self.program.display(), e)))?;

        let (stop, stopped) = oneshot::channel();
        {
            let mut active = self
                .active
                .lock()
                .map_err(|_| NarrationError::Playback("narrator state poisoned".to_string()))?;
            *active = Some(ActiveUtterance { id, stop });
        }

        let completions = self.completions.clone();
        runtime.spawn(async move {
            tokio::select! {
                status = child.wait() => {
                    match status {
                        Ok(status) if status.success() => debug!("Utterance {} done", id),
                        Ok(status) => warn!("Speech program exited with {} for utterance {}", status, id),
                        Err(e) => warn!("Lost speech program for utterance {}: {}", id, e),
                    }
                    let _ = completions.send(id);
                }
                _ = stopped => {
                    if let Err(e) = child.kill().await {
                        warn!("Failed to stop utterance {}: {}", id, e);
                    }
                }
            }
        });
        Ok(())
    }

    fn cancel(&self) -> Result<(), NarrationError> {
        if let Some(active) = self.take_active()? {
            debug!("Cancelling utterance {}", active.id);
            let _ = active.stop.send(());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gn_core::narration::completion_channel;
    use std::time::Duration;

    #[test]
    fn test_missing_command_is_unavailable() {
        let (tx, _rx) = completion_channel();
        let config = NarrationConfig {
            command: Some("gn-no-such-synthesizer".to_string()),
            args: vec![],
        };
        let err = CommandNarrator::detect(&config, tx).unwrap_err();
        assert!(matches!(err, NarrationError::CapabilityUnavailable(_)));
    }

    #[test]
    fn test_find_program_in_path_list() {
        let dir = std::env::temp_dir().join(format!("gn_narration_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let program = dir.join("fake-say");
        std::fs::write(&program, "").unwrap();

        let path = std::env::join_paths([Path::new("/nonexistent"), dir.as_path()]).unwrap();
        assert_eq!(find_program("fake-say", &path), Some(program.clone()));
        assert_eq!(find_program("other", &path), None);
        assert_eq!(
            find_program(program.to_str().unwrap(), OsStr::new("")),
            Some(program.clone())
        );

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_text_follows_end_of_options() {
        let (tx, _rx) = completion_channel();
        let narrator = CommandNarrator::new(
            PathBuf::from("espeak-ng"),
            vec!["-s".to_string(), "150".to_string()],
            tx,
        );
        let argv: Vec<&str> = narrator.argv("-5% inflation. Prices rise").collect();
        assert_eq!(argv, ["-s", "150", "--", "-5% inflation. Prices rise"]);
    }

    #[test]
    fn test_speak_outside_runtime_fails() {
        let (tx, _rx) = completion_channel();
        let narrator = CommandNarrator::new(PathBuf::from("true"), vec![], tx);
        assert!(matches!(
            narrator.speak(1, "hello"),
            Err(NarrationError::Playback(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_natural_exit_reports_completion() {
        let (tx, mut rx) = completion_channel();
        let narrator = CommandNarrator::new(PathBuf::from("true"), vec![], tx);
        narrator.speak(42, "A. B").unwrap();
        let id = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(id, Some(42));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancel_reports_nothing() {
        let (tx, mut rx) = completion_channel();
        let narrator = CommandNarrator::new(
            PathBuf::from("sh"),
            vec!["-c".to_string(), "sleep 5".to_string(), "narrator".to_string()],
            tx,
        );
        narrator.speak(1, "long text").unwrap();
        narrator.cancel().unwrap();
        let received = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
        assert!(received.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_new_utterance_replaces_old() {
        let (tx, mut rx) = completion_channel();
        let narrator = CommandNarrator::new(
            PathBuf::from("sh"),
            vec!["-c".to_string(), "sleep 0.3".to_string(), "narrator".to_string()],
            tx,
        );
        narrator.speak(1, "first").unwrap();
        narrator.speak(2, "second").unwrap();
        let id = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(id, Some(2));
    }
}
