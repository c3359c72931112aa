use crate::logger;
use std::process::{Child, Command, Stdio};

pub const SPEECH_UNAVAILABLE: &str =
    "Read-aloud is not available: no text-to-speech program was found.";

/// Read-aloud through an external text-to-speech program. At most one
/// utterance exists at a time; starting a new one cancels the previous.
#[derive(Debug)]
pub struct Speaker {
    command: Option<String>,
    current: Option<Child>,
    notice_shown: bool,
}

impl Speaker {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command,
            current: None,
            notice_shown: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.command.is_some()
    }

    /// Returns the capability notice the first time it is asked for and
    /// `None` afterwards.
    pub fn take_unavailable_notice(&mut self) -> Option<&'static str> {
        if self.is_available() || self.notice_shown {
            return None;
        }
        self.notice_shown = true;
        Some(SPEECH_UNAVAILABLE)
    }

    /// Start speaking `text`, cancelling anything already playing. Returns
    /// false when speech is unavailable or the program failed to start.
    pub fn speak(&mut self, text: &str) -> bool {
        self.stop();
        let Some(program) = self.command.as_deref() else {
            return false;
        };
        if text.trim().is_empty() {
            return false;
        }

        match Command::new(program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                self.current = Some(child);
                true
            }
            Err(e) => {
                logger::log(&format!("Failed to start {}: {}", program, e));
                false
            }
        }
    }

    pub fn is_speaking(&mut self) -> bool {
        let finished = match self.current.as_mut() {
            Some(child) => !matches!(child.try_wait(), Ok(None)),
            None => return false,
        };
        if finished {
            self.current = None;
        }
        !finished
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.current.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_notice_is_reported_once() {
        let mut speaker = Speaker::new(None);
        assert!(!speaker.speak("hello"));
        assert_eq!(speaker.take_unavailable_notice(), Some(SPEECH_UNAVAILABLE));
        assert_eq!(speaker.take_unavailable_notice(), None);
    }

    #[test]
    fn test_available_speaker_has_no_notice() {
        let mut speaker = Speaker::new(Some("espeak".to_string()));
        assert_eq!(speaker.take_unavailable_notice(), None);
    }

    #[test]
    fn test_missing_program_fails_gracefully() {
        let mut speaker = Speaker::new(Some("definitely-not-a-tts-binary".to_string()));
        assert!(!speaker.speak("hello"));
        assert!(!speaker.is_speaking());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_utterance_replaces_previous() {
        // `sleep` stands in for a long-running speech program.
        let mut speaker = Speaker::new(Some("sleep".to_string()));
        assert!(speaker.speak("5"));
        assert!(speaker.is_speaking());
        assert!(speaker.speak("5"));
        assert!(speaker.is_speaking());
        speaker.stop();
        assert!(!speaker.is_speaking());
    }
}
