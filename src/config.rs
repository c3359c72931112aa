use crate::ai::DEFAULT_MODEL;
use std::path::PathBuf;

pub const DEFAULT_PAGE_HEIGHT: usize = 60;
const TTS_CANDIDATES: &[&str] = &["espeak", "spd-say", "say"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub model: String,
    pub temperature: Option<f32>,
    /// Text-to-speech program; `None` when nothing usable was found.
    pub tts_command: Option<String>,
    pub page_height: usize,
}

fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\study-assistant")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/study-assistant")
    }
}

fn find_in_path(program: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

fn probe_tts() -> Option<String> {
    TTS_CANDIDATES
        .iter()
        .find(|program| find_in_path(program).is_some())
        .map(|program| program.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), probe_tts)
    }

    /// Build a config from an arbitrary variable lookup. `probe` is only
    /// consulted when no TTS command is configured explicitly.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        probe: impl FnOnce() -> Option<String>,
    ) -> Self {
        let data_dir = lookup("STUDY_ASSISTANT_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let model = lookup("STUDY_ASSISTANT_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = lookup("STUDY_ASSISTANT_TEMPERATURE")
            .and_then(|v| v.trim().parse::<f32>().ok())
            .filter(|t| (0.0..=2.0).contains(t));

        let tts_command = match lookup("STUDY_ASSISTANT_TTS") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v.trim().to_string()),
            None => probe(),
        };

        let page_height = lookup("STUDY_ASSISTANT_PAGE_HEIGHT")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|h| *h >= 10)
            .unwrap_or(DEFAULT_PAGE_HEIGHT);

        Self {
            data_dir,
            model,
            temperature,
            tts_command,
            page_height,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("study.db")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[]), || None);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.page_height, DEFAULT_PAGE_HEIGHT);
        assert!(config.temperature.is_none());
        assert!(config.tts_command.is_none());
        assert!(config.data_dir.ends_with("study-assistant"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(
            lookup_from(&[
                ("STUDY_ASSISTANT_DATA_DIR", "/tmp/sa"),
                ("STUDY_ASSISTANT_MODEL", "some/model"),
                ("STUDY_ASSISTANT_TEMPERATURE", "0.7"),
                ("STUDY_ASSISTANT_PAGE_HEIGHT", "40"),
                ("STUDY_ASSISTANT_TTS", "espeak"),
            ]),
            || panic!("probe must not run when TTS is configured"),
        );
        assert_eq!(config.data_dir, PathBuf::from("/tmp/sa"));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/sa/study.db"));
        assert_eq!(config.model, "some/model");
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.page_height, 40);
        assert_eq!(config.tts_command.as_deref(), Some("espeak"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_lookup(
            lookup_from(&[
                ("STUDY_ASSISTANT_TEMPERATURE", "hot"),
                ("STUDY_ASSISTANT_PAGE_HEIGHT", "3"),
                ("STUDY_ASSISTANT_TTS", ""),
            ]),
            || Some("say".to_string()),
        );
        assert!(config.temperature.is_none());
        assert_eq!(config.page_height, DEFAULT_PAGE_HEIGHT);
        assert!(config.tts_command.is_none());
    }

    #[test]
    fn test_probe_used_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[]), || Some("say".to_string()));
        assert_eq!(config.tts_command.as_deref(), Some("say"));
    }
}
