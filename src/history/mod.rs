pub mod sqlite;

use crate::logger;
use crate::models::HistoryRecord;
use anyhow::Result;
use serde_json::Value;
use uuid::Uuid;

pub use sqlite::SqliteStore;

/// Persistence for the history list. The list is always handled as a whole
/// value: `save` replaces everything that was stored before.
pub trait HistoryStore {
    /// Stored records, newest first. Empty on first use or when the stored
    /// data cannot be parsed.
    fn load(&self) -> Vec<HistoryRecord>;
    fn save(&mut self, records: &[HistoryRecord]) -> Result<()>;
}

impl<S: HistoryStore + ?Sized> HistoryStore for Box<S> {
    fn load(&self) -> Vec<HistoryRecord> {
        (**self).load()
    }

    fn save(&mut self, records: &[HistoryRecord]) -> Result<()> {
        (**self).save(records)
    }
}

/// Decode a stored history blob, applying the legacy migration: entries
/// without a `type` tag are search records, entries without an id get one.
/// Entries are decoded one at a time, so a malformed entry is skipped without
/// taking the readable ones with it.
pub fn decode_history(blob: &str) -> Vec<HistoryRecord> {
    let entries: Vec<Value> = match serde_json::from_str(blob) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            logger::log("Stored history is not a list, starting empty");
            return Vec::new();
        }
        Err(e) => {
            logger::log(&format!("Failed to parse stored history: {}", e));
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, mut entry)| {
            if let Value::Object(map) = &mut entry {
                map.entry("type")
                    .or_insert_with(|| Value::String("search".to_string()));
                map.entry("id")
                    .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            }
            match serde_json::from_value::<HistoryRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    logger::log(&format!(
                        "Skipping unreadable history entry {}: {}",
                        index, e
                    ));
                    None
                }
            }
        })
        .collect()
}

pub fn encode_history(records: &[HistoryRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

/// In-process store, used by tests and as a fallback when the database
/// cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { blob: None }
    }

    pub fn with_blob(blob: &str) -> Self {
        Self {
            blob: Some(blob.to_string()),
        }
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Vec<HistoryRecord> {
        self.blob.as_deref().map(decode_history).unwrap_or_default()
    }

    fn save(&mut self, records: &[HistoryRecord]) -> Result<()> {
        self.blob = Some(encode_history(records)?);
        Ok(())
    }
}

/// History service over an injected store. Every mutation reads the full
/// list, computes the new list and writes it back; the cached copy only
/// changes after a successful write.
pub struct History<S: HistoryStore> {
    store: S,
    records: Vec<HistoryRecord>,
}

impl<S: HistoryStore> History<S> {
    pub fn new(store: S) -> Self {
        let records = store.load();
        Self { store, records }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn append(&mut self, record: HistoryRecord) -> Result<()> {
        let mut records = self.store.load();
        records.insert(0, record);
        self.store.save(&records)?;
        self.records = records;
        Ok(())
    }

    /// Returns whether a record with `id` existed.
    pub fn delete(&mut self, id: Uuid) -> Result<bool> {
        let mut records = self.store.load();
        let before = records.len();
        records.retain(|r| r.id() != id);
        let removed = records.len() != before;
        if removed {
            self.store.save(&records)?;
        }
        self.records = records;
        Ok(removed)
    }

    pub fn reload(&mut self) {
        self.records = self.store.load();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Difficulty, ExamStyle, QuizConfig, QuizRecord, SearchRecord, SearchResult, Source,
    };

    fn search(query: &str, ts: u64) -> HistoryRecord {
        HistoryRecord::Search(SearchRecord {
            id: Uuid::new_v4(),
            query: query.to_string(),
            result: SearchResult {
                text: "answer".to_string(),
                sources: vec![Source {
                    uri: "https://example.org".to_string(),
                    title: "Example".to_string(),
                }],
            },
            timestamp: ts,
        })
    }

    fn quiz(ts: u64) -> HistoryRecord {
        HistoryRecord::Quiz(QuizRecord {
            id: Uuid::new_v4(),
            config: QuizConfig {
                topic: "Optics".to_string(),
                question_count: 5,
                exam_style: ExamStyle::Gre,
                difficulty: Difficulty::Hard,
                timer_enabled: true,
            },
            questions: vec![],
            user_answers: vec![],
            score: 0,
            total_questions: 0,
            timestamp: ts,
        })
    }

    /// Store whose writes always fail.
    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn load(&self) -> Vec<HistoryRecord> {
            Vec::new()
        }

        fn save(&mut self, _records: &[HistoryRecord]) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn test_empty_on_first_use() {
        let history = History::new(MemoryStore::new());
        assert!(history.records().is_empty());
    }

    #[test]
    fn test_append_is_newest_first() {
        let mut history = History::new(MemoryStore::new());
        history.append(search("first", 1)).unwrap();
        history.append(quiz(2)).unwrap();
        let records = history.records();
        assert_eq!(records.len(), 2);
        assert!(matches!(records[0], HistoryRecord::Quiz(_)));
        assert!(matches!(records[1], HistoryRecord::Search(_)));
    }

    #[test]
    fn test_delete_by_id() {
        let mut history = History::new(MemoryStore::new());
        let keep = search("keep", 1);
        let removed = search("drop", 2);
        let drop_id = removed.id();
        history.append(keep.clone()).unwrap();
        history.append(removed).unwrap();

        assert!(history.delete(drop_id).unwrap());
        assert_eq!(history.records(), &[keep]);
        assert!(!history.delete(drop_id).unwrap());
        assert!(history.get(drop_id).is_none());
    }

    #[test]
    fn test_failed_save_leaves_cache_untouched() {
        let mut history = History::new(BrokenStore);
        assert!(history.append(search("q", 1)).is_err());
        assert!(history.records().is_empty());
    }

    #[test]
    fn test_corrupt_blob_is_empty() {
        assert!(decode_history("{not json").is_empty());
        assert!(decode_history("{\"type\":\"search\"}").is_empty());
        let history = History::new(MemoryStore::with_blob("garbage"));
        assert!(history.records().is_empty());
    }

    #[test]
    fn test_bad_entry_does_not_cost_good_ones() {
        let blob = r#"[
            {"type": "search", "id": "6f1c1f4e-8d3b-4a57-9b43-6f7cdb8a2f10",
             "query": "good", "result": {"text": "kept"}, "timestamp": 5},
            {"type": "quiz", "id": "0c5e1b8a-2a7f-4d7e-9f9e-3b1a2c4d5e6f",
             "config": {"topic": "t", "questionCount": 5, "examStyle": "General",
                        "difficulty": "Medium", "timerEnabled": false},
             "questions": [], "userAnswers": [], "totalQuestions": 0, "timestamp": 4}
        ]"#;
        let records = decode_history(blob);
        assert_eq!(records.len(), 1);
        let good_id = records[0].id();

        let mut history = History::new(MemoryStore::with_blob(blob));
        assert_eq!(history.records().len(), 1);
        history.append(search("new", 6)).unwrap();

        let records = history.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.id() == good_id));
    }

    #[test]
    fn test_untagged_records_default_to_search() {
        let blob = r#"[{
            "id": "6f1c1f4e-8d3b-4a57-9b43-6f7cdb8a2f10",
            "query": "legacy query",
            "result": {"text": "old answer"},
            "timestamp": 42
        }]"#;
        let records = decode_history(blob);
        assert_eq!(records.len(), 1);
        match &records[0] {
            HistoryRecord::Search(record) => {
                assert_eq!(record.query, "legacy query");
                assert!(record.result.sources.is_empty());
                assert_eq!(record.timestamp, 42);
            }
            HistoryRecord::Quiz(_) => panic!("expected a search record"),
        }
    }

    #[test]
    fn test_missing_id_is_generated() {
        let blob = r#"[{"query": "q", "result": {"text": "t"}, "timestamp": 1}]"#;
        let records = decode_history(blob);
        assert_eq!(records.len(), 1);
        assert!(!records[0].id().is_nil());
    }

    #[test]
    fn test_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        let records = vec![quiz(3), search("x", 2)];
        store.save(&records).unwrap();
        assert_eq!(store.load(), records);
    }
}
