pub mod ai;
pub mod app;
pub mod attachments;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod render;
pub mod speech;
pub mod ui;
pub mod utils;
pub mod worker;

// Re-exports for convenience
pub use ai::{ContentProvider, ModelConfig, OpenRouterProvider, DEFAULT_MODEL};
pub use app::{App, Screen};
pub use config::AppConfig;
pub use error::{InputError, ProviderError};
pub use export::{write_export, ExportMode};
pub use history::{History, HistoryStore, MemoryStore, SqliteStore};
pub use models::{HistoryRecord, Question, QuizConfig, SearchResult};
pub use quiz::{Phase, QuizSession};
pub use render::{normalize, parse_inline, render_blocks};
