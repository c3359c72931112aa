pub mod client;
pub mod parse;
pub mod provider;

// Public API exports
pub use client::{ModelConfig, OpenRouterClient, DEFAULT_MODEL};
pub use parse::{clean_json_response, parse_questions, parse_search};
pub use provider::{build_quiz_prompt, build_search_prompt, ContentProvider, OpenRouterProvider};
