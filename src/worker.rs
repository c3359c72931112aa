use crate::ai::ContentProvider;
use crate::attachments::{read_attachment, Attachment};
use crate::error::{InputError, ProviderError};
use crate::logger;
use crate::models::{Question, QuizConfig, SearchResult};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread;

#[derive(Debug)]
pub enum WorkerRequest {
    Search {
        query: String,
        attachments: Vec<Attachment>,
    },
    GenerateQuiz {
        config: QuizConfig,
    },
    ReadAttachment {
        path: PathBuf,
    },
}

#[derive(Debug)]
pub enum WorkerResponse {
    Search {
        query: String,
        result: Result<SearchResult, ProviderError>,
    },
    Quiz {
        config: QuizConfig,
        result: Result<Vec<Question>, ProviderError>,
    },
    Attachment(Result<Attachment, InputError>),
}

/// Background thread owning all slow work: AI calls and attachment reads.
/// Exits when the request channel is closed.
pub fn spawn_worker(
    provider: Option<Arc<dyn ContentProvider>>,
    tx: Sender<WorkerResponse>,
    rx: Receiver<WorkerRequest>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("study-assistant::worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    logger::log(&format!("Worker failed to start runtime: {}", e));
                    return;
                }
            };

            while let Ok(request) = rx.recv() {
                let response = match request {
                    WorkerRequest::Search { query, attachments } => {
                        logger::log(&format!("Worker received search request: {}", query));
                        let result = match provider.as_ref() {
                            Some(p) => rt.block_on(p.search(&query, &attachments)),
                            None => Err(disabled()),
                        };
                        if let Err(e) = &result {
                            logger::log(&format!("Worker search error: {}", e));
                        }
                        WorkerResponse::Search { query, result }
                    }
                    WorkerRequest::GenerateQuiz { config } => {
                        logger::log(&format!("Worker received quiz request: {}", config.topic));
                        let result = match provider.as_ref() {
                            Some(p) => rt.block_on(p.generate_quiz(&config)),
                            None => Err(disabled()),
                        };
                        if let Err(e) = &result {
                            logger::log(&format!("Worker quiz error: {}", e));
                        }
                        WorkerResponse::Quiz { config, result }
                    }
                    WorkerRequest::ReadAttachment { path } => {
                        WorkerResponse::Attachment(read_attachment(&path))
                    }
                };

                if tx.send(response).is_err() {
                    break;
                }
            }
            logger::log("Worker channel disconnected, exiting");
        })
}

fn disabled() -> ProviderError {
    ProviderError::Config("AI is disabled: set OPENROUTER_API_KEY".to_string())
}
