//! Scripted `GenerativeBackend` double for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GenerationRequest, GenerativeBackend, LlmError};

/// Replays queued replies in order and records every request it receives.
/// Once the queue is empty every call fails with a 500.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    seen: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn replying(text: impl Into<String>) -> Self {
        let backend = Self::default();
        backend.push(Ok(text.into()));
        backend
    }

    pub fn failing(error: LlmError) -> Self {
        let backend = Self::default();
        backend.push(Err(error));
        backend
    }

    pub fn push(&self, reply: Result<String, LlmError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Api {
                    status: 500,
                    message: "no scripted reply left".to_string(),
                })
            })
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
